use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single point of a line series. `x` is the ISO date label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: String,
    pub y: f64,
}

/// One named line on a line chart.
///
/// Points are ordered by date; a cumulative series never decreases
/// when the raw values are non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub id: String,
    pub color: String,
    pub data: Vec<LinePoint>,
}

/// One stacked bar: a time bucket and the value of every chain in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRow {
    /// Week or month index relative to the launch epoch. Never negative.
    pub bucket: u32,
    /// Axis label for the bucket (week number or `M/YY`).
    pub label: String,
    /// Chain display name → value. Values of one row sum to the bucket total.
    pub values: BTreeMap<String, f64>,
}

impl BarRow {
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }
}

/// Rows ordered by bucket plus the legend keys the renderer stacks by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub keys: Vec<String>,
    pub rows: Vec<BarRow>,
}

/// Square flow matrix for chord charts.
///
/// `cells[i][j]` is the value that flowed from chain `j + 1` to chain `i + 1`.
/// `None` means "no ribbon", which is different from a zero-width ribbon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordMatrix {
    pub keys: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl ChordMatrix {
    pub fn empty(size: usize) -> Self {
        Self {
            keys: Vec::new(),
            cells: vec![vec![None; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Value flowing from `source` to `dest` (1-based chain ids).
    pub fn flow(&self, source: u16, dest: u16) -> Option<f64> {
        let (s, d) = (usize::from(source).checked_sub(1)?, usize::from(dest).checked_sub(1)?);
        self.cells.get(d)?.get(s).copied().flatten()
    }
}

/// Node of the network → chain → asset ownership tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePackingNode {
    /// Unique id within the tree (leaves are `"<symbol>-<chainId>"`).
    pub id: String,
    pub name: String,
    pub color: String,
    /// Set on leaves only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<CirclePackingNode>,
}

impl CirclePackingNode {
    /// Sum of every leaf amount below this node.
    pub fn total(&self) -> f64 {
        self.amount.unwrap_or(0.0) + self.children.iter().map(|c| c.total()).sum::<f64>()
    }
}

/// A headline per-chain figure (the stat cards under a page title).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainStat {
    pub chain_id: u16,
    pub chain: String,
    pub value: f64,
    /// Pre-formatted display string.
    pub display: String,
}

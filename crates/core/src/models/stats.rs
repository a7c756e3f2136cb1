use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category key (chain id, `"chain:address"`, or `"*"`) → numeric value.
pub type CategoryValues = BTreeMap<String, f64>;

/// ISO date (`YYYY-MM-DD`) → category → value.
///
/// A `BTreeMap` keeps the dates in lexical order, which for this fixed-width
/// format is chronological order.
pub type DailySeries = BTreeMap<String, CategoryValues>;

/// Chain → asset symbol → notional USD value (`"*"` = all assets).
pub type DirectionalTransferData = BTreeMap<String, BTreeMap<String, f64>>;

/// Source chain → destination chain → asset symbol → notional USD value.
pub type BidirectionalTransferData = BTreeMap<String, DirectionalTransferData>;

/// Chain → token address → locked asset (`"*"` = chain aggregate).
pub type ChainsAssets = BTreeMap<String, BTreeMap<String, LockedAsset>>;

// ── Counts: `totals` and `nfts` endpoints ───────────────────────────

/// Message or NFT transfer counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Totals {
    #[serde(default)]
    pub last_day_count: CategoryValues,
    #[serde(default)]
    pub total_count: CategoryValues,
    #[serde(default)]
    pub daily_totals: DailySeries,
}

// ── Notional value bridged ──────────────────────────────────────────

/// `notionaltransferred`: value moved between chain pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotionalTransferred {
    #[serde(default)]
    pub last_24_hours: BidirectionalTransferData,
    #[serde(default)]
    pub within_period: BidirectionalTransferData,
    #[serde(default)]
    pub period_duration_days: f64,
    #[serde(default)]
    pub daily: BTreeMap<String, BidirectionalTransferData>,
}

/// `notionaltransferredtocumulative`: running all-time value received per chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotionalTransferredToCumulative {
    #[serde(default)]
    pub all_time: DirectionalTransferData,
    #[serde(default)]
    pub all_time_duration_days: f64,
    #[serde(default)]
    pub daily: BTreeMap<String, DirectionalTransferData>,
}

// ── Total value locked ──────────────────────────────────────────────

/// One token held in custody on a chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LockedAsset {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coin_gecko_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub notional: f64,
    #[serde(default)]
    pub token_price: f64,
}

/// `notionaltvl`: current locked value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotionalTvl {
    #[serde(default)]
    pub last_24_hours_change: ChainsAssets,
    #[serde(default)]
    pub all_time: ChainsAssets,
}

/// `notionaltvlcumulative`: locked value over time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotionalTvlCumulative {
    #[serde(default)]
    pub last_24_hours_change: ChainsAssets,
    #[serde(default)]
    pub all_time: ChainsAssets,
    #[serde(default)]
    pub daily_locked: BTreeMap<String, ChainsAssets>,
}

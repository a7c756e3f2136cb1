use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::chain::{Chain, ALL_KEY};
use crate::models::chart::ChainStat;
use crate::models::filter::FilterContext;
use crate::models::stats::CategoryValues;
use crate::services::polling_service::{DatasetLoader, PollingDataSource, SourceReport};

pub mod counts;
pub mod loaders;
pub mod transfers;
pub mod tvl;

/// A dashboard page: owns its data sources and turns their datasets into
/// chart models on demand.
///
/// `charts_json` returns `Ok(None)` while nothing is loaded yet; errors from
/// fetching never reach this layer, only the serializer can fail.
#[async_trait]
pub trait DashboardView: Send + Sync {
    fn title(&self) -> &str;

    /// Mount: fetch now and keep polling for `filter`.
    fn start(&self, filter: FilterContext);

    /// The selection changed: cancel, clear, refetch, restart the timer.
    fn supersede(&self, filter: FilterContext);

    /// Unmount: cancel in-flight requests and stop every timer.
    fn stop(&self);

    /// Fetch every source once for `filter`, concurrently, without polling.
    async fn load_once(&self, filter: FilterContext) -> Vec<SourceReport>;

    fn reports(&self) -> Vec<SourceReport>;

    fn charts_json(&self) -> Result<Option<serde_json::Value>, CoreError>;
}

/// A page's headline figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub label: String,
    pub value: f64,
    pub display: String,
}

impl Headline {
    /// The `"*"` aggregate of `values`, if present.
    pub fn from_aggregate(
        label: &str,
        values: &CategoryValues,
        format: impl Fn(f64) -> String,
    ) -> Option<Self> {
        let value = *values.get(ALL_KEY)?;
        Some(Self {
            label: label.to_string(),
            value,
            display: format(value),
        })
    }
}

/// Per-chain stat cards.
///
/// The launch chains always get a card (zero when absent); chains added
/// later only appear once they have a positive value.
pub fn chain_stats(values: &CategoryValues, format: impl Fn(f64) -> String) -> Vec<ChainStat> {
    Chain::ALL
        .iter()
        .filter_map(|&chain| {
            let value = values.get(&chain.key()).copied();
            let value = if Chain::LAUNCH_CHAINS.contains(&chain) {
                value.unwrap_or(0.0)
            } else {
                value.filter(|v| *v > 0.0)?
            };
            Some(ChainStat {
                chain_id: chain.id(),
                chain: chain.name().to_string(),
                value,
                display: format(value),
            })
        })
        .collect()
}

pub(crate) fn to_json<T: Serialize>(charts: Option<T>) -> Result<Option<serde_json::Value>, CoreError> {
    charts
        .map(|c| serde_json::to_value(c).map_err(CoreError::from))
        .transpose()
}

/// `start` for a page with two sources. A no-op while both already poll
/// `filter`.
pub(crate) fn start_pair<A: DatasetLoader, B: DatasetLoader>(
    a: &PollingDataSource<A>,
    b: &PollingDataSource<B>,
    filter: FilterContext,
) {
    let polling = a.is_polling() && b.is_polling();
    if polling && a.filter() == filter && b.filter() == filter {
        return;
    }
    supersede_pair(a, b, filter);
}

/// `supersede` for a page with two sources. Both are cancelled and cleared
/// before either polls again; chain filters leave both idle.
pub(crate) fn supersede_pair<A: DatasetLoader, B: DatasetLoader>(
    a: &PollingDataSource<A>,
    b: &PollingDataSource<B>,
    filter: FilterContext,
) {
    let poll = filter.is_network_wide();
    a.reset(filter.clone());
    b.reset(filter);
    if poll {
        a.spawn_poller();
        b.spawn_poller();
    }
}

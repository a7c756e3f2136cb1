use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::loaders::{TransferredCumulativeLoader, TransferredLoader};
use super::{chain_stats, start_pair, supersede_pair, to_json, DashboardView, Headline};
use crate::errors::CoreError;
use crate::models::category::CategoryScheme;
use crate::models::chain::ALL_KEY;
use crate::models::chart::{BarChart, ChainStat, ChordMatrix, CirclePackingNode, LineSeries};
use crate::models::filter::FilterContext;
use crate::models::stats::{NotionalTransferred, NotionalTransferredToCumulative};
use crate::providers::traits::StatsProvider;
use crate::services::bucket_service::Bucket;
use crate::services::chart_service::{
    all_assets, daily_all_assets, daily_line_series, daily_outbound, mark_partial_bucket,
    monthly_bars, weekly_bars,
};
use crate::services::flow_service::{chord_matrix, circle_packing_tree};
use crate::services::format_service::usd_format;
use crate::services::polling_service::{PollingDataSource, SourceReport};

/// Charts built from `notionaltransferred`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCharts {
    pub weekly: BarChart,
    pub monthly: BarChart,
    pub chord: ChordMatrix,
}

/// Charts built from `notionaltransferredtocumulative`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCharts {
    pub headline: Option<Headline>,
    pub chains: Vec<ChainStat>,
    pub daily_cumulative: Vec<LineSeries>,
    pub assets: CirclePackingNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCharts {
    pub period: Option<PeriodCharts>,
    pub cumulative: Option<CumulativeCharts>,
}

/// Outbound value per source chain, bucketed, plus the chain-to-chain flows.
/// Both sides of a flow are always chains, whatever the filter.
pub fn period_charts(data: &NotionalTransferred, today: chrono::NaiveDate) -> PeriodCharts {
    let outbound = daily_outbound(&data.daily);
    let mut weekly = weekly_bars(&outbound, CategoryScheme::Chains);
    mark_partial_bucket(&mut weekly, Bucket::Week, today);
    let mut monthly = monthly_bars(&outbound, CategoryScheme::Chains);
    mark_partial_bucket(&mut monthly, Bucket::Month, today);

    PeriodCharts {
        weekly,
        monthly,
        chord: chord_matrix(&data.within_period),
    }
}

pub fn cumulative_charts(data: &NotionalTransferredToCumulative) -> CumulativeCharts {
    let per_chain = all_assets(&data.all_time);
    let headline = data
        .all_time
        .get(ALL_KEY)
        .and_then(|symbols| symbols.get(ALL_KEY))
        .map(|&value| Headline {
            label: "Value received".to_string(),
            value,
            display: usd_format(value),
        });

    CumulativeCharts {
        headline,
        chains: chain_stats(&per_chain, usd_format),
        daily_cumulative: daily_line_series(&daily_all_assets(&data.daily), CategoryScheme::Chains),
        assets: circle_packing_tree(&data.all_time),
    }
}

/// Value bridged page.
///
/// The notional endpoints are network-wide only: for a chain filter both
/// sources are reset and nothing is fetched, so the page shows no charts.
pub struct TransfersView {
    period: PollingDataSource<TransferredLoader>,
    cumulative: PollingDataSource<TransferredCumulativeLoader>,
}

impl TransfersView {
    pub fn new(provider: Arc<dyn StatsProvider>, interval: Duration) -> Self {
        Self {
            period: PollingDataSource::new(TransferredLoader::new(Arc::clone(&provider)), interval),
            cumulative: PollingDataSource::new(TransferredCumulativeLoader::new(provider), interval),
        }
    }

    pub fn period_source(&self) -> &PollingDataSource<TransferredLoader> {
        &self.period
    }

    pub fn cumulative_source(&self) -> &PollingDataSource<TransferredCumulativeLoader> {
        &self.cumulative
    }

    /// `None` until at least one source has a dataset.
    pub fn charts(&self) -> Option<TransferCharts> {
        let today = Utc::now().date_naive();
        let period = self.period.snapshot().map(|d| period_charts(&d, today));
        let cumulative = self.cumulative.snapshot().map(|d| cumulative_charts(&d));
        if period.is_none() && cumulative.is_none() {
            return None;
        }
        Some(TransferCharts { period, cumulative })
    }
}

#[async_trait]
impl DashboardView for TransfersView {
    fn title(&self) -> &str {
        "Value bridged"
    }

    fn start(&self, filter: FilterContext) {
        start_pair(&self.period, &self.cumulative, filter);
    }

    fn supersede(&self, filter: FilterContext) {
        supersede_pair(&self.period, &self.cumulative, filter);
    }

    fn stop(&self) {
        self.period.stop();
        self.cumulative.stop();
    }

    async fn load_once(&self, filter: FilterContext) -> Vec<SourceReport> {
        if filter.is_network_wide() {
            tokio::join!(
                self.period.fetch_once(filter.clone()),
                self.cumulative.fetch_once(filter)
            );
        } else {
            self.period.reset(filter.clone());
            self.cumulative.reset(filter);
        }
        self.reports()
    }

    fn reports(&self) -> Vec<SourceReport> {
        vec![self.period.report(), self.cumulative.report()]
    }

    fn charts_json(&self) -> Result<Option<serde_json::Value>, CoreError> {
        to_json(self.charts())
    }
}

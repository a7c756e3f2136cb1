use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::loaders::{CountKind, TotalsLoader};
use super::{chain_stats, to_json, DashboardView, Headline};
use crate::errors::CoreError;
use crate::models::category::CategoryScheme;
use crate::models::chart::{BarChart, ChainStat, LineSeries};
use crate::models::filter::FilterContext;
use crate::models::stats::Totals;
use crate::providers::traits::StatsProvider;
use crate::services::bucket_service::Bucket;
use crate::services::chart_service::{
    cumulative_line_series, mark_partial_bucket, monthly_bars, weekly_bars,
    weekly_cumulative_bars,
};
use crate::services::format_service::amount_format;
use crate::services::polling_service::{PollingDataSource, SourceReport};

/// Everything the messages / NFT page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountCharts {
    /// Only on the network-wide page.
    pub headline: Option<Headline>,
    /// Only on the network-wide page.
    pub chains: Vec<ChainStat>,
    pub monthly: BarChart,
    pub weekly: BarChart,
    pub weekly_cumulative: BarChart,
    pub daily_cumulative: Vec<LineSeries>,
}

/// Build the count charts for one dataset. Pure apart from the partial-bucket
/// labels, which depend on `today`.
pub fn count_charts(
    totals: &Totals,
    filter: &FilterContext,
    kind: CountKind,
    today: chrono::NaiveDate,
) -> CountCharts {
    let scheme = CategoryScheme::for_filter(filter);
    let label = match kind {
        CountKind::Messages => "Messages observed",
        CountKind::Nfts => "NFT transfers",
    };

    let (headline, chains) = if filter.is_network_wide() {
        (
            Headline::from_aggregate(label, &totals.total_count, |v| amount_format(v, 1)),
            chain_stats(&totals.total_count, |v| amount_format(v, 1)),
        )
    } else {
        (None, Vec::new())
    };

    let mut monthly = monthly_bars(&totals.daily_totals, scheme);
    mark_partial_bucket(&mut monthly, Bucket::Month, today);
    let mut weekly = weekly_bars(&totals.daily_totals, scheme);
    mark_partial_bucket(&mut weekly, Bucket::Week, today);

    CountCharts {
        headline,
        chains,
        monthly,
        weekly,
        weekly_cumulative: weekly_cumulative_bars(&totals.daily_totals, scheme),
        daily_cumulative: cumulative_line_series(&totals.daily_totals, scheme),
    }
}

/// Message or NFT count page.
pub struct CountsView {
    kind: CountKind,
    source: PollingDataSource<TotalsLoader>,
}

impl CountsView {
    pub fn new(provider: Arc<dyn StatsProvider>, kind: CountKind, interval: Duration) -> Self {
        Self {
            kind,
            source: PollingDataSource::new(TotalsLoader::new(provider, kind), interval),
        }
    }

    pub fn messages(provider: Arc<dyn StatsProvider>, interval: Duration) -> Self {
        Self::new(provider, CountKind::Messages, interval)
    }

    pub fn nfts(provider: Arc<dyn StatsProvider>, interval: Duration) -> Self {
        Self::new(provider, CountKind::Nfts, interval)
    }

    pub fn source(&self) -> &PollingDataSource<TotalsLoader> {
        &self.source
    }

    /// `None` while loading.
    pub fn charts(&self) -> Option<CountCharts> {
        let totals = self.source.snapshot()?;
        Some(count_charts(
            &totals,
            &self.source.filter(),
            self.kind,
            Utc::now().date_naive(),
        ))
    }
}

#[async_trait]
impl DashboardView for CountsView {
    fn title(&self) -> &str {
        match self.kind {
            CountKind::Messages => "Messages",
            CountKind::Nfts => "NFTs",
        }
    }

    fn start(&self, filter: FilterContext) {
        self.source.start(filter);
    }

    fn supersede(&self, filter: FilterContext) {
        self.source.supersede(filter);
    }

    fn stop(&self) {
        self.source.stop();
    }

    async fn load_once(&self, filter: FilterContext) -> Vec<SourceReport> {
        self.source.fetch_once(filter).await;
        self.reports()
    }

    fn reports(&self) -> Vec<SourceReport> {
        vec![self.source.report()]
    }

    fn charts_json(&self) -> Result<Option<serde_json::Value>, CoreError> {
        to_json(self.charts())
    }
}

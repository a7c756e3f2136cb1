use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::loaders::{TvlCumulativeLoader, TvlLoader};
use super::{chain_stats, start_pair, supersede_pair, to_json, DashboardView, Headline};
use crate::errors::CoreError;
use crate::models::category::CategoryScheme;
use crate::models::chart::{BarChart, ChainStat, LineSeries};
use crate::models::filter::FilterContext;
use crate::models::stats::{NotionalTvl, NotionalTvlCumulative};
use crate::providers::traits::StatsProvider;
use crate::services::bucket_service::Bucket;
use crate::services::chart_service::{
    daily_line_series, daily_locked_notional, locked_notional, mark_partial_bucket,
    month_end_snapshots, monthly_bars, week_end_snapshots, weekly_bars,
};
use crate::services::format_service::usd_format;
use crate::services::polling_service::{PollingDataSource, SourceReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTvl {
    pub headline: Option<Headline>,
    pub chains: Vec<ChainStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvlHistory {
    /// Week-end locked value per chain.
    pub weekly: BarChart,
    /// Month-end locked value per chain.
    pub monthly: BarChart,
    pub daily: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvlCharts {
    pub current: Option<CurrentTvl>,
    pub history: Option<TvlHistory>,
}

pub fn current_tvl(data: &NotionalTvl) -> CurrentTvl {
    let per_chain = locked_notional(&data.all_time);
    CurrentTvl {
        headline: Headline::from_aggregate("Total value locked", &per_chain, usd_format),
        chains: chain_stats(&per_chain, usd_format),
    }
}

pub fn tvl_history(data: &NotionalTvlCumulative, today: chrono::NaiveDate) -> TvlHistory {
    let daily = daily_locked_notional(&data.daily_locked);
    let mut weekly = weekly_bars(&week_end_snapshots(&daily), CategoryScheme::Chains);
    mark_partial_bucket(&mut weekly, Bucket::Week, today);
    let mut monthly = monthly_bars(&month_end_snapshots(&daily), CategoryScheme::Chains);
    mark_partial_bucket(&mut monthly, Bucket::Month, today);
    TvlHistory {
        weekly,
        monthly,
        daily: daily_line_series(&daily, CategoryScheme::Chains),
    }
}

/// Total value locked page. Network-wide only, like the transfers page.
pub struct TvlView {
    current: PollingDataSource<TvlLoader>,
    history: PollingDataSource<TvlCumulativeLoader>,
}

impl TvlView {
    pub fn new(provider: Arc<dyn StatsProvider>, interval: Duration) -> Self {
        Self {
            current: PollingDataSource::new(TvlLoader::new(Arc::clone(&provider)), interval),
            history: PollingDataSource::new(TvlCumulativeLoader::new(provider), interval),
        }
    }

    pub fn current_source(&self) -> &PollingDataSource<TvlLoader> {
        &self.current
    }

    pub fn history_source(&self) -> &PollingDataSource<TvlCumulativeLoader> {
        &self.history
    }

    pub fn charts(&self) -> Option<TvlCharts> {
        let current = self.current.snapshot().map(|d| current_tvl(&d));
        let history = self
            .history
            .snapshot()
            .map(|d| tvl_history(&d, Utc::now().date_naive()));
        if current.is_none() && history.is_none() {
            return None;
        }
        Some(TvlCharts { current, history })
    }
}

#[async_trait]
impl DashboardView for TvlView {
    fn title(&self) -> &str {
        "Total value locked"
    }

    fn start(&self, filter: FilterContext) {
        start_pair(&self.current, &self.history, filter);
    }

    fn supersede(&self, filter: FilterContext) {
        supersede_pair(&self.current, &self.history, filter);
    }

    fn stop(&self) {
        self.current.stop();
        self.history.stop();
    }

    async fn load_once(&self, filter: FilterContext) -> Vec<SourceReport> {
        if filter.is_network_wide() {
            tokio::join!(
                self.current.fetch_once(filter.clone()),
                self.history.fetch_once(filter)
            );
        } else {
            self.current.reset(filter.clone());
            self.history.reset(filter);
        }
        self.reports()
    }

    fn reports(&self) -> Vec<SourceReport> {
        vec![self.current.report(), self.history.report()]
    }

    fn charts_json(&self) -> Result<Option<serde_json::Value>, CoreError> {
        to_json(self.charts())
    }
}

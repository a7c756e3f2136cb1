use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::filter::FilterContext;
use crate::models::stats::{
    NotionalTransferred, NotionalTransferredToCumulative, NotionalTvl, NotionalTvlCumulative,
    Totals,
};
use crate::providers::traits::StatsProvider;
use crate::services::bucket_service::days_since_launch;
use crate::services::polling_service::DatasetLoader;

/// Which count endpoint a `TotalsLoader` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    Messages,
    Nfts,
}

/// Message or NFT counts.
pub struct TotalsLoader {
    provider: Arc<dyn StatsProvider>,
    kind: CountKind,
}

impl TotalsLoader {
    pub fn new(provider: Arc<dyn StatsProvider>, kind: CountKind) -> Self {
        Self { provider, kind }
    }
}

#[async_trait]
impl DatasetLoader for TotalsLoader {
    type Output = Totals;

    fn name(&self) -> &str {
        match self.kind {
            CountKind::Messages => "totals",
            CountKind::Nfts => "nfts",
        }
    }

    async fn load(&self, filter: &FilterContext) -> Result<Totals, CoreError> {
        match self.kind {
            CountKind::Messages => self.provider.totals(filter).await,
            CountKind::Nfts => self.provider.nfts(filter).await,
        }
    }
}

/// Value bridged between chain pairs since launch.
pub struct TransferredLoader {
    provider: Arc<dyn StatsProvider>,
}

impl TransferredLoader {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DatasetLoader for TransferredLoader {
    type Output = NotionalTransferred;

    fn name(&self) -> &str {
        "notionaltransferred"
    }

    async fn load(&self, filter: &FilterContext) -> Result<NotionalTransferred, CoreError> {
        let num_days = days_since_launch(Utc::now());
        self.provider.notional_transferred(filter, num_days).await
    }
}

/// All-time value received per chain, daily.
pub struct TransferredCumulativeLoader {
    provider: Arc<dyn StatsProvider>,
}

impl TransferredCumulativeLoader {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DatasetLoader for TransferredCumulativeLoader {
    type Output = NotionalTransferredToCumulative;

    fn name(&self) -> &str {
        "notionaltransferredtocumulative"
    }

    async fn load(
        &self,
        filter: &FilterContext,
    ) -> Result<NotionalTransferredToCumulative, CoreError> {
        let num_days = days_since_launch(Utc::now());
        self.provider
            .notional_transferred_to_cumulative(filter, num_days)
            .await
    }
}

/// Current locked value.
pub struct TvlLoader {
    provider: Arc<dyn StatsProvider>,
}

impl TvlLoader {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DatasetLoader for TvlLoader {
    type Output = NotionalTvl;

    fn name(&self) -> &str {
        "notionaltvl"
    }

    async fn load(&self, filter: &FilterContext) -> Result<NotionalTvl, CoreError> {
        self.provider.notional_tvl(filter).await
    }
}

/// Locked value over time.
pub struct TvlCumulativeLoader {
    provider: Arc<dyn StatsProvider>,
}

impl TvlCumulativeLoader {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DatasetLoader for TvlCumulativeLoader {
    type Output = NotionalTvlCumulative;

    fn name(&self) -> &str {
        "notionaltvlcumulative"
    }

    async fn load(&self, filter: &FilterContext) -> Result<NotionalTvlCumulative, CoreError> {
        self.provider.notional_tvl_cumulative(filter).await
    }
}

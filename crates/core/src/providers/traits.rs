use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::filter::FilterContext;
use crate::models::stats::{
    NotionalTransferred, NotionalTransferredToCumulative, NotionalTvl, NotionalTvlCumulative,
    Totals,
};

/// Trait abstraction over the statistics service.
///
/// The HTTP implementation lives in `cloud_functions`; views and tests only
/// ever see this trait, so a different backend (or a mock) is a drop-in.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Message counts (`totals`).
    async fn totals(&self, filter: &FilterContext) -> Result<Totals, CoreError>;

    /// NFT transfer counts (`nfts`).
    async fn nfts(&self, filter: &FilterContext) -> Result<Totals, CoreError>;

    /// Value bridged between chain pairs within the last `num_days` days.
    async fn notional_transferred(
        &self,
        filter: &FilterContext,
        num_days: u32,
    ) -> Result<NotionalTransferred, CoreError>;

    /// All-time value received per chain, as a daily series.
    async fn notional_transferred_to_cumulative(
        &self,
        filter: &FilterContext,
        num_days: u32,
    ) -> Result<NotionalTransferredToCumulative, CoreError>;

    /// Current locked value.
    async fn notional_tvl(&self, filter: &FilterContext) -> Result<NotionalTvl, CoreError>;

    /// Locked value over time.
    async fn notional_tvl_cumulative(
        &self,
        filter: &FilterContext,
    ) -> Result<NotionalTvlCumulative, CoreError>;
}

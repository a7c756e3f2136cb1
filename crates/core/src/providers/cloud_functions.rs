use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::query::{Endpoint, StatsQuery};
use super::traits::StatsProvider;
use crate::errors::CoreError;
use crate::models::filter::FilterContext;
use crate::models::settings::Settings;
use crate::models::stats::{
    NotionalTransferred, NotionalTransferredToCumulative, NotionalTvl, NotionalTvlCumulative,
    Totals,
};

/// HTTP provider for the statistics cloud functions.
///
/// - **Auth**: none; every call is a read-only GET.
/// - **Base URL**: per network (`.../mainnet-`, `.../testnet-`), the endpoint
///   suffix is appended directly (`.../mainnet-totals`).
/// - **Timeouts**: none on purpose. A hung request is abandoned only when the
///   polling source that owns it supersedes or stops it.
pub struct CloudFunctionsProvider {
    client: Client,
    base_url: String,
}

impl CloudFunctionsProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("bridge-stats/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET one query and decode its JSON body.
    ///
    /// A non-2xx status is reported as `HttpStatus` before the body is read,
    /// so an HTML error page never surfaces as a confusing decode error.
    async fn get_json<T: DeserializeOwned>(&self, query: StatsQuery) -> Result<T, CoreError> {
        let url = query.url(&self.base_url)?;
        debug!(endpoint = query.endpoint.suffix(), filter = %query.filter, "GET statistics");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                endpoint: query.endpoint.suffix().to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            CoreError::Deserialization(format!(
                "failed to decode {} response: {e}",
                query.endpoint.suffix()
            ))
        })
    }
}

#[async_trait]
impl StatsProvider for CloudFunctionsProvider {
    fn name(&self) -> &str {
        "CloudFunctions"
    }

    async fn totals(&self, filter: &FilterContext) -> Result<Totals, CoreError> {
        self.get_json(StatsQuery::new(Endpoint::Totals, filter)).await
    }

    async fn nfts(&self, filter: &FilterContext) -> Result<Totals, CoreError> {
        self.get_json(StatsQuery::new(Endpoint::Nfts, filter)).await
    }

    async fn notional_transferred(
        &self,
        filter: &FilterContext,
        num_days: u32,
    ) -> Result<NotionalTransferred, CoreError> {
        self.get_json(StatsQuery::new(Endpoint::NotionalTransferred, filter).with_num_days(num_days))
            .await
    }

    async fn notional_transferred_to_cumulative(
        &self,
        filter: &FilterContext,
        num_days: u32,
    ) -> Result<NotionalTransferredToCumulative, CoreError> {
        self.get_json(
            StatsQuery::new(Endpoint::NotionalTransferredToCumulative, filter)
                .with_num_days(num_days),
        )
        .await
    }

    async fn notional_tvl(&self, filter: &FilterContext) -> Result<NotionalTvl, CoreError> {
        self.get_json(StatsQuery::new(Endpoint::NotionalTvl, filter)).await
    }

    async fn notional_tvl_cumulative(
        &self,
        filter: &FilterContext,
    ) -> Result<NotionalTvlCumulative, CoreError> {
        self.get_json(StatsQuery::new(Endpoint::NotionalTvlCumulative, filter))
            .await
    }
}

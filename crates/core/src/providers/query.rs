use reqwest::Url;

use crate::errors::CoreError;
use crate::models::filter::FilterContext;

/// The dataset families the statistics service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Totals,
    Nfts,
    NotionalTransferred,
    NotionalTransferredToCumulative,
    NotionalTvl,
    NotionalTvlCumulative,
}

impl Endpoint {
    /// Path suffix appended to the network's base URL.
    pub fn suffix(self) -> &'static str {
        match self {
            Endpoint::Totals => "totals",
            Endpoint::Nfts => "nfts",
            Endpoint::NotionalTransferred => "notionaltransferred",
            Endpoint::NotionalTransferredToCumulative => "notionaltransferredtocumulative",
            Endpoint::NotionalTvl => "notionaltvl",
            Endpoint::NotionalTvlCumulative => "notionaltvlcumulative",
        }
    }

    /// Parameters this endpoint always carries, before the filter parameters.
    fn fixed_params(self, num_days: Option<u32>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        match self {
            Endpoint::Totals | Endpoint::Nfts | Endpoint::NotionalTvl => {}
            Endpoint::NotionalTransferred => {
                params.push(("forPeriod", "true".to_string()));
                params.push(("daily", "true".to_string()));
            }
            Endpoint::NotionalTransferredToCumulative => {
                params.push(("allTime", "true".to_string()));
                params.push(("daily", "true".to_string()));
            }
            Endpoint::NotionalTvlCumulative => {
                params.push(("daily", "true".to_string()));
            }
        }
        if let Some(days) = num_days {
            params.push(("numDays", days.to_string()));
        }
        params
    }
}

/// A fully-described GET against one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub endpoint: Endpoint,
    pub filter: FilterContext,
    pub num_days: Option<u32>,
}

impl StatsQuery {
    pub fn new(endpoint: Endpoint, filter: &FilterContext) -> Self {
        Self {
            endpoint,
            filter: filter.clone(),
            num_days: None,
        }
    }

    pub fn with_num_days(mut self, num_days: u32) -> Self {
        self.num_days = Some(num_days);
        self
    }

    /// Query parameters in wire order: fixed params, then `groupBy`,
    /// `forChain`, `forAddress`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.endpoint.fixed_params(self.num_days);
        params.push(("groupBy", self.filter.group_by().as_str().to_string()));
        if let Some(chain) = self.filter.for_chain_param() {
            params.push(("forChain", chain.to_string()));
        }
        if let Some(address) = self.filter.for_address_param() {
            params.push(("forAddress", address.to_string()));
        }
        params
    }

    /// Build the full URL against `base_url` (which already ends in the
    /// network prefix, e.g. `.../mainnet-`).
    pub fn url(&self, base_url: &str) -> Result<Url, CoreError> {
        let endpoint = format!("{base_url}{}", self.endpoint.suffix());
        Url::parse_with_params(&endpoint, self.params())
            .map_err(|e| CoreError::Config(format!("invalid base url {base_url}: {e}")))
    }
}

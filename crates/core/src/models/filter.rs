use serde::{Deserialize, Serialize};
use std::fmt;

use super::chain::Chain;

/// How the statistics service groups its response keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Chain,
    Address,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Chain => "chain",
            GroupBy::Address => "address",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The selection that scopes one fetch: an optional emitter chain and an
/// optional emitter address on that chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterContext {
    pub chain: Option<u16>,
    pub address: Option<String>,
}

impl FilterContext {
    /// The unfiltered, network-wide view.
    pub fn network() -> Self {
        Self::default()
    }

    pub fn for_chain(chain: u16) -> Self {
        Self {
            chain: Some(chain),
            address: None,
        }
    }

    pub fn for_address(chain: u16, address: impl Into<String>) -> Self {
        Self {
            chain: Some(chain),
            address: Some(address.into()),
        }
    }

    /// Network-wide views group by chain; once a chain is selected the
    /// breakdown switches to emitter addresses on that chain.
    pub fn group_by(&self) -> GroupBy {
        if self.chain.is_some() {
            GroupBy::Address
        } else {
            GroupBy::Chain
        }
    }

    /// The `forChain` parameter, if any.
    pub fn for_chain_param(&self) -> Option<u16> {
        self.chain
    }

    /// The `forAddress` parameter. An address only scopes a query together with its chain.
    pub fn for_address_param(&self) -> Option<&str> {
        match (self.chain, self.address.as_deref()) {
            (Some(_), Some(addr)) if !addr.is_empty() => Some(addr),
            _ => None,
        }
    }

    pub fn is_network_wide(&self) -> bool {
        self.chain.is_none()
    }

    /// The selected chain, if it is one the dashboard knows about.
    pub fn known_chain(&self) -> Option<Chain> {
        self.chain.and_then(Chain::from_id)
    }
}

impl fmt::Display for FilterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.chain, self.for_address_param()) {
            (None, _) => f.write_str("all chains"),
            (Some(c), None) => write!(f, "chain {c}"),
            (Some(c), Some(a)) => write!(f, "chain {c} address {a}"),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::CoreError;

/// Default poll period of every data source.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 90;

/// Which deployment of the statistics service to read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    /// Base URL the endpoint suffix (`totals`, `nfts`, ...) is appended to.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://europe-west3-wormhole-315720.cloudfunctions.net/mainnet-",
            Network::Testnet => "https://europe-west3-wormhole-315720.cloudfunctions.net/testnet-",
            Network::Devnet => "http://localhost:8090/",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        })
    }
}

impl FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(CoreError::Config(format!("unknown network: {other}"))),
        }
    }
}

/// User-configurable settings, read from an optional TOML file.
///
/// ```toml
/// network = "testnet"
/// base_url = "http://localhost:8090/"   # overrides the network default
/// poll_interval_secs = 90
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: Network,

    /// Explicit base URL; when unset the network's default is used.
    pub base_url: Option<String>,

    /// Seconds between two poll cycles of one data source.
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            base_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.poll_interval_secs == 0 {
            return Err(CoreError::Config("poll_interval_secs must be positive".into()));
        }
        if let Some(url) = &self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoreError::Config(format!("base_url must be http(s): {url}")));
            }
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_base_url())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

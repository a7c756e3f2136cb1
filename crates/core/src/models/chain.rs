use serde::{Deserialize, Serialize};
use std::fmt;

/// Category key the statistics service uses for "all categories combined".
pub const ALL_KEY: &str = "*";

/// Category keys that never appear in a per-category breakdown.
///
/// - `"*"` is the synthetic aggregate (counting it would double count).
/// - `"0"` and `"56"` are invalid/unused chain ids the backend still reports.
pub const EXCLUDED_KEYS: [&str; 3] = [ALL_KEY, "0", "56"];

/// True if `key` must be skipped by every reshaper.
pub fn is_excluded(key: &str) -> bool {
    EXCLUDED_KEYS.contains(&key)
}

/// Display name of the root node in hierarchical charts.
pub const NETWORK_NAME: &str = "Wormhole";

/// Color of the root node in hierarchical charts.
pub const NETWORK_COLOR: &str = "hsl(183, 100%, 61%)";

/// Ten-entry palette for chains without a reserved color, assigned in first-seen order.
pub const FALLBACK_PALETTE: [&str; 10] = [
    "hsl(9, 100%, 61%)",
    "hsl(30, 100%, 61%)",
    "hsl(54, 100%, 61%)",
    "hsl(82, 100%, 61%)",
    "hsl(114, 100%, 61%)",
    "hsl(176, 100%, 61%)",
    "hsl(224, 100%, 61%)",
    "hsl(270, 100%, 61%)",
    "hsl(320, 100%, 61%)",
    "hsl(360, 100%, 61%)",
];

/// A blockchain participating in the messaging network.
///
/// The discriminant is the network's own 1-based chain id, which is also the
/// category key used in every statistics response (`"1"` → Solana, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chain {
    Solana = 1,
    Ethereum = 2,
    Terra = 3,
    Bsc = 4,
    Polygon = 5,
    Avalanche = 6,
    Oasis = 7,
    Algorand = 8,
    Aurora = 9,
    Fantom = 10,
}

impl Chain {
    /// Every known chain, ordered by id.
    pub const ALL: [Chain; 10] = [
        Chain::Solana,
        Chain::Ethereum,
        Chain::Terra,
        Chain::Bsc,
        Chain::Polygon,
        Chain::Avalanche,
        Chain::Oasis,
        Chain::Algorand,
        Chain::Aurora,
        Chain::Fantom,
    ];

    /// Chains that always get a stat card, even with no recorded value.
    pub const LAUNCH_CHAINS: [Chain; 7] = [
        Chain::Solana,
        Chain::Ethereum,
        Chain::Terra,
        Chain::Bsc,
        Chain::Polygon,
        Chain::Avalanche,
        Chain::Oasis,
    ];

    pub fn from_id(id: u16) -> Option<Chain> {
        Chain::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// Parse a category key from a statistics response.
    /// Excluded keys and anything not in the chain table yield `None`.
    pub fn from_key(key: &str) -> Option<Chain> {
        if is_excluded(key) {
            return None;
        }
        key.parse::<u16>().ok().and_then(Chain::from_id)
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    /// The category key for this chain in statistics responses.
    pub fn key(self) -> String {
        self.id().to_string()
    }

    pub fn name(self) -> &'static str {
        match self {
            Chain::Solana => "Solana",
            Chain::Ethereum => "Ethereum",
            Chain::Terra => "Terra",
            Chain::Bsc => "BSC",
            Chain::Polygon => "Polygon",
            Chain::Avalanche => "Avalanche",
            Chain::Oasis => "Oasis",
            Chain::Algorand => "Algorand",
            Chain::Aurora => "Aurora",
            Chain::Fantom => "Fantom",
        }
    }

    /// Reserved brand color, if this chain has one.
    pub fn reserved_color(self) -> Option<&'static str> {
        match self {
            Chain::Solana => Some("hsl(297, 100%, 61%)"),
            Chain::Ethereum => Some("hsl(235, 5%, 43%)"),
            Chain::Terra => Some("hsl(205, 100%, 48%)"),
            Chain::Bsc => Some("hsl(54, 100%, 61%)"),
            Chain::Polygon => Some("hsl(271, 100%, 61%)"),
            Chain::Avalanche => Some("hsl(360, 100%, 61%)"),
            Chain::Oasis => Some("hsl(204, 100%, 48%)"),
            Chain::Fantom => Some("hsl(220, 100%, 61%)"),
            Chain::Algorand | Chain::Aurora => None,
        }
    }

    /// Display names of every known chain, in id order. Used as bar-chart keys.
    pub fn names() -> Vec<String> {
        Chain::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

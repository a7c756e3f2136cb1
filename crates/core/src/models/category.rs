use super::chain::{is_excluded, Chain, FALLBACK_PALETTE};
use super::filter::{FilterContext, GroupBy};

/// A response key resolved to something a chart can display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Category {
    /// Sort key: chain id first, then the raw key.
    pub order: (u16, String),
    pub name: String,
    pub chain: Option<Chain>,
}

/// How response keys map to chart categories.
///
/// Network-wide responses are keyed by chain id (`"2"`); once a chain is
/// selected the service groups by emitter (`"2:0000…3ee18b"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScheme {
    Chains,
    Addresses,
}

impl CategoryScheme {
    pub fn for_filter(filter: &FilterContext) -> Self {
        match filter.group_by() {
            GroupBy::Chain => CategoryScheme::Chains,
            GroupBy::Address => CategoryScheme::Addresses,
        }
    }

    /// Resolve one key. Excluded and unknown keys yield `None`.
    pub fn resolve(self, key: &str) -> Option<Category> {
        if is_excluded(key) {
            return None;
        }
        match self {
            CategoryScheme::Chains => {
                let chain = Chain::from_key(key)?;
                Some(Category {
                    order: (chain.id(), String::new()),
                    name: chain.name().to_string(),
                    chain: Some(chain),
                })
            }
            CategoryScheme::Addresses => {
                let (chain_part, address) = key.split_once(':')?;
                let chain_id = chain_part.parse::<u16>().ok()?;
                if address.is_empty() || is_excluded(chain_part) {
                    return None;
                }
                Some(Category {
                    order: (chain_id, address.to_string()),
                    name: address.to_string(),
                    chain: None,
                })
            }
        }
    }

    /// Resolve every key of one date's values, sorted by category order.
    pub fn resolve_all<'a, I>(self, values: I) -> Vec<(Category, f64)>
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let mut resolved: Vec<(Category, f64)> = values
            .into_iter()
            .filter_map(|(key, value)| self.resolve(key).map(|c| (c, *value)))
            .collect();
        resolved.sort_by(|a, b| a.0.cmp(&b.0));
        resolved
    }

    /// Legend keys a bar chart always shows for this scheme.
    pub fn fixed_keys(self) -> Vec<String> {
        match self {
            CategoryScheme::Chains => Chain::names(),
            CategoryScheme::Addresses => Vec::new(),
        }
    }
}

/// Assigns series colors: reserved chain colors first, otherwise the next
/// unused fallback palette entry in the order categories are first seen.
///
/// One assigner lives for exactly one render so the result is deterministic.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    assigned: Vec<(String, &'static str)>,
    next_fallback: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, category: &Category) -> String {
        if let Some(color) = category.chain.and_then(Chain::reserved_color) {
            return color.to_string();
        }
        if let Some((_, color)) = self.assigned.iter().find(|(name, _)| *name == category.name) {
            return color.to_string();
        }
        // Palette wraps once more than ten categories lack a reserved color.
        let color = FALLBACK_PALETTE[self.next_fallback % FALLBACK_PALETTE.len()];
        self.next_fallback += 1;
        self.assigned.push((category.name.clone(), color));
        color.to_string()
    }
}

pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod views;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use errors::CoreError;
use models::settings::Settings;
use providers::cloud_functions::CloudFunctionsProvider;
use providers::traits::StatsProvider;
use views::counts::CountsView;
use views::transfers::TransfersView;
use views::tvl::TvlView;
use views::DashboardView;

/// The dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Messages,
    Nfts,
    Transfers,
    Tvl,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Messages,
        ViewKind::Nfts,
        ViewKind::Transfers,
        ViewKind::Tvl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Messages => "messages",
            ViewKind::Nfts => "nfts",
            ViewKind::Transfers => "transfers",
            ViewKind::Tvl => "tvl",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Config(format!("Unknown view: {s}")))
    }
}

/// Main entry point of the core library.
///
/// Holds the settings and the statistics provider every view fetches from.
/// Views are created on demand and own their polling sources; dropping a
/// view stops its polling.
#[must_use]
pub struct Dashboard {
    provider: Arc<dyn StatsProvider>,
    settings: Settings,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Dashboard {
    /// Dashboard backed by the HTTP statistics service of `settings.network`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let provider = Arc::new(CloudFunctionsProvider::from_settings(&settings));
        Ok(Self { provider, settings })
    }

    /// Dashboard backed by any provider (tests, alternative back ends).
    pub fn with_provider(provider: Arc<dyn StatsProvider>, settings: Settings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn provider(&self) -> Arc<dyn StatsProvider> {
        Arc::clone(&self.provider)
    }

    pub fn messages(&self) -> CountsView {
        CountsView::messages(self.provider(), self.settings.poll_interval())
    }

    pub fn nfts(&self) -> CountsView {
        CountsView::nfts(self.provider(), self.settings.poll_interval())
    }

    pub fn transfers(&self) -> TransfersView {
        TransfersView::new(self.provider(), self.settings.poll_interval())
    }

    pub fn tvl(&self) -> TvlView {
        TvlView::new(self.provider(), self.settings.poll_interval())
    }

    /// Any page behind the common view interface.
    pub fn view(&self, kind: ViewKind) -> Box<dyn DashboardView> {
        match kind {
            ViewKind::Messages => Box::new(self.messages()),
            ViewKind::Nfts => Box::new(self.nfts()),
            ViewKind::Transfers => Box::new(self.transfers()),
            ViewKind::Tvl => Box::new(self.tvl()),
        }
    }
}

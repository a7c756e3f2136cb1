//! bridge-stats - cross-chain messaging statistics from the command line

use anyhow::{Context, Result};
use bridge_stats_core::models::filter::FilterContext;
use bridge_stats_core::models::settings::{Network, Settings};
use bridge_stats_core::services::polling_service::SourceReport;
use bridge_stats_core::views::DashboardView;
use bridge_stats_core::{Dashboard, ViewKind};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "bridge-stats",
    version,
    about = "Cross-chain messaging statistics as chart-ready JSON",
    long_about = "Fetches the statistics of one dashboard page and prints its chart models as JSON.\n\
                  \n\
                  Examples:\n\
                    bridge-stats messages                      # Network-wide message counts\n\
                    bridge-stats messages --chain 2            # Emitters on Ethereum\n\
                    bridge-stats tvl --watch --interval 30     # Keep polling, print on change\n\
                  \n\
                  Environment Variables:\n\
                    BRIDGE_STATS_NETWORK                       # mainnet|testnet|devnet\n\
                    BRIDGE_STATS_BASE_URL                      # Override the service base URL\n\
                    BRIDGE_STATS_CONFIG                        # TOML settings file\n\
                    RUST_LOG                                   # Log filter (default bridge_stats=info)"
)]
struct Cli {
    /// Dashboard page: messages, nfts, transfers or tvl
    view: ViewKind,

    /// Statistics deployment to read from
    #[arg(long, env = "BRIDGE_STATS_NETWORK")]
    network: Option<Network>,

    /// Base URL the endpoint name is appended to
    #[arg(long, env = "BRIDGE_STATS_BASE_URL")]
    base_url: Option<String>,

    /// TOML settings file
    #[arg(long, env = "BRIDGE_STATS_CONFIG")]
    config: Option<PathBuf>,

    /// Restrict to one emitter chain (numeric chain id)
    #[arg(long)]
    chain: Option<u16>,

    /// Restrict to one emitter address on --chain
    #[arg(long, requires = "chain")]
    address: Option<String>,

    /// Keep polling and print every new dataset until Ctrl-C
    #[arg(long)]
    watch: bool,

    /// Seconds between polls
    #[arg(long, env = "BRIDGE_STATS_INTERVAL")]
    interval: Option<u64>,
}

impl Cli {
    /// File settings, overridden by environment and flags.
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(network) = self.network {
            settings.network = network;
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(secs) = self.interval {
            settings.poll_interval_secs = secs;
        }
        settings.validate()?;
        Ok(settings)
    }

    fn filter(&self) -> FilterContext {
        match (self.chain, &self.address) {
            (Some(chain), Some(address)) => FilterContext::for_address(chain, address.clone()),
            (Some(chain), None) => FilterContext::for_chain(chain),
            _ => FilterContext::network(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bridge_stats=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    let filter = cli.filter();
    info!(
        network = %settings.network,
        base_url = settings.base_url(),
        view = %cli.view,
        %filter,
        "bridge-stats v{}",
        env!("CARGO_PKG_VERSION")
    );

    let dashboard = Dashboard::new(settings)?;
    let view = dashboard.view(cli.view);

    if cli.watch {
        run_watch(view.as_ref(), filter).await
    } else {
        run_once(view.as_ref(), filter).await
    }
}

async fn run_once(view: &dyn DashboardView, filter: FilterContext) -> Result<()> {
    let reports = view.load_once(filter).await;
    log_failures(&reports);
    print_charts(view)?;
    Ok(())
}

async fn run_watch(view: &dyn DashboardView, filter: FilterContext) -> Result<()> {
    view.start(filter);

    let mut check = tokio::time::interval(Duration::from_secs(1));
    let mut last_seen: Vec<SourceReport> = Vec::new();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
            _ = check.tick() => {
                let reports = view.reports();
                if fetch_times(&reports) != fetch_times(&last_seen) {
                    print_charts(view)?;
                }
                if reports != last_seen {
                    log_failures(&reports);
                    last_seen = reports;
                }
            }
        }
    }

    view.stop();
    Ok(())
}

fn fetch_times(reports: &[SourceReport]) -> Vec<Option<String>> {
    reports
        .iter()
        .map(|r| r.last_fetched.map(|t| t.to_rfc3339()))
        .collect()
}

fn log_failures(reports: &[SourceReport]) {
    for report in reports {
        if let Some(error) = &report.error {
            warn!(source = %report.source, %error, "Source failed");
        }
    }
}

fn print_charts(view: &dyn DashboardView) -> Result<()> {
    match view.charts_json()? {
        Some(charts) => println!("{}", serde_json::to_string_pretty(&charts)?),
        None => info!(view = view.title(), "No data for this selection"),
    }
    Ok(())
}

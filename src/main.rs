use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use theme_update_checker::catalog::api::HttpCatalogApi;
use theme_update_checker::catalog::cache::Cache;
use theme_update_checker::catalog::channel::{ConfiguredChannel, ReleaseChannel};
use theme_update_checker::catalog::provider::CatalogProvider;
use theme_update_checker::config::{UpdaterConfig, data_dir, db_path, log_path};
use theme_update_checker::theme::enumerator::DirectoryThemeEnumerator;
use theme_update_checker::updater::listing::UpdateListing;
use theme_update_checker::updater::resolver::UpdateResolver;
use theme_update_checker::updater::scheduler::{Trigger, UpdateScheduler};

#[derive(Parser)]
#[command(name = "theme-update-checker")]
#[command(version, about = "Detects available theme updates from the remote catalog")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check installed themes and update the listing file
    Check {
        /// Directory holding one folder per installed theme
        #[arg(long)]
        themes_dir: PathBuf,

        /// Update listing JSON file, created when missing
        #[arg(long)]
        listing: PathBuf,

        /// What triggered the check: admin, background, cli or frontend
        #[arg(long, default_value = "cli")]
        trigger: String,
    },
    /// Manage the catalog cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop the cached catalog so the next check fetches fresh data
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    let _guard = init_logging(&log_path());

    let config = match &cli.config {
        Some(path) => UpdaterConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => UpdaterConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Check {
            themes_dir,
            listing,
            trigger,
        } => {
            let trigger = trigger
                .parse::<Trigger>()
                .map_err(|_| anyhow!("Unknown trigger: {}", trigger))?;
            runtime.block_on(check(&config, &themes_dir, &listing, trigger))
        }
        Command::Cache {
            action: CacheAction::Clear,
        } => {
            build_provider(&config)?.invalidate();
            println!("Catalog cache cleared");
            Ok(())
        }
    }
}

fn init_logging(path: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "theme-update-checker.log".to_string());

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("THEME_UPDATE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}

fn build_provider(config: &UpdaterConfig) -> anyhow::Result<CatalogProvider<Cache>> {
    let channel = config
        .channel
        .parse::<ReleaseChannel>()
        .map_err(|_| anyhow!("Unknown release channel: {}", config.channel))?;

    let cache = Cache::new(&db_path()).context("Failed to open transient store")?;
    let api = HttpCatalogApi::new(&config.theme_data_url()).context("Failed to create API client")?;

    Ok(CatalogProvider::new(
        Arc::new(cache),
        Arc::new(api),
        Arc::new(ConfiguredChannel::new(channel)),
    )
    .with_ttl(Duration::from_secs(config.cache.ttl_secs)))
}

async fn check(
    config: &UpdaterConfig,
    themes_dir: &Path,
    listing_path: &Path,
    trigger: Trigger,
) -> anyhow::Result<()> {
    let enumerator = Arc::new(DirectoryThemeEnumerator::new(themes_dir));
    let listing = UpdateListing::load_or_init(listing_path, enumerator.as_ref())?;

    let scheduler = UpdateScheduler::new(UpdateResolver::new(build_provider(config)?), enumerator)
        .with_timeout(Duration::from_millis(config.fetch_timeout_ms));

    let listing = scheduler.run(trigger, listing).await;

    let content = serde_json::to_string_pretty(&listing)?;
    std::fs::write(listing_path, content)
        .with_context(|| format!("Failed to write listing {:?}", listing_path))?;

    info!("{} updates available", listing.response.len());
    for descriptor in listing.response.values() {
        println!(
            "{}: {} available ({})",
            descriptor.slug, descriptor.new_version, descriptor.info_uri
        );
    }

    Ok(())
}

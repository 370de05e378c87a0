mod config;
mod error;
mod models;
mod output;
mod scrapers;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use config::{Config, DEFAULT_CONFIG_PATH};
use models::PropertyRecord;
use scrapers::{ChromeSession, MetrocuadradoScraper};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "m2-scout")]
#[command(about = "Collects commercial property listings from metrocuadrado.com", long_about = None)]
struct Args {
    /// Path to the YAML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// City to search; repeat for several. Replaces the configured list
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Run Chrome without a window
    #[arg(long)]
    headless: bool,

    /// Directory for the CSV output
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write the listings as pretty JSON
    #[arg(long)]
    json: bool,

    /// Save page HTML and a screenshot here when the scrape fails
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if !self.cities.is_empty() {
            config.cities = self.cities.clone();
        }
        if self.headless {
            config.headless = true;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.debug_dir {
            config.debug_dir = Some(dir.clone());
        }
    }
}

fn init_tracing(level: &str) {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
        return;
    }

    let max_level = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        other => {
            eprintln!("Invalid tracing level '{}', using 'info'", other);
            tracing::Level::INFO
        }
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();
}

/// Drive one Chrome session through every city. Blocking.
fn run_scrape(config: &Config) -> Result<Vec<PropertyRecord>> {
    let session = ChromeSession::launch(config.headless, config.site.timings.element_timeout())?;

    let result = MetrocuadradoScraper::new(&session, &config.site, config.retry)
        .and_then(|mut scraper| scraper.scrape(&config.base_url, &config.cities));

    if let (Err(e), Some(dir)) = (&result, &config.debug_dir) {
        error!("Scrape failed: {}", e);
        if let Err(dump_err) = output::write_debug_snapshot(&session, dir) {
            warn!("Could not save debug snapshot: {:#}", dump_err);
        }
    }

    if let Err(e) = session.close() {
        warn!("{:#}", e);
    }
    Ok(result?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        Config::create_default(&args.config)?;
        println!("Wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);
    init_tracing(&config.tracing_level);
    config.validate()?;

    info!("🏢 m2-scout - metrocuadrado.com commercial listings");
    info!("Cities: {}", config.cities.join(", "));

    let started = Utc::now();
    let scrape_config = config.clone();
    let records = tokio::task::spawn_blocking(move || run_scrape(&scrape_config))
        .await
        .context("Scrape task panicked")??;

    info!("✅ Scraped {} listings", records.len());

    output::write_csv(&config.output_dir, &records, started).await?;
    if args.json {
        output::write_json(&config.output_dir, &records, started).await?;
    }

    Ok(())
}

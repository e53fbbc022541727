//! catwatch CLI
//!
//! Polls the adoption listing on a fixed interval and emails a digest
//! whenever new cats appear. Configuration comes from a TOML file
//! (`CATWATCH_CONFIG`, default `data/config.toml`); mail secrets come from
//! `MY_ADDRESS`, `PASSWORD` and `RECIPIENT`.

use std::path::PathBuf;
use std::sync::Arc;

use catwatch::{
    error::Result,
    models::{Config, Credentials},
    pipeline::{self, CatChecker},
    services::{DigestFormatter, HttpListingSource, SmtpMailer},
    storage::LocalStorage,
};
use clap::Parser;

const CONFIG_VAR: &str = "CATWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "data/config.toml";

/// catwatch - new cat alerts by email
#[derive(Parser, Debug)]
#[command(name = "catwatch", version, about = "Emails a digest when new cats are listed")]
struct Cli {}

/// Initialize logging; `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config_path = std::env::var(CONFIG_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let loaded = Config::load(&config_path);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    init_logging(&config.logging.level);

    log::info!("catwatch starting...");
    match loaded {
        Ok(_) => log::info!("Loaded configuration from {}", config_path.display()),
        Err(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    let credentials = Credentials::from_env().inspect_err(|e| log::error!("{}", e))?;

    let checker = CatChecker::new(
        Arc::new(HttpListingSource::new(&config.source)?),
        Arc::new(LocalStorage::new(&config.storage.state_file)),
        Arc::new(SmtpMailer::new(&config.mail, &credentials)?),
        DigestFormatter::new(&config.source.site_base_url)?,
        config.digest.age_style,
    );

    pipeline::run_schedule(&checker, &config.schedule).await
}

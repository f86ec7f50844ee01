pub mod cli;
pub mod config;

use anyhow::Context;
use clap::Parser;

use crate::{
    logging::{self, LoggingConfig},
    ranges,
    source::{self, CountryCode},
    store,
};

pub fn execute() -> anyhow::Result<()> {
    let app = cli::CliApp::parse();
    let config = config::Config::extract(&app).context("invalid configuration")?;

    logging::init(LoggingConfig::from_config(&config));

    tracing::debug!(config = ?config);

    match app.command {
        cli::Commands::Run => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Tokio runtime should be able to start up")
            .block_on(run(&config)),
    }
}

/// One fetch, expand, write cycle.
async fn run(config: &config::Config) -> anyhow::Result<()> {
    let country = CountryCode::new(config.country.clone());

    let sources = source::all_sources(config).context("failed to build the HTTP client")?;
    let tokens = source::collect_ranges(&sources, &country).await;
    tracing::info!(country = %country, tokens = tokens.len(), "collected range tokens");

    let existing = store::load_existing(&config.output);
    if !existing.is_empty() {
        // Reported but never merged; the file is rebuilt from scratch so
        // entries no longer allocated to the country drop out.
        tracing::info!(entries = existing.len(), "replacing existing blocklist");
    }

    let addresses = ranges::expand(tokens.iter().map(String::as_str));

    store::save(&config.output, &addresses)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    tracing::info!(
        path = %config.output.display(),
        addresses = addresses.len(),
        "blocklist saved"
    );

    Ok(())
}

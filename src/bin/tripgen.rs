//! tripgen CLI Binary
//!
//! Command-line host for the itinerary generation workflow.

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::process;
use tracing::{error, info};
use tripgen::auth::TokenStore;
use tripgen::cli::{Cli, RunContext};
use tripgen::config::{ConfigLoader, TripgenConfig};
use tripgen::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(backend = %config.backend.base_url, "tripgen starting");

    let context = match TokenStore::default_location()
        .and_then(|tokens| RunContext::new(config, tokens))
    {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing client: {}", e);
            eprintln!("{}", tripgen::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command).await {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", tripgen::cli::map_error(&e));
            process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<TripgenConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load(Path::new(".")).context("Failed to load configuration")?,
    };
    if let Some(url) = &cli.api_url {
        config.backend.base_url = url.clone();
    }
    apply_logging_flags(cli, &mut config);
    config
        .validate()
        .map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Invalid configuration:\n{}", messages.join("\n"))
        })?;
    Ok(config)
}

/// Precedence: CLI flags override config file override defaults.
fn apply_logging_flags(cli: &Cli, config: &mut TripgenConfig) {
    let logging = &mut config.logging;
    if cli.quiet {
        logging.enabled = false;
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }
}

//! txform main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use txform_api::start_server;
use txform_config::{Config, ConfigError};
use txform_core::HttpCalculationBackend;

#[derive(Parser, Debug)]
#[command(name = "txform")]
#[command(author = "txform Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Transaction form that forwards VAT and interest calculations to a backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // A missing file falls back to defaults; a broken one stops start-up.
    let (config, missing) = match Config::load(args.config.clone()) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.report());
            anyhow::bail!("Failed to load configuration from {}", args.config.display());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if missing {
        log::warn!(
            "Config file {} not found, using built-in defaults",
            args.config.display()
        );
    }

    let endpoint_url = config.backend.endpoint_url();
    log::info!("Calculation backend: {}", endpoint_url);

    let backend = HttpCalculationBackend::new(&endpoint_url)
        .with_context(|| format!("Failed to create backend client for {}", endpoint_url))?;

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, Arc::new(backend)))
}

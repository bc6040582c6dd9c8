//! Pantry CLI - Grocery analytics from a record file
//!
//! Usage:
//!   pantry report --file items.csv              Full analytics summary
//!   pantry buckets --file items.json -g monthly Spend per month
//!   pantry freshness --file items.csv           Expiration status
//!   pantry insights --file items.csv --json     Insights as JSON
//!   pantry config                               Resolved engine config

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Report { input } => commands::cmd_report(&config, &input),
        Commands::Buckets { input, granularity } => {
            let granularity: Granularity = granularity
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            commands::cmd_buckets(&config, &input, granularity)
        }
        Commands::Freshness { input } => commands::cmd_freshness(&config, &input),
        Commands::Insights { input } => commands::cmd_insights(&config, &input),
        Commands::Config { json } => commands::cmd_config(&config, cli.config.as_deref(), json),
    }
}

//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

/// Pantry - Grocery spend, freshness and budget insights
#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Grocery and pantry analytics from a record file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the data dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every analytics command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Record file to analyze (.csv or .json)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Weekly grocery budget
    #[arg(short, long, default_value = "100")]
    pub budget: f64,

    /// Analyze as of this date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub today: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full analytics summary
    Report {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Spend per week or month
    Buckets {
        #[command(flatten)]
        input: InputArgs,

        /// Granularity: weekly, monthly
        #[arg(short, long, default_value = "weekly")]
        granularity: String,
    },

    /// Expiration status of current pantry stock
    Freshness {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Generated insights
    Insights {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the resolved engine configuration
    Config {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Bucket series granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Weekly,
    Monthly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(format!(
                "Unknown granularity: {}. Available: weekly, monthly",
                s
            )),
        }
    }
}

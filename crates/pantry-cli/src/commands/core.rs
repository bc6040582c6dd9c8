//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the engine configuration
//! - `load_records` - Read and normalize a record file
//! - `resolve_now` - Turn `--today` (or the host clock) into "now"
//! - `run_analysis` - One full analytics pass for a command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pantry_core::import::load_file;
use pantry_core::{normalize_batch, AnalyticsReport, EngineConfig, NormalizedBatch, PantryAnalytics};
use tracing::{info, warn};

use crate::cli::InputArgs;

/// Explicit config file if given, otherwise the data dir override or defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => EngineConfig::load().context("Failed to load engine config"),
    }
}

/// Read a record file and normalize it. Rejected records are logged and
/// skipped.
pub fn load_records(path: &Path) -> Result<NormalizedBatch> {
    let raws =
        load_file(path).with_context(|| format!("Failed to read records from {}", path.display()))?;
    let batch = normalize_batch(&raws);

    info!(
        file = %path.display(),
        accepted = batch.records.len(),
        rejected = batch.rejected.len(),
        "Loaded records"
    );
    if !batch.rejected.is_empty() {
        warn!(
            "{} record(s) skipped; run with --verbose for details",
            batch.rejected.len()
        );
    }

    Ok(batch)
}

/// "Now" for an analytics pass. An explicit `--today` maps to the last
/// second of that day so records logged on it still count.
pub fn resolve_now(today: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(today) = today else {
        return Ok(Utc::now());
    };

    let date = NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d")
        .context("Invalid --today date format (use YYYY-MM-DD)")?;
    let end_of_day = date
        .and_hms_opt(23, 59, 59)
        .context("Invalid --today date")?;
    Ok(Utc.from_utc_datetime(&end_of_day))
}

/// Load, normalize and analyze the input file
pub fn run_analysis(config: &EngineConfig, input: &InputArgs) -> Result<AnalyticsReport> {
    let now = resolve_now(input.today.as_deref())?;
    let batch = load_records(&input.file)?;

    if !input.budget.is_finite() || input.budget < 0.0 {
        warn!(budget = input.budget, "Budget is not a positive amount; treating as 0");
    }

    let analytics = PantryAnalytics::new(config.clone());
    Ok(analytics.run(&batch.records, input.budget, now))
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

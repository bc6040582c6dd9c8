//! Engine configuration command

use std::path::{Path, PathBuf};

use anyhow::Result;
use pantry_core::config::default_config_path;
use pantry_core::{EngineConfig, InsightEngine};
use serde::Serialize;

use super::print_json;

/// Where the active config came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Override(PathBuf),
    Embedded,
}

impl ConfigSource {
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::Override(path),
            _ => Self::Embedded,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Explicit(path) => format!("{} (--config)", path.display()),
            Self::Override(path) => format!("{} (override)", path.display()),
            Self::Embedded => "built-in defaults".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ConfigOutput<'a> {
    source: ConfigSource,
    config: &'a EngineConfig,
}

pub fn cmd_config(config: &EngineConfig, explicit: Option<&Path>, json: bool) -> Result<()> {
    let source = ConfigSource::resolve(explicit);

    if json {
        return print_json(&ConfigOutput { source, config });
    }

    println!();
    println!("⚙️  Engine Configuration");
    println!("   ─────────────────────────────────────────────");
    println!("   Source: {}", source.describe());
    if source == ConfigSource::Embedded {
        if let Some(path) = default_config_path() {
            println!("   Override location: {}", path.display());
        }
    }

    println!();
    println!("   Windows");
    println!("     this_week_days         {}", config.this_week_days);
    println!("     expiring_soon_days     {}", config.expiring_soon_days);
    println!("     frequency_window_days  {}", config.frequency_window_days);
    println!("     retained_weeks         {}", config.retained_weeks);

    println!("   Efficiency");
    println!("     waste_weight           {}", config.efficiency_waste_weight);
    println!("     budget_weight          {}", config.efficiency_budget_weight);
    println!("     baseline               {}", config.efficiency_baseline);
    println!("     good_score             {}", config.efficiency_good_score);
    println!("     max_waste_percent      {}", config.efficiency_max_waste_percent);
    println!("     target_floor           {}", config.efficiency_target_floor);
    println!("     target_step            {}", config.efficiency_target_step);

    println!("   Insights");
    println!("     waste_recovery_rate    {}", config.waste_recovery_rate);
    println!("     waste_high_budget_share {}", config.waste_high_budget_share);
    println!("     expiring_high_count    {}", config.expiring_high_count);
    println!("     bulk_savings_rate      {}", config.bulk_savings_rate);
    println!("     tracking_savings_rate  {}", config.tracking_savings_rate);
    println!("     trend_lookback_weeks   {}", config.trend_lookback_weeks);
    println!("     trend_min_weeks        {}", config.trend_min_weeks);
    println!("     trend_drop_percent     {}", config.trend_drop_percent);
    println!("     max_insights           {}", config.max_insights);

    println!("   Rules (evaluation order)");
    for (id, name) in InsightEngine::new().rule_names() {
        println!("     {:<22} {}", id, name);
    }
    println!();

    Ok(())
}

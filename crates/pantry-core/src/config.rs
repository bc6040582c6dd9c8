//! Engine configuration
//!
//! Every tunable constant used by the classifier, the trend analyzer and
//! the insight rules lives here as a named field.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/pantry/config/engine.toml)
//! 2. Embedded defaults (compiled into binary)
//!
//! Override files may be partial; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Upper bound for day windows (about a century)
const MAX_WINDOW_DAYS: i64 = 36_500;

/// Upper bound for week counts (about a century)
const MAX_WINDOW_WEEKS: i64 = 5_200;

/// Tuning for an analytics pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    /// Days ahead counted as "this week"
    pub this_week_days: i64,
    /// Window for the upcoming-expirations alert
    pub expiring_soon_days: i64,
    /// Trailing window for the frequency index
    pub frequency_window_days: i64,
    /// Most recent weeks fed to the budget analyzer
    pub retained_weeks: usize,

    // Efficiency score: waste × waste_weight + (1 − usage) × budget_weight + baseline
    pub efficiency_waste_weight: f64,
    pub efficiency_budget_weight: f64,
    pub efficiency_baseline: f64,
    pub efficiency_good_score: f64,
    pub efficiency_max_waste_percent: f64,
    pub efficiency_target_floor: f64,
    pub efficiency_target_step: f64,

    pub waste_recovery_rate: f64,
    pub waste_high_budget_share: f64,
    pub expiring_high_count: usize,
    pub bulk_savings_rate: f64,
    pub tracking_savings_rate: f64,
    pub trend_lookback_weeks: i64,
    pub trend_min_weeks: usize,
    pub trend_drop_percent: f64,
    /// Cap applied after all rules run, in rule order
    pub max_insights: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            this_week_days: 7,
            expiring_soon_days: 2,
            frequency_window_days: 30,
            retained_weeks: 8,
            efficiency_waste_weight: 0.4,
            efficiency_budget_weight: 60.0,
            efficiency_baseline: 40.0,
            efficiency_good_score: 60.0,
            efficiency_max_waste_percent: 20.0,
            efficiency_target_floor: 70.0,
            efficiency_target_step: 10.0,
            waste_recovery_rate: 0.7,
            waste_high_budget_share: 0.1,
            expiring_high_count: 3,
            bulk_savings_rate: 0.15,
            tracking_savings_rate: 0.08,
            trend_lookback_weeks: 4,
            trend_min_weeks: 4,
            trend_drop_percent: 10.0,
            max_insights: 6,
        }
    }
}

impl EngineConfig {
    /// Load from the default override location, falling back to defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Load from an explicit file. Unlike [`EngineConfig::load`], a missing
    /// file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded engine config override");
        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pantry").join("config").join("engine.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    windows: Option<RawWindows>,
    efficiency: Option<RawEfficiency>,
    insights: Option<RawInsights>,
}

#[derive(Debug, Deserialize)]
struct RawWindows {
    this_week_days: Option<i64>,
    expiring_soon_days: Option<i64>,
    frequency_window_days: Option<i64>,
    retained_weeks: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawEfficiency {
    waste_weight: Option<f64>,
    budget_weight: Option<f64>,
    baseline: Option<f64>,
    good_score: Option<f64>,
    max_waste_percent: Option<f64>,
    target_floor: Option<f64>,
    target_step: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    waste_recovery_rate: Option<f64>,
    waste_high_budget_share: Option<f64>,
    expiring_high_count: Option<usize>,
    bulk_savings_rate: Option<f64>,
    tracking_savings_rate: Option<f64>,
    trend_lookback_weeks: Option<i64>,
    trend_min_weeks: Option<usize>,
    trend_drop_percent: Option<f64>,
    max_insights: Option<usize>,
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Parse config from TOML content, layering it over the defaults
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(w) = raw.windows {
        apply(&mut config.this_week_days, w.this_week_days);
        apply(&mut config.expiring_soon_days, w.expiring_soon_days);
        apply(&mut config.frequency_window_days, w.frequency_window_days);
        apply(&mut config.retained_weeks, w.retained_weeks);
    }

    if let Some(e) = raw.efficiency {
        apply(&mut config.efficiency_waste_weight, e.waste_weight);
        apply(&mut config.efficiency_budget_weight, e.budget_weight);
        apply(&mut config.efficiency_baseline, e.baseline);
        apply(&mut config.efficiency_good_score, e.good_score);
        apply(&mut config.efficiency_max_waste_percent, e.max_waste_percent);
        apply(&mut config.efficiency_target_floor, e.target_floor);
        apply(&mut config.efficiency_target_step, e.target_step);
    }

    if let Some(i) = raw.insights {
        apply(&mut config.waste_recovery_rate, i.waste_recovery_rate);
        apply(&mut config.waste_high_budget_share, i.waste_high_budget_share);
        apply(&mut config.expiring_high_count, i.expiring_high_count);
        apply(&mut config.bulk_savings_rate, i.bulk_savings_rate);
        apply(&mut config.tracking_savings_rate, i.tracking_savings_rate);
        apply(&mut config.trend_lookback_weeks, i.trend_lookback_weeks);
        apply(&mut config.trend_min_weeks, i.trend_min_weeks);
        apply(&mut config.trend_drop_percent, i.trend_drop_percent);
        apply(&mut config.max_insights, i.max_insights);
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    if config.this_week_days < 0 || config.expiring_soon_days < 0 {
        return Err(Error::Config("Day windows must not be negative".to_string()));
    }
    if config.frequency_window_days < 1 {
        return Err(Error::Config(
            "frequency_window_days must be at least 1".to_string(),
        ));
    }
    if config.retained_weeks == 0 {
        return Err(Error::Config("retained_weeks must be at least 1".to_string()));
    }
    if config.trend_lookback_weeks < 1 {
        return Err(Error::Config(
            "trend_lookback_weeks must be at least 1".to_string(),
        ));
    }
    let days = [
        ("this_week_days", config.this_week_days),
        ("expiring_soon_days", config.expiring_soon_days),
        ("frequency_window_days", config.frequency_window_days),
    ];
    if let Some((name, _)) = days.iter().find(|(_, v)| *v > MAX_WINDOW_DAYS) {
        return Err(Error::Config(format!(
            "{} must be at most {}",
            name, MAX_WINDOW_DAYS
        )));
    }
    let weeks = [
        ("retained_weeks", i64::try_from(config.retained_weeks).unwrap_or(i64::MAX)),
        ("trend_lookback_weeks", config.trend_lookback_weeks),
    ];
    if let Some((name, _)) = weeks.iter().find(|(_, v)| *v > MAX_WINDOW_WEEKS) {
        return Err(Error::Config(format!(
            "{} must be at most {}",
            name, MAX_WINDOW_WEEKS
        )));
    }
    Ok(())
}

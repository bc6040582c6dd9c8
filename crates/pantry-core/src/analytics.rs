//! Full analytics pass
//!
//! Runs normalizer output through bucketing, expiration classification,
//! budget metrics and the insight engine. "Now" and the weekly budget are
//! always passed in; nothing here reads the clock or touches storage, so
//! the same inputs always give the same report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::buckets::{month_buckets, recent_weeks, week_buckets};
use crate::config::EngineConfig;
use crate::expiration::{classify, ExpirationSummary};
use crate::insights::{
    AnalysisContext, FrequencyIndex, Insight, InsightEngine, PriceHistoryIndex,
};
use crate::models::{ItemRecord, MonthBucket, WeekBucket};
use crate::trends::{self, BudgetMetrics};

/// Everything one pass produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub today: NaiveDate,
    /// Full sparse week series, ascending
    pub weeks: Vec<WeekBucket>,
    /// Full sparse month series, ascending
    pub months: Vec<MonthBucket>,
    /// Most recent retained weeks; the input to `metrics`
    pub recent_weeks: Vec<WeekBucket>,
    pub expiration: ExpirationSummary,
    pub metrics: BudgetMetrics,
    pub insights: Vec<Insight>,
}

/// Stateless analytics runner. Safe to share; each call allocates its own
/// output.
pub struct PantryAnalytics {
    config: EngineConfig,
    engine: InsightEngine,
}

impl Default for PantryAnalytics {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PantryAnalytics {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            engine: InsightEngine::new(),
        }
    }

    /// Use a custom insight engine (e.g. with extra rules registered)
    pub fn with_engine(config: EngineConfig, engine: InsightEngine) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &InsightEngine {
        &self.engine
    }

    /// Run the whole pipeline over `records`
    pub fn run(
        &self,
        records: &[ItemRecord],
        weekly_budget: f64,
        now: DateTime<Utc>,
    ) -> AnalyticsReport {
        let today = now.date_naive();
        let config = &self.config;

        let weeks = week_buckets(records, now);
        let months = month_buckets(records, now);
        let recent = recent_weeks(&weeks, config.retained_weeks);
        let expiration = classify(records, today, config.this_week_days);
        let metrics = trends::analyze(recent, &months, weekly_budget, &expiration, today, config);

        let price_history = PriceHistoryIndex::build(records);
        let frequency = FrequencyIndex::build(records, today, config.frequency_window_days);

        let ctx = AnalysisContext {
            records,
            today,
            weeks: &weeks,
            recent_weeks: recent,
            expiration: &expiration,
            metrics: &metrics,
            price_history: &price_history,
            frequency: &frequency,
            config,
        };
        let insights = self.engine.generate(&ctx);

        debug!(
            records = records.len(),
            weeks = weeks.len(),
            months = months.len(),
            insights = insights.len(),
            "Analytics pass complete"
        );

        let recent_weeks = recent.to_vec();
        AnalyticsReport {
            today,
            weeks,
            months,
            recent_weeks,
            expiration,
            metrics,
            insights,
        }
    }
}

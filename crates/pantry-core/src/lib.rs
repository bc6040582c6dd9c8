//! Pantry Core Library
//!
//! Analytics engine for a household grocery and pantry tracker:
//! - CSV/JSON record import and normalization
//! - Weekly and monthly spend bucketing
//! - Expiration classification and freshness
//! - Budget compliance, growth and efficiency metrics
//! - Rule-based insight engine
//! - Engine configuration (embedded defaults with a TOML override)
//!
//! Everything is a pure function of the records, the weekly budget and the
//! caller's notion of "now". The library never reads the clock.

pub mod analytics;
pub mod buckets;
pub mod config;
pub mod error;
pub mod expiration;
pub mod import;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod trends;

/// Test utilities: fixed clock and record builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{AnalyticsReport, PantryAnalytics};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use expiration::{ClassifiedItem, ExpirationSummary, Freshness};
pub use insights::{Insight, InsightEngine, InsightRule, InsightType, Severity};
pub use models::{ItemKind, ItemRecord, MonthBucket, RawItemRecord, WeekBucket};
pub use normalize::{normalize_batch, NormalizedBatch, RejectedRecord, Rejection};
pub use trends::BudgetMetrics;

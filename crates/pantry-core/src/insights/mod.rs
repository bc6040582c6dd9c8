//! Insight Engine - rule-based grocery insights
//!
//! Turns bucketed spend, freshness and budget metrics into short, typed
//! recommendations with a projected monetary impact. Rules run in a fixed
//! order and the combined output is capped (six by default) without being
//! re-sorted by severity.
//!
//! ## Built-in Rules (evaluation order)
//!
//! - **Waste Report** - spend that expired last week
//! - **Upcoming Expirations** - stock expiring within two days
//! - **Repeat Buys** - bulk-buy candidate from the frequency index
//! - **Consistency Score** - how regularly purchases are logged
//! - **Efficiency** - good week, or an opportunity to improve
//! - **Price Drop** - current items below their historical low
//! - **Cost Trend** - weekly spend down against four weeks ago
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pantry_core::insights::{AnalysisContext, InsightEngine};
//!
//! let engine = InsightEngine::new();
//! let insights = engine.generate(&ctx);
//! ```

pub mod engine;
pub mod index;
pub mod purchases;
pub mod spending;
pub mod types;
pub mod waste;

pub use engine::{AnalysisContext, InsightEngine, InsightRule};
pub use index::{FrequencyEntry, FrequencyIndex, PriceHistoryIndex, PricePoint};
pub use purchases::{PriceDropRule, RepeatBuysRule};
pub use spending::{ConsistencyRule, CostTrendRule, EfficiencyRule};
pub use types::{Insight, InsightType, Severity};
pub use waste::{UpcomingExpirationsRule, WasteReportRule};

/// Format an amount for insight text
pub(crate) fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// "1 item", "3 items"
pub(crate) fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

//! Waste insights
//!
//! - Waste Report: what expired during the past week, and what that costs
//!   over a year
//! - Upcoming Expirations: stock about to expire in the next couple of days

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Severity};
use super::{money, plural};

/// Reports pantry spend that expired during the last seven days
pub struct WasteReportRule;

impl WasteReportRule {
    /// Cost of current stock whose expiry fell within the last seven days
    pub fn last_week_waste(ctx: &AnalysisContext<'_>) -> (f64, usize) {
        let expired: Vec<_> = ctx
            .expiration
            .items
            .iter()
            .filter(|i| (-7..=-1).contains(&i.days_left))
            .collect();
        (expired.iter().map(|i| i.total_cost).sum(), expired.len())
    }
}

impl InsightRule for WasteReportRule {
    fn id(&self) -> &'static str {
        "waste-report"
    }

    fn name(&self) -> &'static str {
        "Waste Report"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let (waste_cost, count) = Self::last_week_waste(ctx);
        if waste_cost <= 0.0 {
            return vec![];
        }

        let budget = ctx.metrics.weekly_budget;
        let severity = if waste_cost > budget * ctx.config.waste_high_budget_share {
            Severity::High
        } else {
            Severity::Medium
        };
        let annual_recoverable = waste_cost * ctx.config.waste_recovery_rate * 52.0;

        vec![Insight::new(
            self.id(),
            InsightType::Warning,
            severity,
            "Food Waste Report",
            format!(
                "{} worth {} expired last week. Cutting most of that waste could save about {} a year.",
                plural(count, "item", "items"),
                money(waste_cost),
                money(annual_recoverable)
            ),
        )
        .with_action("Plan meals around what expires first and buy smaller packs of perishables")
        .with_impact(annual_recoverable)
        .with_timeframe("Last 7 days")]
    }
}

/// Warns about stock expiring within the next few days
pub struct UpcomingExpirationsRule;

impl InsightRule for UpcomingExpirationsRule {
    fn id(&self) -> &'static str {
        "expiring-soon"
    }

    fn name(&self) -> &'static str {
        "Upcoming Expirations"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let window = ctx.config.expiring_soon_days;
        let expiring = ctx.expiration.expiring_within(window);
        if expiring.is_empty() {
            return vec![];
        }

        let severity = if expiring.len() > ctx.config.expiring_high_count {
            Severity::High
        } else {
            Severity::Medium
        };

        let mut names: Vec<&str> = expiring.iter().take(3).map(|i| i.name.as_str()).collect();
        if expiring.len() > 3 {
            names.push("more");
        }
        let at_risk: f64 = expiring.iter().map(|i| i.total_cost).sum();

        vec![Insight::new(
            self.id(),
            InsightType::Warning,
            severity,
            "Use It Before You Lose It",
            format!(
                "{} ({} of food) will expire within {}: {}.",
                plural(expiring.len(), "item", "items"),
                money(at_risk),
                plural(window as usize, "day", "days"),
                names.join(", ")
            ),
        )
        .with_action("Cook with these first or freeze what you can")
        .with_timeframe(format!("Next {}", plural(window as usize, "day", "days")))]
    }
}

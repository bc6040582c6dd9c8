//! Budget and trend metrics
//!
//! Budget compliance, rolling weekly average, month-over-month growth and
//! the composite efficiency score. Every division is guarded, so no metric
//! is ever NaN or infinite.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::buckets::{month_total, previous_month};
use crate::config::EngineConfig;
use crate::expiration::ExpirationSummary;
use crate::models::{MonthBucket, WeekBucket};

/// Metrics derived from the retained week series and the month series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetMetrics {
    pub weekly_budget: f64,
    pub weeks_tracked: usize,
    pub compliant_weeks: usize,
    /// 0–100; 0 when no weeks were tracked
    pub compliance_percent: f64,
    pub weekly_average: f64,
    pub this_month_total: f64,
    pub last_month_total: f64,
    /// 0 when last month had no spend
    pub month_over_month_percent: f64,
    /// Weekly average as a fraction of the budget
    pub budget_usage: f64,
    /// 100 minus the share of stock expired or expiring this week
    pub waste_reduction: f64,
    pub efficiency_score: f64,
}

impl BudgetMetrics {
    /// Share of stock expired or expiring this week, in percent
    pub fn waste_ratio_percent(&self) -> f64 {
        100.0 - self.waste_reduction
    }
}

/// `numerator / denominator`, dividing by 1 instead when the denominator
/// is zero or not a finite number
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    let denominator = if denominator == 0.0 || !denominator.is_finite() {
        1.0
    } else {
        denominator
    };
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Negative or non-finite budgets are treated as zero
pub fn sanitize_budget(budget: f64) -> f64 {
    if budget.is_finite() && budget > 0.0 {
        budget
    } else {
        0.0
    }
}

/// Weeks at or under budget. Returns `(compliant, tracked)`.
pub fn compliant_weeks(weeks: &[WeekBucket], budget: f64) -> (usize, usize) {
    let compliant = weeks.iter().filter(|w| w.total_amount <= budget).count();
    (compliant, weeks.len())
}

/// Percentage of tracked weeks at or under budget; 0 with no weeks
pub fn budget_compliance(weeks: &[WeekBucket], budget: f64) -> f64 {
    let (compliant, tracked) = compliant_weeks(weeks, budget);
    if tracked == 0 {
        return 0.0;
    }
    compliant as f64 / tracked as f64 * 100.0
}

/// Unweighted mean of weekly totals; 0 with no weeks
pub fn weekly_average(weeks: &[WeekBucket]) -> f64 {
    if weeks.is_empty() {
        return 0.0;
    }
    weeks.iter().map(|w| w.total_amount).sum::<f64>() / weeks.len() as f64
}

/// Percent change between two monthly totals; 0 when the prior month is 0
pub fn growth_percent(this_month: f64, last_month: f64) -> f64 {
    if last_month == 0.0 {
        return 0.0;
    }
    safe_ratio(this_month - last_month, last_month) * 100.0
}

/// Composite score:
/// `waste_reduction × w + (1 − budget_usage) × b + baseline`
pub fn efficiency_score(waste_reduction: f64, budget_usage: f64, config: &EngineConfig) -> f64 {
    waste_reduction * config.efficiency_waste_weight
        + (1.0 - budget_usage) * config.efficiency_budget_weight
        + config.efficiency_baseline
}

/// Compute all budget and trend metrics.
///
/// `weeks` is the retained (most recent) slice of the week series.
pub fn analyze(
    weeks: &[WeekBucket],
    months: &[MonthBucket],
    weekly_budget: f64,
    expiration: &ExpirationSummary,
    today: NaiveDate,
    config: &EngineConfig,
) -> BudgetMetrics {
    let budget = sanitize_budget(weekly_budget);
    let (compliant, tracked) = compliant_weeks(weeks, budget);
    let average = weekly_average(weeks);

    let this_month_total = month_total(months, today);
    let last_month_total = month_total(months, previous_month(today));

    let waste_share = safe_ratio(
        expiration.at_risk_quantity() as f64,
        expiration.total_quantity as f64,
    );
    let waste_reduction = 100.0 - waste_share * 100.0;
    let budget_usage = safe_ratio(average, budget);

    BudgetMetrics {
        weekly_budget: budget,
        weeks_tracked: tracked,
        compliant_weeks: compliant,
        compliance_percent: budget_compliance(weeks, budget),
        weekly_average: average,
        this_month_total,
        last_month_total,
        month_over_month_percent: growth_percent(this_month_total, last_month_total),
        budget_usage,
        waste_reduction,
        efficiency_score: efficiency_score(waste_reduction, budget_usage, config),
    }
}

//! Spending-habit insights
//!
//! - Consistency: how regularly purchases are being logged
//! - Efficiency: composite score, either a good week or room to improve
//! - Cost Trend: weekly spend falling compared with a month ago

use chrono::Duration;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Severity};
use super::{money, plural};
use crate::buckets::{densify_weeks, week_start};

/// Share of tracked weeks with logged spend at which consistency counts
/// as an achievement
const CONSISTENT_SHARE: f64 = 0.75;

/// Rewards (or nudges) regular tracking
pub struct ConsistencyRule;

impl ConsistencyRule {
    /// `(active_weeks, tracked_weeks)` over the retained window, counting
    /// every calendar week from the first logged one up to the current one
    pub fn tracked_weeks(ctx: &AnalysisContext<'_>) -> (usize, usize) {
        let Some(first) = ctx.weeks.first() else {
            return (0, 0);
        };

        let current = week_start(ctx.today);
        let retained = i64::try_from(ctx.config.retained_weeks.max(1)).unwrap_or(i64::MAX);
        let from = 7i64
            .checked_mul(retained - 1)
            .and_then(Duration::try_days)
            .and_then(|span| current.checked_sub_signed(span))
            .map_or(first.week_start, |start| first.week_start.max(start));

        let dense = densify_weeks(ctx.weeks, from, current);
        let active = dense.iter().filter(|w| w.total_amount > 0.0).count();
        (active, dense.len())
    }
}

impl InsightRule for ConsistencyRule {
    fn id(&self) -> &'static str {
        "tracking-consistency"
    }

    fn name(&self) -> &'static str {
        "Consistency Score"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let (active, tracked) = Self::tracked_weeks(ctx);
        if tracked < 2 {
            return vec![];
        }

        let share = active as f64 / tracked as f64;
        let savings = ctx.metrics.weekly_average * ctx.config.tracking_savings_rate * 52.0;
        let description = format!(
            "You logged purchases in {} of the last {} ({:.0}%).",
            active,
            plural(tracked, "week", "weeks"),
            share * 100.0
        );

        let insight = if share >= CONSISTENT_SHARE {
            Insight::new(
                self.id(),
                InsightType::Achievement,
                Severity::Low,
                "Consistent Tracker",
                description,
            )
            .with_action("Keep it up; steady tracking is what makes these numbers useful")
        } else {
            Insight::new(
                self.id(),
                InsightType::Tip,
                Severity::Low,
                "Track Every Week",
                description,
            )
            .with_action("Log each shopping trip so budget and waste numbers stay accurate")
        };

        vec![insight.with_impact(savings).with_timeframe("Annual")]
    }
}

/// Branches on the efficiency score: a good week or an opportunity
pub struct EfficiencyRule;

impl EfficiencyRule {
    /// Score to aim for next: `max(target_floor, score + target_step)`
    pub fn target_score(score: f64, ctx: &AnalysisContext<'_>) -> f64 {
        ctx.config
            .efficiency_target_floor
            .max(score + ctx.config.efficiency_target_step)
    }
}

impl InsightRule for EfficiencyRule {
    fn id(&self) -> &'static str {
        "efficiency"
    }

    fn name(&self) -> &'static str {
        "Efficiency Opportunity"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        if ctx.recent_weeks.is_empty() {
            return vec![];
        }

        let metrics = ctx.metrics;
        let score = metrics.efficiency_score;
        let waste_ratio = metrics.waste_ratio_percent();
        let target = Self::target_score(score, ctx);
        let savings = metrics.weekly_average * (target - score) / 100.0 * 52.0;

        let good = score >= ctx.config.efficiency_good_score
            && waste_ratio <= ctx.config.efficiency_max_waste_percent;

        let insight = if good {
            Insight::new(
                "good-week",
                InsightType::Achievement,
                Severity::Low,
                "Great Week!",
                format!(
                    "Efficiency score {:.0} with only {:.0}% of stock at risk. Reaching {:.0} would add about {} a year.",
                    score,
                    waste_ratio,
                    target,
                    money(savings)
                ),
            )
            .with_action("Keep planning meals around what you already have")
        } else {
            Insight::new(
                "efficiency-opportunity",
                InsightType::Opportunity,
                Severity::Medium,
                "Room to Improve",
                format!(
                    "Efficiency score {:.0} ({:.0}% of stock at risk, {:.0}% of budget used). Reaching {:.0} could save about {} a year.",
                    score,
                    waste_ratio,
                    metrics.budget_usage * 100.0,
                    target,
                    money(savings)
                ),
            )
            .with_action("Use up expiring stock before buying more and stay under the weekly budget")
        };

        vec![insight.with_impact(savings).with_timeframe("Annual")]
    }
}

/// Celebrates weekly spend falling compared with a few weeks ago
pub struct CostTrendRule;

impl CostTrendRule {
    /// `(latest_total, earlier_total)` when enough weeks exist
    pub fn comparison(ctx: &AnalysisContext<'_>) -> Option<(f64, f64)> {
        if ctx.weeks.len() < ctx.config.trend_min_weeks {
            return None;
        }
        let latest = ctx.weeks.last()?;
        let earlier_key = 7i64
            .checked_mul(ctx.config.trend_lookback_weeks)
            .and_then(Duration::try_days)
            .and_then(|span| latest.week_start.checked_sub_signed(span));
        let earlier = ctx
            .weeks
            .iter()
            .find(|w| Some(w.week_start) == earlier_key)
            .map(|w| w.total_amount)
            .unwrap_or(0.0);
        Some((latest.total_amount, earlier))
    }
}

impl InsightRule for CostTrendRule {
    fn id(&self) -> &'static str {
        "cost-trend"
    }

    fn name(&self) -> &'static str {
        "Cost Trend"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let Some((latest, earlier)) = Self::comparison(ctx) else {
            return vec![];
        };
        if earlier <= 0.0 {
            return vec![];
        }

        let threshold = earlier * (1.0 - ctx.config.trend_drop_percent / 100.0);
        if latest >= threshold {
            return vec![];
        }

        let drop_percent = (earlier - latest) / earlier * 100.0;
        let lookback = ctx.config.trend_lookback_weeks as usize;

        vec![Insight::new(
            self.id(),
            InsightType::Trend,
            Severity::Low,
            "Spending Is Trending Down",
            format!(
                "Your latest week cost {}, {:.0}% less than {} earlier ({}).",
                money(latest),
                drop_percent,
                plural(lookback, "week", "weeks"),
                money(earlier)
            ),
        )
        .with_action("Whatever changed recently is working; keep it going")
        .with_impact((earlier - latest) * 52.0)
        .with_timeframe(format!("Last {}", plural(lookback, "week", "weeks")))]
    }
}

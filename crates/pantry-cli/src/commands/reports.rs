//! Analytics command implementations

use anyhow::Result;
use pantry_core::{
    AnalyticsReport, EngineConfig, ExpirationSummary, Freshness, Insight, InsightType,
    MonthBucket, WeekBucket,
};
use serde::Serialize;

use super::{print_json, run_analysis, truncate};
use crate::cli::{Granularity, InputArgs};

pub fn cmd_report(config: &EngineConfig, input: &InputArgs) -> Result<()> {
    let report = run_analysis(config, input)?;

    if input.json {
        return print_json(&report);
    }

    print_summary(&report);
    print_freshness(&report.expiration);
    print_insights(&report.insights);
    Ok(())
}

/// Bucket series in the requested granularity
#[derive(Serialize)]
#[serde(untagged)]
pub enum BucketSeries {
    Weekly(Vec<WeekBucket>),
    Monthly(Vec<MonthBucket>),
}

impl BucketSeries {
    pub fn from_report(report: &AnalyticsReport, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Weekly => Self::Weekly(report.weeks.clone()),
            Granularity::Monthly => Self::Monthly(report.months.clone()),
        }
    }

    /// (period key, amount, item count) rows
    pub fn rows(&self) -> Vec<(String, f64, u64)> {
        match self {
            Self::Weekly(weeks) => weeks
                .iter()
                .map(|w| (w.period_key(), w.total_amount, w.item_count))
                .collect(),
            Self::Monthly(months) => months
                .iter()
                .map(|m| (m.period_key(), m.total_amount, m.item_count))
                .collect(),
        }
    }
}

pub fn cmd_buckets(config: &EngineConfig, input: &InputArgs, granularity: Granularity) -> Result<()> {
    let report = run_analysis(config, input)?;
    let series = BucketSeries::from_report(&report, granularity);

    if input.json {
        return print_json(&series);
    }

    let rows = series.rows();
    println!();
    println!("📅 Spending by {} period", granularity);
    println!("   ─────────────────────────────────────────────");

    if rows.is_empty() {
        println!("   No purchases recorded.");
        println!();
        return Ok(());
    }

    let budget = report.metrics.weekly_budget;
    println!("   {:12} │ {:>10} │ {:>6}", "Period", "Amount", "Items");
    println!("   ─────────────┼────────────┼───────");
    for (key, amount, count) in &rows {
        let marker = if granularity == Granularity::Weekly && *amount > budget {
            " ⚠️"
        } else {
            ""
        };
        println!("   {:12} │ {:>10.2} │ {:>6}{}", key, amount, count, marker);
    }

    let total: f64 = rows.iter().map(|(_, amount, _)| amount).sum();
    println!("   ─────────────┼────────────┼───────");
    println!("   {:12} │ {:>10.2} │", "Total", total);
    println!();
    Ok(())
}

pub fn cmd_freshness(config: &EngineConfig, input: &InputArgs) -> Result<()> {
    let report = run_analysis(config, input)?;

    if input.json {
        return print_json(&report.expiration);
    }

    print_freshness(&report.expiration);
    Ok(())
}

pub fn cmd_insights(config: &EngineConfig, input: &InputArgs) -> Result<()> {
    let report = run_analysis(config, input)?;

    if input.json {
        return print_json(&report.insights);
    }

    print_insights(&report.insights);
    Ok(())
}

fn print_summary(report: &AnalyticsReport) {
    let m = &report.metrics;

    println!();
    println!("🛒 Pantry Report ({})", report.today);
    println!("   ─────────────────────────────────────────────");
    println!("   Weekly budget:     ${:.2}", m.weekly_budget);
    println!("   Weekly average:    ${:.2}", m.weekly_average);
    println!(
        "   Budget compliance: {:.0}% ({} of {} weeks)",
        m.compliance_percent, m.compliant_weeks, m.weeks_tracked
    );
    println!("   This month:        ${:.2}", m.this_month_total);
    println!("   Last month:        ${:.2}", m.last_month_total);
    if m.last_month_total > 0.0 {
        println!("   Month over month:  {:+.1}%", m.month_over_month_percent);
    }
    println!("   Efficiency score:  {:.0}", m.efficiency_score);
}

fn print_freshness(summary: &ExpirationSummary) {
    println!();
    println!("🥫 Freshness: {}%", summary.freshness_percent);
    println!("   ─────────────────────────────────────────────");

    if summary.items.is_empty() {
        println!("   No dated pantry stock.");
        return;
    }

    println!(
        "   Expired: {}   This week: {}   Fresh: {}",
        summary.expired_quantity, summary.this_week_quantity, summary.fresh_quantity
    );
    println!();

    for item in summary
        .items
        .iter()
        .filter(|i| i.freshness != Freshness::Fresh)
    {
        let status = match item.days_left {
            d if d < 0 => format!("expired {}d ago", -d),
            0 => "expires today".to_string(),
            d => format!("{}d left", d),
        };
        println!(
            "   {} {:28} ×{:<3} {}",
            freshness_icon(item.freshness),
            truncate(&item.name, 28),
            item.quantity,
            status
        );
    }
}

fn print_insights(insights: &[Insight]) {
    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────");

    if insights.is_empty() {
        println!("   Nothing to report yet. Log a few more purchases.");
        println!();
        return;
    }

    for (i, insight) in insights.iter().enumerate() {
        println!(
            "   {}. {} {} [{}]",
            i + 1,
            insight_icon(insight.insight_type),
            insight.title,
            insight.severity.as_str()
        );
        println!("      {}", insight.description);
        if let Some(action) = &insight.actionable {
            println!("      → {}", action);
        }
        if let Some(impact) = insight.impact {
            match &insight.timeframe {
                Some(timeframe) => println!("      Impact: ${:.2} ({})", impact, timeframe),
                None => println!("      Impact: ${:.2}", impact),
            }
        }
    }
    println!();
}

fn freshness_icon(freshness: Freshness) -> &'static str {
    match freshness {
        Freshness::Expired => "❌",
        Freshness::ThisWeek => "⏳",
        Freshness::Fresh => "✅",
    }
}

fn insight_icon(insight_type: InsightType) -> &'static str {
    match insight_type {
        InsightType::Saving => "💰",
        InsightType::Warning => "⚠️",
        InsightType::Tip => "💡",
        InsightType::Trend => "📉",
        InsightType::Achievement => "🏆",
        InsightType::Opportunity => "🎯",
    }
}

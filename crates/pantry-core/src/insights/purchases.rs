//! Purchase-pattern insights
//!
//! - Repeat Buys: the most frequently bought item could be bought in bulk
//! - Price Drop: a current item is cheaper than it has ever been

use std::collections::HashMap;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Severity};
use super::{money, plural};
use crate::models::ItemRecord;

/// Suggests bulk buying for the most frequently purchased item
pub struct RepeatBuysRule;

impl InsightRule for RepeatBuysRule {
    fn id(&self) -> &'static str {
        "repeat-buys"
    }

    fn name(&self) -> &'static str {
        "Repeat Buys"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let Some(top) = ctx.frequency.top() else {
            return vec![];
        };
        if top.spend <= 0.0 {
            return vec![];
        }

        let savings = top.spend * ctx.config.bulk_savings_rate;

        vec![Insight::new(
            self.id(),
            InsightType::Saving,
            Severity::Low,
            format!("Stock Up on {}", top.display_name),
            format!(
                "You bought {} {} across {} in the last {} days, spending {}.",
                top.quantity,
                top.display_name,
                plural(top.purchases, "trip", "trips"),
                ctx.frequency.window_days(),
                money(top.spend)
            ),
        )
        .with_action(format!(
            "Buying {} in bulk could save around {}",
            top.display_name,
            money(savings)
        ))
        .with_impact(savings)
        .with_timeframe(format!("Per {} days", ctx.frequency.window_days()))]
    }
}

/// Flags current items priced below every other recorded price
pub struct PriceDropRule;

impl PriceDropRule {
    /// Current records cheaper than the historical floor, one per name
    /// (the cheapest), paired with that floor. Ordered by name key.
    pub fn drops<'a>(ctx: &AnalysisContext<'a>) -> Vec<(&'a ItemRecord, f64)> {
        let mut best: HashMap<String, (&'a ItemRecord, f64)> = HashMap::new();

        for record in ctx.records.iter().filter(|r| !r.archived) {
            let Some(floor) = ctx.price_history.floor_excluding(&record.name, &record.id) else {
                continue;
            };
            if record.unit_cost >= floor {
                continue;
            }

            let key = record.name_key();
            let replace = match best.get(&key) {
                None => true,
                Some((current, _)) => record
                    .unit_cost
                    .total_cmp(&current.unit_cost)
                    .then_with(|| current.id.cmp(&record.id))
                    .is_lt(),
            };
            if replace {
                best.insert(key, (record, floor));
            }
        }

        let mut drops: Vec<(String, (&'a ItemRecord, f64))> = best.into_iter().collect();
        drops.sort_by(|a, b| a.0.cmp(&b.0));
        drops.into_iter().map(|(_, drop)| drop).collect()
    }
}

impl InsightRule for PriceDropRule {
    fn id(&self) -> &'static str {
        "price-drop"
    }

    fn name(&self) -> &'static str {
        "Price Drop Alert"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        Self::drops(ctx)
            .into_iter()
            .map(|(record, floor)| {
                let unit_saving = floor - record.unit_cost;
                let monthly_quantity = ctx
                    .frequency
                    .get(&record.name)
                    .map(|f| f.quantity)
                    .unwrap_or(0)
                    .max(u64::from(record.quantity));
                let annual = unit_saving * monthly_quantity as f64 * 12.0;

                Insight::new(
                    format!("{}:{}", self.id(), record.name_key()),
                    InsightType::Saving,
                    Severity::Low,
                    format!("Price Drop: {}", record.name),
                    format!(
                        "{} is {} each, below your previous low of {}.",
                        record.name,
                        money(record.unit_cost),
                        money(floor)
                    ),
                )
                .with_action(format!("Stock up on {} while the price is low", record.name))
                .with_impact(annual)
                .with_timeframe("Annual")
            })
            .collect()
    }
}

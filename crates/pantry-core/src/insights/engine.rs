//! Insight Engine - runs registered rules in a fixed order

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::expiration::ExpirationSummary;
use crate::models::{ItemRecord, WeekBucket};
use crate::trends::BudgetMetrics;

use super::index::{FrequencyIndex, PriceHistoryIndex};
use super::types::Insight;
use super::{
    ConsistencyRule, CostTrendRule, EfficiencyRule, PriceDropRule, RepeatBuysRule,
    UpcomingExpirationsRule, WasteReportRule,
};

/// Everything a rule may look at. Rules never see the clock directly.
pub struct AnalysisContext<'a> {
    /// All records, archived included
    pub records: &'a [ItemRecord],
    pub today: NaiveDate,
    /// Full sparse week series
    pub weeks: &'a [WeekBucket],
    /// Most recent retained weeks (what `metrics` was computed from)
    pub recent_weeks: &'a [WeekBucket],
    pub expiration: &'a ExpirationSummary,
    pub metrics: &'a BudgetMetrics,
    pub price_history: &'a PriceHistoryIndex,
    pub frequency: &'a FrequencyIndex,
    pub config: &'a EngineConfig,
}

/// A single insight rule. Rules are pure and independent of each other.
pub trait InsightRule: Send + Sync {
    /// Stable identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule; an empty result means it did not fire
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// The main insight engine
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules, in evaluation order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(WasteReportRule));
        engine.register(Box::new(UpcomingExpirationsRule));
        engine.register(Box::new(RepeatBuysRule));
        engine.register(Box::new(ConsistencyRule));
        engine.register(Box::new(EfficiencyRule));
        engine.register(Box::new(PriceDropRule));
        engine.register(Box::new(CostTrendRule));

        engine
    }

    /// Append a rule after the ones already registered
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule in order and keep the first `max_insights` results.
    ///
    /// Results are not re-sorted by severity.
    pub fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut all_insights = vec![];

        for rule in &self.rules {
            let insights = rule.evaluate(ctx);
            tracing::debug!(
                rule = rule.id(),
                name = rule.name(),
                count = insights.len(),
                "Insight rule evaluated"
            );
            all_insights.extend(insights);
        }

        let fired = all_insights.len();
        all_insights.truncate(ctx.config.max_insights);
        tracing::debug!(fired, kept = all_insights.len(), "Insight generation complete");

        all_insights
    }

    /// Registered rule ids, in evaluation order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// `(id, name)` for every registered rule, in evaluation order
    pub fn rule_names(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::buckets::{month_buckets, recent_weeks, week_buckets};
    use crate::expiration::classify;
    use crate::insights::types::{InsightType, Severity};
    use crate::test_utils::{at, today};
    use crate::trends;

    /// Owned inputs for building an [`AnalysisContext`] in rule tests
    pub(crate) struct Fixture {
        pub records: Vec<ItemRecord>,
        pub config: EngineConfig,
        weeks: Vec<WeekBucket>,
        expiration: ExpirationSummary,
        metrics: BudgetMetrics,
        price_history: PriceHistoryIndex,
        frequency: FrequencyIndex,
    }

    impl Fixture {
        pub fn new(records: Vec<ItemRecord>, budget: f64) -> Self {
            Self::with_config(records, budget, EngineConfig::default())
        }

        pub fn with_config(records: Vec<ItemRecord>, budget: f64, config: EngineConfig) -> Self {
            let now = at(today());
            let weeks = week_buckets(&records, now);
            let months = month_buckets(&records, now);
            let expiration = classify(&records, today(), config.this_week_days);
            let metrics = trends::analyze(
                recent_weeks(&weeks, config.retained_weeks),
                &months,
                budget,
                &expiration,
                today(),
                &config,
            );
            let price_history = PriceHistoryIndex::build(&records);
            let frequency = FrequencyIndex::build(&records, today(), config.frequency_window_days);

            Self {
                records,
                config,
                weeks,
                expiration,
                metrics,
                price_history,
                frequency,
            }
        }

        pub fn ctx(&self) -> AnalysisContext<'_> {
            AnalysisContext {
                records: &self.records,
                today: today(),
                weeks: &self.weeks,
                recent_weeks: recent_weeks(&self.weeks, self.config.retained_weeks),
                expiration: &self.expiration,
                metrics: &self.metrics,
                price_history: &self.price_history,
                frequency: &self.frequency,
                config: &self.config,
            }
        }
    }

    struct AlwaysFires(&'static str);

    impl InsightRule for AlwaysFires {
        fn id(&self) -> &'static str {
            self.0
        }

        fn name(&self) -> &'static str {
            "Always Fires"
        }

        fn evaluate(&self, _ctx: &AnalysisContext<'_>) -> Vec<Insight> {
            vec![Insight::new(
                self.0,
                InsightType::Tip,
                Severity::High,
                "Always",
                "Fires every time",
            )]
        }
    }

    #[test]
    fn test_engine_rule_order() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_ids(),
            vec![
                "waste-report",
                "expiring-soon",
                "repeat-buys",
                "tracking-consistency",
                "efficiency",
                "price-drop",
                "cost-trend",
            ]
        );
        assert_eq!(engine.rule_names()[0], ("waste-report", "Waste Report"));
    }

    #[test]
    fn test_empty_input_produces_no_insights() {
        let fixture = Fixture::new(vec![], 100.0);
        let insights = InsightEngine::new().generate(&fixture.ctx());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_truncates_in_rule_order_without_resorting() {
        let mut engine = InsightEngine { rules: vec![] };
        for id in ["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"] {
            engine.register(Box::new(AlwaysFires(id)));
        }

        let fixture = Fixture::new(vec![], 100.0);
        let insights = engine.generate(&fixture.ctx());
        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3", "r4", "r5", "r6"]);
    }

    #[test]
    fn test_custom_rules_run_after_builtins() {
        let mut engine = InsightEngine::new();
        engine.register(Box::new(AlwaysFires("custom")));

        let fixture = Fixture::new(vec![], 100.0);
        let insights = engine.generate(&fixture.ctx());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].id, "custom");
        assert_eq!(engine.rule_ids().last(), Some(&"custom"));
        assert_eq!(engine.rule_names().last(), Some(&("custom", "Always Fires")));
    }

    #[test]
    fn test_max_insights_is_configurable() {
        let mut engine = InsightEngine { rules: vec![] };
        for id in ["a", "b", "c"] {
            engine.register(Box::new(AlwaysFires(id)));
        }

        let config = EngineConfig {
            max_insights: 2,
            ..Default::default()
        };
        let fixture = Fixture::with_config(vec![], 100.0, config);
        assert_eq!(engine.generate(&fixture.ctx()).len(), 2);
    }
}

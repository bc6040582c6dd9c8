//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of recommendation an insight represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Money that can be saved right now
    Saving,
    /// Something is going wrong (waste, imminent expiry)
    Warning,
    /// Habit suggestion
    Tip,
    /// Movement in spend over time
    Trend,
    /// Positive reinforcement
    Achievement,
    /// Room for improvement with a projected payoff
    Opportunity,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Saving => "saving",
            InsightType::Warning => "warning",
            InsightType::Tip => "tip",
            InsightType::Trend => "trend",
            InsightType::Achievement => "achievement",
            InsightType::Opportunity => "opportunity",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generated recommendation. Rebuilt on every analytics pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Stable slug identifying the rule (and item, where per-item)
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable: Option<String>,
    /// Projected monetary effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

impl Insight {
    pub fn new(
        id: impl Into<String>,
        insight_type: InsightType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            insight_type,
            severity,
            title: title.into(),
            description: description.into(),
            actionable: None,
            impact: None,
            timeframe: None,
        }
    }

    /// Add a recommended action
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actionable = Some(action.into());
        self
    }

    /// Add a projected monetary impact; non-finite values are dropped
    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = impact.is_finite().then_some(impact);
        self
    }

    /// Add an applicability window label
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = Some(timeframe.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        assert_eq!(InsightType::Achievement.to_string(), "achievement");
        assert_eq!(Severity::High.to_string(), "high");
        assert_eq!(
            serde_json::to_value(InsightType::Opportunity).unwrap(),
            serde_json::json!("opportunity")
        );
        assert_eq!(
            serde_json::from_value::<Severity>(serde_json::json!("medium")).unwrap(),
            Severity::Medium
        );
        assert!(serde_json::from_value::<InsightType>(serde_json::json!("bogus")).is_err());
    }

    #[test]
    fn test_insight_builder() {
        let insight = Insight::new(
            "waste-report",
            InsightType::Warning,
            Severity::Medium,
            "Test Title",
            "Test description",
        )
        .with_action("Do something")
        .with_impact(12.5)
        .with_timeframe("Last 7 days");

        assert_eq!(insight.id, "waste-report");
        assert_eq!(insight.actionable.as_deref(), Some("Do something"));
        assert_eq!(insight.impact, Some(12.5));
        assert_eq!(insight.timeframe.as_deref(), Some("Last 7 days"));

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["severity"], "medium");
    }

    #[test]
    fn test_non_finite_impact_is_dropped() {
        let insight = Insight::new("x", InsightType::Tip, Severity::Low, "t", "d")
            .with_impact(f64::INFINITY);
        assert_eq!(insight.impact, None);
    }
}

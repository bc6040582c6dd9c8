//! Record normalization
//!
//! Coerces loosely-typed [`RawItemRecord`]s into validated [`ItemRecord`]s.
//! Malformed numbers degrade to safe defaults (quantity 1, cost 0) so one
//! corrupt line never blocks aggregation of the rest. Only records that
//! cannot be placed in time or classified at all are rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{ItemKind, ItemRecord, RawItemRecord, RawValue};

/// Why a raw record could not be normalized
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("record has no id")]
    MissingId,

    #[error("record has no creation timestamp")]
    MissingCreatedAt,

    #[error("unparseable creation timestamp: {0}")]
    InvalidCreatedAt(String),

    #[error("missing or unknown item kind: {0}")]
    UnknownKind(String),
}

/// A raw record that was dropped, with its position in the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: Rejection,
}

/// Output of [`normalize_batch`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedBatch {
    pub records: Vec<ItemRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Normalize a whole batch, keeping input order for accepted records
pub fn normalize_batch(raws: &[RawItemRecord]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, raw) in raws.iter().enumerate() {
        match normalize(raw) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                let id = raw.id.as_ref().and_then(parse_id);
                warn!(index, id = ?id, reason = %reason, "Skipping unusable record");
                batch.rejected.push(RejectedRecord { index, id, reason });
            }
        }
    }

    batch
}

/// Normalize a single raw record
pub fn normalize(raw: &RawItemRecord) -> std::result::Result<ItemRecord, Rejection> {
    let id = raw
        .id
        .as_ref()
        .and_then(parse_id)
        .ok_or(Rejection::MissingId)?;

    let created_at = match raw.created_at.as_deref().map(str::trim) {
        None | Some("") => return Err(Rejection::MissingCreatedAt),
        Some(s) => parse_timestamp(s).ok_or_else(|| Rejection::InvalidCreatedAt(s.to_string()))?,
    };

    let kind = raw
        .kind
        .as_deref()
        .unwrap_or("")
        .parse::<ItemKind>()
        .map_err(|_| Rejection::UnknownKind(raw.kind.clone().unwrap_or_default()))?;

    Ok(ItemRecord {
        id,
        name: raw.name.clone().unwrap_or_default(),
        unit_cost: parse_cost(raw.unit_cost.as_ref()),
        quantity: parse_quantity(raw.quantity.as_ref()),
        kind,
        expiration_date: raw.expiration_date.as_deref().and_then(parse_date),
        created_at,
        archived: parse_flag(raw.archived.as_ref()),
    })
}

fn parse_id(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{}", *n as i64)),
        RawValue::Number(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

/// Unit cost; missing, non-finite or negative values become 0
pub fn parse_cost(value: Option<&RawValue>) -> f64 {
    let cost = match value {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => parse_amount(s).unwrap_or(0.0),
        _ => 0.0,
    };

    if cost.is_finite() && cost > 0.0 {
        cost
    } else {
        0.0
    }
}

/// Quantity; missing, fractional-below-one or non-positive values become 1
pub fn parse_quantity(value: Option<&RawValue>) -> u32 {
    let quantity = match value {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if !quantity.is_finite() || quantity < 1.0 {
        return 1;
    }
    quantity.trunc().min(f64::from(u32::MAX)) as u32
}

fn parse_flag(value: Option<&RawValue>) -> bool {
    match value {
        Some(RawValue::Bool(b)) => *b,
        Some(RawValue::Number(n)) => *n != 0.0,
        Some(RawValue::Text(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "y"
        ),
        None => false,
    }
}

/// Parse an amount string, handling currency symbols and thousands separators
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().replace(['$', '€', '£', ',', ' '], "");
    cleaned.parse::<f64>().ok()
}

/// Parse a date, dropping any time-of-day component
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = [
        "%Y-%m-%d", // 2026-01-15
        "%m/%d/%Y", // 01/15/2026
        "%m/%d/%y", // 01/15/26
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    parse_timestamp(s).map(|ts| ts.date_naive())
}

/// Parse a creation timestamp. Bare dates are taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    fn raw(id: &str) -> RawItemRecord {
        RawItemRecord {
            id: Some(RawValue::Text(id.to_string())),
            name: Some("Oats".to_string()),
            unit_cost: Some(RawValue::Number(3.25)),
            quantity: Some(RawValue::Number(2.0)),
            kind: Some("pantry".to_string()),
            expiration_date: Some("2026-02-01".to_string()),
            created_at: Some("2026-01-15T09:30:00Z".to_string()),
            archived: None,
        }
    }

    #[test]
    fn test_normalize_valid_record() {
        let record = normalize(&raw("a1")).unwrap();
        assert_eq!(record.id, "a1");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.unit_cost, 3.25);
        assert_eq!(record.kind, ItemKind::Pantry);
        assert_eq!(record.expiration_date, Some(date(2026, 2, 1)));
        assert_eq!(record.created_on(), date(2026, 1, 15));
        assert!(!record.archived);
    }

    #[test]
    fn test_malformed_numbers_use_defaults() {
        let mut r = raw("a2");
        r.unit_cost = Some(RawValue::Text("free?".to_string()));
        r.quantity = Some(RawValue::Number(-4.0));
        let record = normalize(&r).unwrap();
        assert_eq!(record.unit_cost, 0.0);
        assert_eq!(record.quantity, 1);

        r.unit_cost = Some(RawValue::Number(f64::NAN));
        r.quantity = None;
        let record = normalize(&r).unwrap();
        assert_eq!(record.unit_cost, 0.0);
        assert_eq!(record.quantity, 1);
    }

    #[test]
    fn test_parse_cost_variants() {
        assert_eq!(parse_cost(Some(&RawValue::Text("$1,234.50".into()))), 1234.5);
        assert_eq!(parse_cost(Some(&RawValue::Number(-2.0))), 0.0);
        assert_eq!(parse_cost(Some(&RawValue::Number(f64::INFINITY))), 0.0);
        assert_eq!(parse_cost(None), 0.0);
    }

    #[test]
    fn test_parse_quantity_variants() {
        assert_eq!(parse_quantity(Some(&RawValue::Text("6".into()))), 6);
        assert_eq!(parse_quantity(Some(&RawValue::Number(2.9))), 2);
        assert_eq!(parse_quantity(Some(&RawValue::Number(0.5))), 1);
        assert_eq!(parse_quantity(Some(&RawValue::Text("a dozen".into()))), 1);
    }

    #[test]
    fn test_dates_drop_time_of_day() {
        assert_eq!(parse_date("2026-01-15T23:59:59Z"), Some(date(2026, 1, 15)));
        assert_eq!(parse_date("01/15/2026"), Some(date(2026, 1, 15)));
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_invalid_expiration_is_dropped_not_rejected() {
        let mut r = raw("a3");
        r.expiration_date = Some("next tuesday".to_string());
        let record = normalize(&r).unwrap();
        assert_eq!(record.expiration_date, None);
    }

    #[test]
    fn test_rejections() {
        let mut r = raw("a4");
        r.id = None;
        assert_eq!(normalize(&r), Err(Rejection::MissingId));

        let mut r = raw("a5");
        r.created_at = Some("yesterday".to_string());
        assert_eq!(
            normalize(&r),
            Err(Rejection::InvalidCreatedAt("yesterday".to_string()))
        );

        let mut r = raw("a6");
        r.kind = Some("freezer".to_string());
        assert_eq!(
            normalize(&r),
            Err(Rejection::UnknownKind("freezer".to_string()))
        );
    }

    #[test]
    fn test_batch_keeps_going_after_rejection() {
        let mut bad = raw("b2");
        bad.created_at = None;
        let batch = normalize_batch(&[raw("b1"), bad, raw("b3")]);

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].id, "b1");
        assert_eq!(batch.records[1].id, "b3");
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 1);
        assert_eq!(batch.rejected[0].id.as_deref(), Some("b2"));
        assert_eq!(batch.rejected[0].reason, Rejection::MissingCreatedAt);
    }

    #[test]
    fn test_numeric_ids_and_flags() {
        let mut r = raw("x");
        r.id = Some(RawValue::Number(42.0));
        r.archived = Some(RawValue::Text("TRUE".to_string()));
        let record = normalize(&r).unwrap();
        assert_eq!(record.id, "42");
        assert!(record.archived);
    }
}

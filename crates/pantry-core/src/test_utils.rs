//! Test utilities
//!
//! Fixture builders shared by unit tests, integration tests and the CLI
//! tests. All dates are pinned so results never depend on the host clock.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{ItemKind, ItemRecord};

/// Fixed "today" used across tests: Thursday 2026-01-15
pub fn today() -> NaiveDate {
    date(2026, 1, 15)
}

/// Fixed "now": noon on [`today`]
pub fn now() -> DateTime<Utc> {
    at(today())
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Noon UTC on the given day
pub fn at(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(12, 0, 0).unwrap().and_utc()
}

/// Start building an item with sensible defaults: one pantry unit costing
/// 1.00, entered today, no expiry
pub fn item(name: &str) -> ItemBuilder {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    ItemBuilder {
        record: ItemRecord {
            id: format!("item-{}", COUNTER.fetch_add(1, Ordering::SeqCst)),
            name: name.to_string(),
            unit_cost: 1.0,
            quantity: 1,
            kind: ItemKind::Pantry,
            expiration_date: None,
            created_at: now(),
            archived: false,
        },
    }
}

pub struct ItemBuilder {
    record: ItemRecord,
}

impl ItemBuilder {
    pub fn id(mut self, id: &str) -> Self {
        self.record.id = id.to_string();
        self
    }

    pub fn cost(mut self, unit_cost: f64) -> Self {
        self.record.unit_cost = unit_cost;
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn grocery(mut self) -> Self {
        self.record.kind = ItemKind::Grocery;
        self
    }

    pub fn expires(mut self, day: NaiveDate) -> Self {
        self.record.expiration_date = Some(day);
        self
    }

    /// Expiry relative to [`today`]; negative means already expired
    pub fn expires_in(self, days: i64) -> Self {
        self.expires(today() + Duration::days(days))
    }

    pub fn created(mut self, day: NaiveDate) -> Self {
        self.record.created_at = at(day);
        self
    }

    pub fn created_days_ago(self, days: i64) -> Self {
        self.created(today() - Duration::days(days))
    }

    pub fn archived(mut self) -> Self {
        self.record.archived = true;
        self
    }

    pub fn build(self) -> ItemRecord {
        self.record
    }
}

//! Expiration classification
//!
//! Classifies current pantry stock by days left until expiry and rolls the
//! result up by quantity (a pack of six counts as six units). Records with
//! no expiration date are left out entirely.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ItemRecord;

/// Width of the this-week window, in days
pub const DEFAULT_THIS_WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Expiration date is in the past
    Expired,
    /// Expires today or within the this-week window
    ThisWeek,
    /// Expires after the this-week window
    Fresh,
}

impl Freshness {
    /// Classify a signed day difference (`expiration - today`)
    pub fn from_days_left(days_left: i64, this_week_days: i64) -> Self {
        if days_left < 0 {
            Freshness::Expired
        } else if days_left <= this_week_days {
            Freshness::ThisWeek
        } else {
            Freshness::Fresh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Expired => "expired",
            Freshness::ThisWeek => "this_week",
            Freshness::Fresh => "fresh",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whole days from `today` until `expiration` (negative once expired)
pub fn days_until(expiration: NaiveDate, today: NaiveDate) -> i64 {
    (expiration - today).num_days()
}

/// One classified pantry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub total_cost: f64,
    pub expiration_date: NaiveDate,
    pub days_left: i64,
    pub freshness: Freshness,
}

impl ClassifiedItem {
    pub fn expires_today(&self) -> bool {
        self.days_left == 0
    }
}

/// Quantity-weighted freshness rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationSummary {
    pub expired_quantity: u64,
    /// Subset of `this_week_quantity` expiring today
    pub expiring_today_quantity: u64,
    pub this_week_quantity: u64,
    pub fresh_quantity: u64,
    pub total_quantity: u64,
    /// Rounded `fresh / total × 100`; 100 when nothing is stocked
    pub freshness_percent: u8,
    /// Soonest expiry first
    pub items: Vec<ClassifiedItem>,
}

impl ExpirationSummary {
    /// Items that expire today or within the next `days` days
    pub fn expiring_within(&self, days: i64) -> Vec<&ClassifiedItem> {
        self.items
            .iter()
            .filter(|i| (0..=days).contains(&i.days_left))
            .collect()
    }

    /// Expired plus this-week quantity
    pub fn at_risk_quantity(&self) -> u64 {
        self.expired_quantity + self.this_week_quantity
    }

    /// Share of stock expired or expiring this week, 0 when nothing is stocked
    pub fn waste_ratio_percent(&self) -> f64 {
        if self.total_quantity == 0 {
            return 0.0;
        }
        self.at_risk_quantity() as f64 / self.total_quantity as f64 * 100.0
    }
}

/// Classify current (non-archived) pantry records against `today`
pub fn classify(records: &[ItemRecord], today: NaiveDate, this_week_days: i64) -> ExpirationSummary {
    let mut items: Vec<ClassifiedItem> = records
        .iter()
        .filter(|r| r.is_current_pantry())
        .filter_map(|r| {
            let expiration_date = r.expiration_date?;
            let days_left = days_until(expiration_date, today);
            Some(ClassifiedItem {
                id: r.id.clone(),
                name: r.name.clone(),
                quantity: r.quantity,
                total_cost: r.total_cost(),
                expiration_date,
                days_left,
                freshness: Freshness::from_days_left(days_left, this_week_days),
            })
        })
        .collect();

    items.sort_by(|a, b| {
        a.days_left
            .cmp(&b.days_left)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut summary = ExpirationSummary {
        expired_quantity: 0,
        expiring_today_quantity: 0,
        this_week_quantity: 0,
        fresh_quantity: 0,
        total_quantity: 0,
        freshness_percent: 100,
        items: Vec::new(),
    };

    for item in &items {
        let quantity = u64::from(item.quantity);
        summary.total_quantity += quantity;
        match item.freshness {
            Freshness::Expired => summary.expired_quantity += quantity,
            Freshness::ThisWeek => {
                summary.this_week_quantity += quantity;
                if item.expires_today() {
                    summary.expiring_today_quantity += quantity;
                }
            }
            Freshness::Fresh => summary.fresh_quantity += quantity,
        }
    }

    if summary.total_quantity > 0 {
        let percent = summary.fresh_quantity as f64 / summary.total_quantity as f64 * 100.0;
        summary.freshness_percent = percent.round().clamp(0.0, 100.0) as u8;
    }

    summary.items = items;
    summary
}

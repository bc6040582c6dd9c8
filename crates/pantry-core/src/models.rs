//! Data models for Pantry

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an item is eaten through normally or stocked with an expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Consumed soon after purchase
    Grocery,
    /// Stored stock, tracked for expiration and waste
    Pantry,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Grocery => "grocery",
            ItemKind::Pantry => "pantry",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grocery" => Ok(ItemKind::Grocery),
            "pantry" => Ok(ItemKind::Pantry),
            _ => Err(format!("Unknown item kind: {} (valid: grocery, pantry)", s)),
        }
    }
}

/// One purchased or stocked line, after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    /// Never negative
    pub unit_cost: f64,
    /// Always at least 1
    pub quantity: u32,
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl ItemRecord {
    /// `unit_cost × quantity`; derived on every call so it cannot drift
    pub fn total_cost(&self) -> f64 {
        self.unit_cost * f64::from(self.quantity)
    }

    /// Calendar day the record was entered on
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Key used for price and frequency lookups
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Current, stored stock: counts toward spend and freshness views
    pub fn is_current_pantry(&self) -> bool {
        self.kind == ItemKind::Pantry && !self.archived
    }
}

/// Case-folded item name. Whitespace is kept as-is, so "milk " and "milk"
/// are different items.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Loosely-typed field value as it arrives from a store or a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// A record before normalization. Every field may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItemRecord {
    #[serde(default)]
    pub id: Option<RawValue>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "unitCost", alias = "cost")]
    pub unit_cost: Option<RawValue>,
    #[serde(default)]
    pub quantity: Option<RawValue>,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "expirationDate")]
    pub expiration_date: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub archived: Option<RawValue>,
}

/// Weekly spend aggregate keyed by the Monday that starts the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub total_amount: f64,
    pub item_count: u64,
}

impl WeekBucket {
    pub fn empty(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            total_amount: 0.0,
            item_count: 0,
        }
    }

    /// Sortable key, e.g. "2026-10-12"
    pub fn period_key(&self) -> String {
        self.week_start.format("%Y-%m-%d").to_string()
    }
}

/// Calendar-month spend aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub item_count: u64,
}

impl MonthBucket {
    /// Sortable key, e.g. "2026-10"
    pub fn period_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

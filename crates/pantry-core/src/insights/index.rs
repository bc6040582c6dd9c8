//! Price-history and purchase-frequency indexes
//!
//! Both are keyed by case-folded item name and built from every record,
//! archived ones included.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{name_key, ItemRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub record_id: String,
    pub unit_cost: f64,
    pub recorded_on: NaiveDate,
}

/// Every unit cost ever recorded, per item name
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceHistoryIndex {
    by_name: HashMap<String, Vec<PricePoint>>,
}

impl PriceHistoryIndex {
    pub fn build(records: &[ItemRecord]) -> Self {
        let mut by_name: HashMap<String, Vec<PricePoint>> = HashMap::new();
        for record in records {
            by_name.entry(record.name_key()).or_default().push(PricePoint {
                record_id: record.id.clone(),
                unit_cost: record.unit_cost,
                recorded_on: record.created_on(),
            });
        }
        Self { by_name }
    }

    /// Price points for a name (any casing)
    pub fn prices(&self, name: &str) -> &[PricePoint] {
        self.by_name
            .get(&name_key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Lowest cost recorded for `name` by any record other than `record_id`
    pub fn floor_excluding(&self, name: &str, record_id: &str) -> Option<f64> {
        self.prices(name)
            .iter()
            .filter(|p| p.record_id != record_id)
            .map(|p| p.unit_cost)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Purchases of one item inside the trailing window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    /// Spelling used for display (alphabetically first variant seen)
    pub display_name: String,
    pub quantity: u64,
    pub spend: f64,
    pub purchases: usize,
}

/// Summed quantity and spend per item name over a trailing window
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrequencyIndex {
    window_days: i64,
    by_name: HashMap<String, FrequencyEntry>,
}

impl FrequencyIndex {
    /// Index records entered in the `window_days` days ending `today`
    pub fn build(records: &[ItemRecord], today: NaiveDate, window_days: i64) -> Self {
        // a window reaching past the calendar's start covers everything
        let window_start = Duration::try_days(window_days)
            .and_then(|span| today.checked_sub_signed(span));
        let mut by_name: HashMap<String, FrequencyEntry> = HashMap::new();

        for record in records {
            let day = record.created_on();
            if window_start.is_some_and(|start| day <= start) || day > today {
                continue;
            }

            let entry = by_name
                .entry(record.name_key())
                .or_insert_with(|| FrequencyEntry {
                    display_name: record.name.clone(),
                    quantity: 0,
                    spend: 0.0,
                    purchases: 0,
                });
            if record.name < entry.display_name {
                entry.display_name = record.name.clone();
            }
            entry.quantity += u64::from(record.quantity);
            entry.spend += record.total_cost();
            entry.purchases += 1;
        }

        Self {
            window_days,
            by_name,
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    pub fn get(&self, name: &str) -> Option<&FrequencyEntry> {
        self.by_name.get(&name_key(name))
    }

    /// Entries by descending quantity; ties broken by name key
    pub fn ranked(&self) -> Vec<&FrequencyEntry> {
        let mut entries: Vec<(&String, &FrequencyEntry)> = self.by_name.iter().collect();
        entries.sort_by(|(ka, a), (kb, b)| b.quantity.cmp(&a.quantity).then_with(|| ka.cmp(kb)));
        entries.into_iter().map(|(_, e)| e).collect()
    }

    /// Most frequently bought item
    pub fn top(&self) -> Option<&FrequencyEntry> {
        self.ranked().into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{item, today};

    #[test]
    fn test_price_floor_excludes_self() {
        let records = vec![
            item("Milk").id("m1").cost(3.50).archived().build(),
            item("milk").id("m2").cost(3.20).archived().build(),
            item("MILK").id("m3").cost(3.80).archived().build(),
            item("Milk").id("m4").cost(2.99).build(),
        ];
        let index = PriceHistoryIndex::build(&records);

        assert_eq!(index.len(), 1);
        assert_eq!(index.prices("milk").len(), 4);
        assert_eq!(index.floor_excluding("Milk", "m4"), Some(3.20));
        assert_eq!(index.floor_excluding("Milk", "m2"), Some(2.99));
        assert_eq!(index.floor_excluding("Bread", "b1"), None);
    }

    #[test]
    fn test_single_price_has_no_floor() {
        let records = vec![item("Tea").id("t1").cost(4.0).build()];
        let index = PriceHistoryIndex::build(&records);
        assert_eq!(index.floor_excluding("Tea", "t1"), None);
    }

    #[test]
    fn test_frequency_window() {
        let records = vec![
            item("Eggs").quantity(12).cost(0.3).created_days_ago(2).build(),
            item("eggs").quantity(6).cost(0.4).created_days_ago(29).archived().build(),
            // Exactly on the window edge is outside
            item("Eggs").quantity(100).created_days_ago(30).build(),
            item("Butter").quantity(2).cost(3.0).created_days_ago(1).build(),
        ];
        let index = FrequencyIndex::build(&records, today(), 30);

        let eggs = index.get("EGGS").unwrap();
        assert_eq!(eggs.quantity, 18);
        assert_eq!(eggs.purchases, 2);
        assert!((eggs.spend - 6.0).abs() < 1e-9);
        assert_eq!(eggs.display_name, "Eggs");

        let top = index.top().unwrap();
        assert_eq!(top.display_name, "Eggs");
        assert_eq!(index.ranked().len(), 2);
    }

    #[test]
    fn test_frequency_tie_break_is_stable() {
        let records = vec![
            item("Pears").quantity(2).build(),
            item("Apples").quantity(2).build(),
        ];
        let index = FrequencyIndex::build(&records, today(), 30);
        assert_eq!(index.top().unwrap().display_name, "Apples");
    }

    #[test]
    fn test_empty_indexes() {
        assert!(PriceHistoryIndex::build(&[]).is_empty());
        let index = FrequencyIndex::build(&[], today(), 30);
        assert!(index.is_empty());
        assert!(index.top().is_none());
        assert_eq!(index.window_days(), 30);
    }
}

//! Temporal bucketing
//!
//! Groups current pantry spend into Monday-aligned weeks and calendar
//! months. Series are sparse (empty periods are omitted) and ascending by
//! period key. Records sharing a key are summed in a canonical order, so
//! the output does not depend on the order records were supplied in.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::models::{ItemRecord, MonthBucket, WeekBucket};

/// Monday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(offset)
}

/// Records that count toward current spend, in canonical summation order.
///
/// Anything entered after `now` has not been bought yet and is left out.
fn contributing<'a>(records: &'a [ItemRecord], now: DateTime<Utc>) -> Vec<&'a ItemRecord> {
    let today = now.date_naive();
    let mut selected: Vec<&ItemRecord> = records
        .iter()
        .filter(|r| r.is_current_pantry() && r.created_on() <= today)
        .collect();

    selected.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.unit_cost.total_cmp(&b.unit_cost))
            .then_with(|| a.quantity.cmp(&b.quantity))
    });
    selected
}

/// Weekly spend series, ascending by week start
pub fn week_buckets(records: &[ItemRecord], now: DateTime<Utc>) -> Vec<WeekBucket> {
    let mut buckets: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();

    for record in contributing(records, now) {
        let key = week_start(record.created_on());
        let bucket = buckets
            .entry(key)
            .or_insert_with(|| WeekBucket::empty(key));
        bucket.total_amount += record.total_cost();
        bucket.item_count += u64::from(record.quantity);
    }

    buckets.into_values().collect()
}

/// Monthly spend series, ascending by `YYYY-MM`
pub fn month_buckets(records: &[ItemRecord], now: DateTime<Utc>) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

    for record in contributing(records, now) {
        let day = record.created_on();
        let (year, month) = (day.year(), day.month());
        let bucket = buckets.entry((year, month)).or_insert(MonthBucket {
            year,
            month,
            total_amount: 0.0,
            item_count: 0,
        });
        bucket.total_amount += record.total_cost();
        bucket.item_count += u64::from(record.quantity);
    }

    buckets.into_values().collect()
}

/// The last `n` buckets of an ascending series
pub fn recent_weeks(weeks: &[WeekBucket], n: usize) -> &[WeekBucket] {
    &weeks[weeks.len().saturating_sub(n)..]
}

/// Dense weekly series from `from` to `to` (both snapped to their week
/// start), with zero-spend weeks filling the gaps
pub fn densify_weeks(weeks: &[WeekBucket], from: NaiveDate, to: NaiveDate) -> Vec<WeekBucket> {
    let (first, last) = (week_start(from), week_start(to));
    if first > last {
        return Vec::new();
    }

    let by_key: BTreeMap<NaiveDate, &WeekBucket> =
        weeks.iter().map(|w| (w.week_start, w)).collect();

    let mut dense = Vec::new();
    let mut current = first;
    while current <= last {
        dense.push(
            by_key
                .get(&current)
                .map(|w| (*w).clone())
                .unwrap_or_else(|| WeekBucket::empty(current)),
        );
        current += Duration::days(7);
    }
    dense
}

/// Bucket for the week containing `date`, if any spend was recorded
pub fn week_containing(weeks: &[WeekBucket], date: NaiveDate) -> Option<&WeekBucket> {
    let key = week_start(date);
    weeks.iter().find(|w| w.week_start == key)
}

/// Total for the calendar month containing `date` (0 when absent)
pub fn month_total(months: &[MonthBucket], date: NaiveDate) -> f64 {
    months
        .iter()
        .find(|m| m.contains(date))
        .map(|m| m.total_amount)
        .unwrap_or(0.0)
}

/// First day of the month before the one containing `date`
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    let last_of_previous = first - Duration::days(1);
    last_of_previous.with_day(1).unwrap_or(last_of_previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, item, now};

    #[test]
    fn test_week_start_is_monday() {
        // 2026-01-15 is a Thursday
        assert_eq!(week_start(date(2026, 1, 15)), date(2026, 1, 12));
        // Monday maps to itself, Sunday to the Monday before
        assert_eq!(week_start(date(2026, 1, 12)), date(2026, 1, 12));
        assert_eq!(week_start(date(2026, 1, 18)), date(2026, 1, 12));
        // Across a year boundary
        assert_eq!(week_start(date(2026, 1, 1)), date(2025, 12, 29));
    }

    #[test]
    fn test_same_week_records_are_summed() {
        let records = vec![
            item("Flour").cost(1.50).quantity(2).created(date(2026, 1, 12)).build(),
            item("Coffee").cost(4.00).quantity(1).created(date(2026, 1, 14)).build(),
            item("Beans").cost(0.75).quantity(3).created(date(2026, 1, 15)).build(),
        ];

        let weeks = week_buckets(&records, now());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].week_start, date(2026, 1, 12));
        assert!((weeks[0].total_amount - 9.25).abs() < 1e-9);
        assert_eq!(weeks[0].item_count, 6);
    }

    #[test]
    fn test_only_current_pantry_counts() {
        let records = vec![
            item("Pasta").cost(2.0).build(),
            item("Bread").cost(3.0).grocery().build(),
            item("Old Pasta").cost(5.0).archived().build(),
        ];

        let weeks = week_buckets(&records, now());
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].total_amount, 2.0);
    }

    #[test]
    fn test_future_records_are_ignored() {
        let records = vec![item("Tea").created(date(2026, 2, 1)).build()];
        assert!(week_buckets(&records, now()).is_empty());
        assert!(month_buckets(&records, now()).is_empty());
    }

    #[test]
    fn test_series_is_sparse_and_ascending() {
        let records = vec![
            item("C").created(date(2026, 1, 14)).build(),
            item("A").created(date(2025, 12, 1)).build(),
            item("B").created(date(2025, 12, 30)).build(),
        ];

        let weeks = week_buckets(&records, now());
        let keys: Vec<String> = weeks.iter().map(|w| w.period_key()).collect();
        assert_eq!(keys, vec!["2025-12-01", "2025-12-29", "2026-01-12"]);

        let months = month_buckets(&records, now());
        let keys: Vec<String> = months.iter().map(|m| m.period_key()).collect();
        assert_eq!(keys, vec!["2025-12", "2026-01"]);
    }

    #[test]
    fn test_order_independent() {
        let mut records = vec![
            item("A").cost(0.1).quantity(3).created(date(2026, 1, 5)).build(),
            item("B").cost(0.2).quantity(7).created(date(2026, 1, 6)).build(),
            item("C").cost(0.3).quantity(1).created(date(2026, 1, 13)).build(),
            item("D").cost(1.7).quantity(2).created(date(2026, 1, 7)).build(),
        ];
        let forward = week_buckets(&records, now());
        records.reverse();
        let backward = week_buckets(&records, now());
        assert_eq!(forward, backward);
        assert_eq!(forward, week_buckets(&records, now()));
    }

    #[test]
    fn test_conservation() {
        let records: Vec<ItemRecord> = (0..20)
            .map(|i| {
                item("Thing")
                    .cost(0.35 * f64::from(i + 1))
                    .quantity(i % 4 + 1)
                    .created_days_ago(i64::from(i) * 5)
                    .build()
            })
            .collect();

        let expected: f64 = records.iter().map(|r| r.total_cost()).sum();
        let weekly: f64 = week_buckets(&records, now()).iter().map(|w| w.total_amount).sum();
        let monthly: f64 = month_buckets(&records, now()).iter().map(|m| m.total_amount).sum();
        assert!((weekly - expected).abs() < 1e-6);
        assert!((monthly - expected).abs() < 1e-6);
    }

    #[test]
    fn test_densify_fills_gaps() {
        let weeks = vec![WeekBucket {
            week_start: date(2025, 12, 29),
            total_amount: 12.0,
            item_count: 3,
        }];

        let dense = densify_weeks(&weeks, date(2025, 12, 30), date(2026, 1, 15));
        assert_eq!(dense.len(), 3);
        assert_eq!(dense[0].total_amount, 12.0);
        assert_eq!(dense[1], WeekBucket::empty(date(2026, 1, 5)));
        assert_eq!(dense[2], WeekBucket::empty(date(2026, 1, 12)));

        assert!(densify_weeks(&weeks, date(2026, 2, 1), date(2026, 1, 1)).is_empty());
    }

    #[test]
    fn test_recent_weeks_slice() {
        let weeks: Vec<WeekBucket> = (0..5)
            .map(|i| WeekBucket::empty(date(2026, 1, 5) + Duration::days(7 * i)))
            .collect();
        assert_eq!(recent_weeks(&weeks, 2).len(), 2);
        assert_eq!(recent_weeks(&weeks, 2)[0].week_start, date(2026, 1, 26));
        assert_eq!(recent_weeks(&weeks, 10).len(), 5);
    }

    #[test]
    fn test_month_helpers() {
        assert_eq!(previous_month(date(2026, 1, 15)), date(2025, 12, 1));
        assert_eq!(previous_month(date(2026, 3, 31)), date(2026, 2, 1));

        let months = vec![MonthBucket {
            year: 2025,
            month: 12,
            total_amount: 40.0,
            item_count: 4,
        }];
        assert_eq!(month_total(&months, date(2025, 12, 20)), 40.0);
        assert_eq!(month_total(&months, date(2026, 1, 20)), 0.0);
    }
}

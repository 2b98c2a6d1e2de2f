//! Period rollups: daily, weekly (ISO-8601) and monthly buckets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Transaction;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError(String);

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown period '{}' (expected daily, weekly or monthly)",
            self.0
        )
    }
}

impl std::error::Error for ParsePeriodError {}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl Period {
    /// Bucket key that `date` falls into for this period.
    pub fn key_for(self, date: NaiveDate) -> BucketKey {
        match self {
            Period::Daily => BucketKey::Day(date),
            Period::Weekly => {
                let week = date.iso_week();
                BucketKey::Week {
                    iso_year: week.year(),
                    week: week.week(),
                }
            }
            Period::Monthly => BucketKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }
}

/// Sortable bucket identifier.
///
/// Ordering is chronological within a single variant; one aggregation only
/// ever produces keys of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    Day(NaiveDate),
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl BucketKey {
    /// First calendar day covered by the bucket.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            BucketKey::Day(date) => Some(date),
            BucketKey::Week { iso_year, week } => {
                NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)
            }
            BucketKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            BucketKey::Week { iso_year, week } => write!(f, "{iso_year}-W{week:02}"),
            BucketKey::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    pub key: BucketKey,
    pub total_amount: Decimal,
    pub quantity: u64,
    pub transaction_count: usize,
}

impl PeriodBucket {
    fn empty(key: BucketKey) -> Self {
        Self {
            key,
            total_amount: Decimal::ZERO,
            quantity: 0,
            transaction_count: 0,
        }
    }

    fn add(&mut self, t: &Transaction) {
        self.total_amount = self.total_amount.saturating_add(t.total_amount);
        self.quantity += u64::from(t.quantity);
        self.transaction_count += 1;
    }
}

/// Rolls `records` up into buckets for `period`, ordered by key ascending.
pub fn aggregate(records: &[Transaction], period: Period) -> Vec<PeriodBucket> {
    let buckets = records
        .iter()
        .fold(BTreeMap::<BucketKey, PeriodBucket>::new(), |mut acc, t| {
            let key = period.key_for(t.date);
            acc.entry(key)
                .or_insert_with(|| PeriodBucket::empty(key))
                .add(t);
            acc
        });
    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(y: i32, m: u32, d: u32, price: Decimal, qty: u32) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), "Shirt", price, qty, "A")
            .unwrap()
    }

    #[test]
    fn bucket_total_saturates() {
        let records = vec![tx(2024, 1, 1, Decimal::MAX, 1), tx(2024, 1, 1, dec!(1), 1)];
        let buckets = aggregate(&records, Period::Daily);
        assert_eq!(buckets[0].total_amount, Decimal::MAX);
        assert_eq!(buckets[0].transaction_count, 2);
    }

    #[test]
    fn daily_buckets_sorted_by_date() {
        let records = vec![
            tx(2024, 1, 3, dec!(10), 1),
            tx(2024, 1, 1, dec!(20), 2),
            tx(2024, 1, 3, dec!(5), 1),
        ];
        let buckets = aggregate(&records, Period::Daily);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key.to_string(), "2024-01-01");
        assert_eq!(buckets[0].total_amount, dec!(40));
        assert_eq!(buckets[1].total_amount, dec!(15));
        assert_eq!(buckets[1].quantity, 2);
        assert_eq!(buckets[1].transaction_count, 2);
    }

    #[test]
    fn weekly_uses_iso_weeks_across_year_boundary() {
        // 2024-12-30 is Monday of ISO week 2025-W01.
        let records = vec![
            tx(2024, 12, 29, dec!(1), 1),
            tx(2024, 12, 30, dec!(2), 1),
            tx(2025, 1, 5, dec!(3), 1),
        ];
        let buckets = aggregate(&records, Period::Weekly);
        let keys: Vec<_> = buckets.iter().map(|b| b.key.to_string()).collect();
        assert_eq!(keys, vec!["2024-W52", "2025-W01"]);
        assert_eq!(buckets[1].total_amount, dec!(5));
        assert_eq!(
            buckets[1].key.start_date(),
            NaiveDate::from_ymd_opt(2024, 12, 30)
        );
    }

    #[test]
    fn monthly_keys_keep_year() {
        let records = vec![
            tx(2025, 1, 10, dec!(1), 1),
            tx(2024, 1, 10, dec!(1), 1),
            tx(2024, 2, 1, dec!(1), 1),
        ];
        let keys: Vec<_> = aggregate(&records, Period::Monthly)
            .iter()
            .map(|b| b.key.to_string())
            .collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2025-01"]);
    }

    #[test]
    fn period_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<Period>(), Ok(Period::Weekly));
        assert!("yearly".parse::<Period>().is_err());
        assert_eq!(Period::Monthly.to_string(), "monthly");
    }
}

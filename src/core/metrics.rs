//! Business metrics for the dashboard widgets.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::Transaction;
use super::period::{Period, PeriodBucket, aggregate};

/// Length of the trailing window used for the run rate and growth figures.
pub const TRAILING_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessMetrics {
    pub total_revenue: Decimal,
    pub total_transactions: usize,
    pub avg_order_value: Decimal,
    pub total_quantity: u64,
    pub top_seller: String,
    pub top_seller_revenue: Decimal,
    pub top_product: String,
    pub top_product_qty: u64,
    /// Trailing-window revenue divided by 7, whether or not every day had sales.
    pub daily_avg: Decimal,
    /// Percentage change of this week's revenue over last week's.
    ///
    /// Zero when last week had no revenue, which also hides growth from zero.
    /// Saturates at [`Decimal::MAX`] when the ratio is too large to represent.
    pub growth_rate: Decimal,
    /// Revenue of every record whose month-of-year equals the current one,
    /// from any year.
    pub monthly_revenue: Decimal,
    pub monthly_transactions: usize,
}

/// Totals shown above a filtered transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_revenue: Decimal,
    pub total_quantity: u64,
    pub transaction_count: usize,
    pub avg_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub revenue: Decimal,
}

/// Inclusive start of this week and of last week relative to `today`.
fn window_starts(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week_ago = today
        .checked_sub_days(Days::new(TRAILING_DAYS))
        .unwrap_or(NaiveDate::MIN);
    let two_weeks_ago = week_ago
        .checked_sub_days(Days::new(TRAILING_DAYS))
        .unwrap_or(NaiveDate::MIN);
    (week_ago, two_weeks_ago)
}

/// Sum of `total_amount`, saturating at [`Decimal::MAX`].
fn revenue<'a>(records: impl Iterator<Item = &'a Transaction>) -> Decimal {
    records.fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.total_amount))
}

/// Key with the largest value; on equal values the smallest key wins.
fn arg_max<V: PartialOrd + Copy>(groups: BTreeMap<&str, V>) -> Option<(String, V)> {
    let mut best: Option<(&str, V)> = None;
    for (key, value) in groups {
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((key, value)),
        }
    }
    best.map(|(key, value)| (key.to_string(), value))
}

/// Computes the dashboard metrics as of `today`.
///
/// Returns `None` when there are no records.
pub fn compute_metrics(records: &[Transaction], today: NaiveDate) -> Option<BusinessMetrics> {
    if records.is_empty() {
        return None;
    }

    let total_revenue = revenue(records.iter());
    let total_transactions = records.len();
    let total_quantity: u64 = records.iter().map(|t| u64::from(t.quantity)).sum();

    let mut by_seller: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut by_product: BTreeMap<&str, u64> = BTreeMap::new();
    for t in records {
        let seller = by_seller.entry(t.seller.as_str()).or_default();
        *seller = seller.saturating_add(t.total_amount);
        *by_product.entry(t.product_name.as_str()).or_default() += u64::from(t.quantity);
    }
    let (top_seller, top_seller_revenue) = arg_max(by_seller)?;
    let (top_product, top_product_qty) = arg_max(by_product)?;

    let (week_ago, two_weeks_ago) = window_starts(today);
    let this_week = revenue(
        records
            .iter()
            .filter(|t| t.date >= week_ago && t.date <= today),
    );
    let last_week = revenue(
        records
            .iter()
            .filter(|t| t.date >= two_weeks_ago && t.date < week_ago),
    );
    let daily_avg = this_week / Decimal::from(TRAILING_DAYS);
    let growth_rate = if last_week > Decimal::ZERO {
        (this_week - last_week)
            .checked_div(last_week)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    let month = today.month();
    let current_month: Vec<&Transaction> =
        records.iter().filter(|t| t.date.month() == month).collect();
    let monthly_revenue = revenue(current_month.iter().copied());

    debug!(
        %today,
        records = total_transactions,
        %this_week,
        %last_week,
        "Computed business metrics"
    );

    Some(BusinessMetrics {
        total_revenue,
        total_transactions,
        avg_order_value: total_revenue / Decimal::from(total_transactions),
        total_quantity,
        top_seller,
        top_seller_revenue,
        top_product,
        top_product_qty,
        daily_avg,
        growth_rate,
        monthly_revenue,
        monthly_transactions: current_month.len(),
    })
}

/// [`compute_metrics`] evaluated against the local calendar date.
pub fn compute_metrics_now(records: &[Transaction]) -> Option<BusinessMetrics> {
    compute_metrics(records, Local::now().date_naive())
}

/// Totals for a filtered view. An empty view yields zeroes.
pub fn summarize(records: &[Transaction]) -> Summary {
    let total_revenue = revenue(records.iter());
    let transaction_count = records.len();
    let avg_order_value = if transaction_count == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(transaction_count)
    };
    Summary {
        total_revenue,
        total_quantity: records.iter().map(|t| u64::from(t.quantity)).sum(),
        transaction_count,
        avg_order_value,
    }
}

/// Products ranked by revenue, highest first, keeping at most `limit`.
pub fn top_products_by_revenue(records: &[Transaction], limit: usize) -> Vec<ProductRevenue> {
    let mut by_product: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in records {
        let product = by_product.entry(t.product_name.as_str()).or_default();
        *product = product.saturating_add(t.total_amount);
    }
    let mut ranked: Vec<ProductRevenue> = by_product
        .into_iter()
        .map(|(name, revenue)| ProductRevenue {
            product_name: name.to_string(),
            revenue,
        })
        .collect();
    // stable sort keeps name order among equal revenues
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked.truncate(limit);
    ranked
}

/// Daily revenue for the trailing window ending on `today`.
pub fn recent_daily_trend(records: &[Transaction], today: NaiveDate) -> Vec<PeriodBucket> {
    let (week_ago, _) = window_starts(today);
    let recent: Vec<Transaction> = records
        .iter()
        .filter(|t| t.date >= week_ago && t.date <= today)
        .cloned()
        .collect();
    aggregate(&recent, Period::Daily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(date: NaiveDate, product: &str, price: Decimal, qty: u32, seller: &str) -> Transaction {
        Transaction::new(date, product, price, qty, seller).unwrap()
    }

    #[test]
    fn empty_input_has_no_metrics() {
        assert_eq!(compute_metrics(&[], ymd(2024, 1, 10)), None);
    }

    #[test]
    fn growth_is_zero_without_last_week_revenue() {
        let today = ymd(2024, 3, 20);
        let records = vec![tx(ymd(2024, 3, 18), "Shirt", dec!(150), 1, "A")];
        let m = compute_metrics(&records, today).unwrap();
        assert_eq!(m.growth_rate, Decimal::ZERO);
        assert_eq!(m.daily_avg, dec!(150) / dec!(7));
    }

    #[test]
    fn growth_compares_adjacent_windows() {
        let today = ymd(2024, 3, 20);
        let records = vec![
            // week_ago is 2024-03-13; last week spans 03-06 ..= 03-12
            tx(ymd(2024, 3, 13), "Shirt", dec!(150), 1, "A"),
            tx(ymd(2024, 3, 12), "Shirt", dec!(100), 1, "A"),
            tx(ymd(2024, 3, 5), "Shirt", dec!(999), 1, "A"),
        ];
        let m = compute_metrics(&records, today).unwrap();
        assert_eq!(m.growth_rate, dec!(50));
        assert_eq!(m.daily_avg, dec!(150) / dec!(7));
    }

    #[test]
    fn growth_saturates_on_tiny_last_week() {
        let today = ymd(2024, 3, 20);
        let records = vec![
            tx(ymd(2024, 3, 18), "Shirt", dec!(10), 1, "A"),
            tx(ymd(2024, 3, 10), "Button", dec!(0.0000000000000000000000000001), 1, "A"),
        ];
        let m = compute_metrics(&records, today).unwrap();
        assert_eq!(m.growth_rate, Decimal::MAX);
    }

    #[test]
    fn revenue_totals_saturate() {
        let d = ymd(2024, 1, 1);
        let records = vec![
            tx(d, "Gold", Decimal::MAX, 1, "A"),
            tx(d, "Gold", Decimal::MAX, 1, "A"),
        ];
        let m = compute_metrics(&records, d).unwrap();
        assert_eq!(m.total_revenue, Decimal::MAX);
        assert_eq!(m.top_seller_revenue, Decimal::MAX);
        assert_eq!(m.monthly_revenue, Decimal::MAX);
        assert_eq!(summarize(&records).total_revenue, Decimal::MAX);
        assert_eq!(top_products_by_revenue(&records, 1)[0].revenue, Decimal::MAX);
    }

    #[test]
    fn future_dates_are_outside_the_trailing_window() {
        let today = ymd(2024, 3, 20);
        let records = vec![tx(ymd(2024, 3, 21), "Shirt", dec!(70), 1, "A")];
        let m = compute_metrics(&records, today).unwrap();
        assert_eq!(m.daily_avg, Decimal::ZERO);
    }

    #[test]
    fn product_tie_prefers_smallest_name() {
        let d = ymd(2024, 1, 1);
        let records = vec![
            tx(d, "Saree", dec!(10), 2, "A"),
            tx(d, "Kurta", dec!(10), 2, "A"),
        ];
        let m = compute_metrics(&records, d).unwrap();
        assert_eq!(m.top_product, "Kurta");
        assert_eq!(m.top_product_qty, 2);
    }

    #[test]
    fn summary_of_empty_view_is_zero() {
        let s = summarize(&[]);
        assert_eq!(s.transaction_count, 0);
        assert_eq!(s.avg_order_value, Decimal::ZERO);
    }

    #[test]
    fn top_products_ranked_and_truncated() {
        let d = ymd(2024, 1, 1);
        let records = vec![
            tx(d, "Shirt", dec!(100), 2, "A"),
            tx(d, "Saree", dec!(500), 1, "B"),
            tx(d, "Dupatta", dec!(50), 1, "B"),
            tx(d, "Kurta", dec!(200), 1, "A"),
        ];
        let top = top_products_by_revenue(&records, 3);
        let names: Vec<_> = top.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["Saree", "Kurta", "Shirt"]);
    }

    #[test]
    fn recent_trend_covers_trailing_window_only() {
        let today = ymd(2024, 3, 20);
        let records = vec![
            tx(ymd(2024, 3, 12), "Shirt", dec!(1), 1, "A"),
            tx(ymd(2024, 3, 13), "Shirt", dec!(2), 1, "A"),
            tx(ymd(2024, 3, 20), "Shirt", dec!(3), 1, "A"),
        ];
        let trend = recent_daily_trend(&records, today);
        let totals: Vec<_> = trend.iter().map(|b| b.total_amount).collect();
        assert_eq!(totals, vec![dec!(2), dec!(3)]);
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sales_dashboard::core::{Period, Store, aggregate, compute_metrics};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn shop_store() -> Store {
    let mut store = Store::default();
    store.add(ymd(2024, 1, 1), "Shirt", dec!(100), 2, "A").unwrap();
    store.add(ymd(2024, 1, 1), "Saree", dec!(500), 1, "B").unwrap();
    store.add(ymd(2024, 1, 8), "Shirt", dec!(100), 1, "A").unwrap();
    store
}

#[test]
fn shirt_and_saree_scenario() {
    let store = shop_store();
    let m = compute_metrics(store.snapshot(), ymd(2024, 1, 10)).unwrap();
    assert_eq!(m.total_revenue, dec!(800));
    assert_eq!(m.total_transactions, 3);
    assert_eq!(m.total_quantity, 4);
    assert_eq!(m.top_seller, "B");
    assert_eq!(m.top_seller_revenue, dec!(500));
    assert_eq!(m.top_product, "Shirt");
    assert_eq!(m.top_product_qty, 3);
    assert_eq!(m.avg_order_value, dec!(800) / dec!(3));
}

#[test]
fn revenue_equals_price_times_quantity() {
    let mut store = Store::default();
    let prices = [dec!(0.10), dec!(19.99), dec!(333.33), dec!(0.01)];
    for (i, price) in (1u32..).zip(prices) {
        store.add(ymd(2024, 2, i), "Item", price, 2 + i, "S").unwrap();
    }
    let expected: Decimal = store
        .snapshot()
        .iter()
        .map(|t| t.price * Decimal::from(t.quantity))
        .sum();
    let m = compute_metrics(store.snapshot(), ymd(2024, 2, 10)).unwrap();
    assert_eq!(m.total_revenue, expected);
}

#[test]
fn daily_buckets_account_for_every_record() {
    let store = shop_store();
    let buckets = aggregate(store.snapshot(), Period::Daily);
    let bucket_total: Decimal = buckets.iter().map(|b| b.total_amount).sum();
    let count: usize = buckets.iter().map(|b| b.transaction_count).sum();
    assert_eq!(bucket_total, dec!(800));
    assert_eq!(count, 3);
}

#[test]
fn empty_store_has_no_metrics_and_no_buckets() {
    let store = Store::default();
    assert!(compute_metrics(store.snapshot(), ymd(2024, 1, 1)).is_none());
    for period in [Period::Daily, Period::Weekly, Period::Monthly] {
        assert!(aggregate(store.snapshot(), period).is_empty());
    }
}

#[test]
fn growth_from_zero_reports_zero() {
    let mut store = Store::default();
    store.add(ymd(2024, 6, 28), "Kurta", dec!(150), 1, "A").unwrap();
    let m = compute_metrics(store.snapshot(), ymd(2024, 6, 30)).unwrap();
    assert_eq!(m.growth_rate, Decimal::ZERO);
}

#[test]
fn seller_tie_goes_to_smallest_name_every_time() {
    let mut store = Store::default();
    store.add(ymd(2024, 1, 1), "Shirt", dec!(250), 1, "Zoya").unwrap();
    store.add(ymd(2024, 1, 1), "Saree", dec!(250), 1, "Arjun").unwrap();
    for _ in 0..5 {
        let m = compute_metrics(store.snapshot(), ymd(2024, 1, 2)).unwrap();
        assert_eq!(m.top_seller, "Arjun");
        assert_eq!(m.top_seller_revenue, dec!(250));
    }
}

#[test]
fn current_month_ignores_year() {
    let mut store = Store::default();
    store.add(ymd(2023, 1, 10), "Shirt", dec!(100), 1, "A").unwrap();
    store.add(ymd(2024, 1, 5), "Shirt", dec!(40), 1, "A").unwrap();
    store.add(ymd(2024, 2, 1), "Shirt", dec!(7), 1, "A").unwrap();
    let m = compute_metrics(store.snapshot(), ymd(2024, 1, 15)).unwrap();
    assert_eq!(m.monthly_revenue, dec!(140));
    assert_eq!(m.monthly_transactions, 2);
}

#[test]
fn daily_average_always_divides_by_seven() {
    let mut store = Store::default();
    store.add(ymd(2024, 6, 30), "Shirt", dec!(70), 1, "A").unwrap();
    let m = compute_metrics(store.snapshot(), ymd(2024, 6, 30)).unwrap();
    assert_eq!(m.daily_avg, dec!(10));
}

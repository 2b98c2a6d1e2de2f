use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sales_dashboard::core::{ALL_SELLERS, Filter, Store, filter};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> Store {
    let mut store = Store::default();
    store.add(ymd(2024, 1, 10), "Shirt", dec!(100), 1, "A").unwrap();
    store.add(ymd(2024, 1, 3), "Saree", dec!(500), 1, "B").unwrap();
    store.add(ymd(2024, 1, 20), "Kurta", dec!(300), 2, "A").unwrap();
    store
}

#[test]
fn no_bounds_returns_input_unchanged() {
    let store = store();
    assert_eq!(filter(store.snapshot(), None, None, None), store.snapshot());
    assert_eq!(
        filter(store.snapshot(), None, None, Some(ALL_SELLERS)),
        store.snapshot()
    );
}

#[test]
fn filtering_twice_changes_nothing() {
    let store = store();
    let (start, end) = (Some(ymd(2024, 1, 5)), Some(ymd(2024, 1, 20)));
    let once = filter(store.snapshot(), start, end, Some("A"));
    let twice = filter(&once, start, end, Some("A"));
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[test]
fn input_is_not_modified() {
    let store = store();
    let before = store.snapshot().to_vec();
    let _ = filter(store.snapshot(), Some(ymd(2024, 1, 15)), None, Some("B"));
    assert_eq!(store.snapshot(), before.as_slice());
}

#[test]
fn query_string_matches_keyword_filter() {
    let store = store();
    let q = Filter::from_str("date:2024-01-01..2024-01-10 seller:A").unwrap();
    let res = q.apply(store.snapshot());
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].product_name, "Shirt");
    assert_eq!(
        res,
        filter(
            store.snapshot(),
            Some(ymd(2024, 1, 1)),
            Some(ymd(2024, 1, 10)),
            Some("A")
        )
    );
}

#[test]
fn unknown_seller_yields_empty_view() {
    let store = store();
    assert!(filter(store.snapshot(), None, None, Some("Nobody")).is_empty());
}

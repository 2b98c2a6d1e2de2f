//! Plain-text rendering of dashboard widgets and tables.

use rust_decimal::Decimal;

use crate::core::{
    BusinessMetrics, DisplayPreferences, Period, PeriodBucket, ProductRevenue, Summary,
    Transaction, Widget,
};

/// `1234567.5` with symbol `₹` becomes `₹1,234,567.50`.
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// `+12.5%`, `-3.0%`, or `No change` for exactly zero.
pub fn format_growth(rate: Decimal) -> String {
    if rate.is_zero() {
        return "No change".to_string();
    }
    let sign = if rate.is_sign_positive() { "+" } else { "-" };
    format!("{sign}{:.1}%", rate.abs().round_dp(1))
}

struct Card {
    title: &'static str,
    value: String,
    caption: Option<String>,
}

fn cards(metrics: &BusinessMetrics, symbol: &str, widgets: &[Widget]) -> Vec<Card> {
    widgets
        .iter()
        .map(|w| match w {
            Widget::TotalRevenue => Card {
                title: "Total Revenue",
                value: format_money(metrics.total_revenue, symbol),
                caption: None,
            },
            Widget::TotalTransactions => Card {
                title: "Total Transactions",
                value: format_count(metrics.total_transactions as u64),
                caption: None,
            },
            Widget::AvgOrderValue => Card {
                title: "Average Order Value",
                value: format_money(metrics.avg_order_value, symbol),
                caption: None,
            },
            Widget::DailySales => Card {
                title: "Daily Average (7 days)",
                value: format_money(metrics.daily_avg, symbol),
                caption: None,
            },
            Widget::TopSeller => Card {
                title: "Top Seller",
                value: metrics.top_seller.clone(),
                caption: Some(format!(
                    "{} revenue",
                    format_money(metrics.top_seller_revenue, symbol)
                )),
            },
            Widget::ProductPerformance => Card {
                title: "Best Selling Product",
                value: metrics.top_product.clone(),
                caption: Some(format!("{} units sold", metrics.top_product_qty)),
            },
            Widget::WeeklyTrend => Card {
                title: "Weekly Growth",
                value: format_growth(metrics.growth_rate),
                caption: Some("vs last week".to_string()),
            },
            Widget::MonthlyComparison => Card {
                title: "This Month",
                value: format_money(metrics.monthly_revenue, symbol),
                caption: Some(format!("{} transactions", metrics.monthly_transactions)),
            },
        })
        .collect()
}

/// Metric cards for every widget enabled in `prefs`, in dashboard order.
pub fn render_metrics(
    metrics: &BusinessMetrics,
    prefs: &DisplayPreferences,
    symbol: &str,
) -> String {
    let mut out = String::new();
    for card in cards(metrics, symbol, &prefs.visible()) {
        out.push_str(&format!("{:<24} {}\n", card.title, card.value));
        if let Some(caption) = card.caption {
            out.push_str(&format!("{:<24} {}\n", "", caption));
        }
    }
    out
}

pub fn render_top_products(products: &[ProductRevenue], symbol: &str) -> String {
    if products.is_empty() {
        return "No product data available\n".to_string();
    }
    let width = products
        .iter()
        .map(|p| p.product_name.chars().count())
        .max()
        .unwrap_or(0);
    products
        .iter()
        .map(|p| {
            format!(
                "{:<width$}  {}\n",
                p.product_name,
                format_money(p.revenue, symbol)
            )
        })
        .collect()
}

pub fn render_summary(summary: &Summary, symbol: &str) -> String {
    format!(
        "Total Revenue: {}  Total Quantity: {}  Total Transactions: {}  Average Order Value: {}\n",
        format_money(summary.total_revenue, symbol),
        format_count(summary.total_quantity),
        format_count(summary.transaction_count as u64),
        format_money(summary.avg_order_value, symbol),
    )
}

fn render_table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<width$}", width = *w))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };
    let mut out = line(header.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("-+-")));
    for row in &rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

pub fn render_transactions(records: &[Transaction], symbol: &str) -> String {
    let rows = records
        .iter()
        .map(|t| {
            vec![
                t.date.format("%Y-%m-%d").to_string(),
                t.product_name.clone(),
                format_money(t.price, symbol),
                t.quantity.to_string(),
                t.seller.clone(),
                format_money(t.total_amount, symbol),
            ]
        })
        .collect();
    render_table(
        &["Date", "Product Name", "Price", "Quantity", "Seller", "Total Amount"],
        rows,
    )
}

pub fn render_buckets(period: Period, buckets: &[PeriodBucket], symbol: &str) -> String {
    let label = match period {
        Period::Daily => "Day",
        Period::Weekly => "Week",
        Period::Monthly => "Month",
    };
    let rows = buckets
        .iter()
        .map(|b| {
            vec![
                b.key.to_string(),
                format_money(b.total_amount, symbol),
                format_count(b.quantity),
                format_count(b.transaction_count as u64),
            ]
        })
        .collect();
    render_table(&[label, "Revenue", "Quantity Sold", "Transactions"], rows)
}

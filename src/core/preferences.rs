use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dashboard widgets that can be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Widget {
    TotalRevenue,
    TotalTransactions,
    AvgOrderValue,
    TopSeller,
    DailySales,
    ProductPerformance,
    WeeklyTrend,
    MonthlyComparison,
}

impl Widget {
    pub const ALL: [Widget; 8] = [
        Widget::TotalRevenue,
        Widget::TotalTransactions,
        Widget::AvgOrderValue,
        Widget::TopSeller,
        Widget::DailySales,
        Widget::ProductPerformance,
        Widget::WeeklyTrend,
        Widget::MonthlyComparison,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Widget::TotalRevenue => "total_revenue",
            Widget::TotalTransactions => "total_transactions",
            Widget::AvgOrderValue => "avg_order_value",
            Widget::TopSeller => "top_seller",
            Widget::DailySales => "daily_sales",
            Widget::ProductPerformance => "product_performance",
            Widget::WeeklyTrend => "weekly_trend",
            Widget::MonthlyComparison => "monthly_comparison",
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWidget(pub String);

impl fmt::Display for UnknownWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown widget: {}", self.0)
    }
}

impl std::error::Error for UnknownWidget {}

impl FromStr for Widget {
    type Err = UnknownWidget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Widget::ALL
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or_else(|| UnknownWidget(s.to_string()))
    }
}

fn shown() -> bool {
    true
}

/// Which dashboard widgets are visible. Every widget is shown by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    #[serde(default = "shown")]
    pub total_revenue: bool,
    #[serde(default = "shown")]
    pub total_transactions: bool,
    #[serde(default = "shown")]
    pub avg_order_value: bool,
    #[serde(default = "shown")]
    pub top_seller: bool,
    #[serde(default = "shown")]
    pub daily_sales: bool,
    #[serde(default = "shown")]
    pub product_performance: bool,
    #[serde(default = "shown")]
    pub weekly_trend: bool,
    #[serde(default = "shown")]
    pub monthly_comparison: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            total_revenue: true,
            total_transactions: true,
            avg_order_value: true,
            top_seller: true,
            daily_sales: true,
            product_performance: true,
            weekly_trend: true,
            monthly_comparison: true,
        }
    }
}

impl DisplayPreferences {
    fn flag_mut(&mut self, widget: Widget) -> &mut bool {
        match widget {
            Widget::TotalRevenue => &mut self.total_revenue,
            Widget::TotalTransactions => &mut self.total_transactions,
            Widget::AvgOrderValue => &mut self.avg_order_value,
            Widget::TopSeller => &mut self.top_seller,
            Widget::DailySales => &mut self.daily_sales,
            Widget::ProductPerformance => &mut self.product_performance,
            Widget::WeeklyTrend => &mut self.weekly_trend,
            Widget::MonthlyComparison => &mut self.monthly_comparison,
        }
    }

    pub fn is_shown(&self, widget: Widget) -> bool {
        match widget {
            Widget::TotalRevenue => self.total_revenue,
            Widget::TotalTransactions => self.total_transactions,
            Widget::AvgOrderValue => self.avg_order_value,
            Widget::TopSeller => self.top_seller,
            Widget::DailySales => self.daily_sales,
            Widget::ProductPerformance => self.product_performance,
            Widget::WeeklyTrend => self.weekly_trend,
            Widget::MonthlyComparison => self.monthly_comparison,
        }
    }

    pub fn set(&mut self, widget: Widget, visible: bool) {
        *self.flag_mut(widget) = visible;
    }

    /// Returns a copy with `widget` set to `visible`.
    pub fn with(mut self, widget: Widget, visible: bool) -> Self {
        self.set(widget, visible);
        self
    }

    pub fn visible(&self) -> Vec<Widget> {
        Widget::ALL
            .into_iter()
            .filter(|w| self.is_shown(*w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_visible_by_default() {
        assert_eq!(DisplayPreferences::default().visible(), Widget::ALL.to_vec());
    }

    #[test]
    fn toggling_one_widget() {
        let prefs = DisplayPreferences::default().with(Widget::TopSeller, false);
        assert!(!prefs.is_shown(Widget::TopSeller));
        assert!(prefs.is_shown(Widget::TotalRevenue));
        assert_eq!(prefs.visible().len(), 7);
    }

    #[test]
    fn widget_names_round_trip() {
        for w in Widget::ALL {
            assert_eq!(w.name().parse::<Widget>(), Ok(w));
        }
        assert!("sparkline".parse::<Widget>().is_err());
    }
}

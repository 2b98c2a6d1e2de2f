//! Core logic for the append-only sales store and its analytics.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod filter;
pub mod metrics;
pub mod period;
pub mod preferences;
pub mod session;

pub use filter::{ALL_SELLERS, Filter, FilterParseError, filter};
pub use metrics::{
    BusinessMetrics, ProductRevenue, Summary, compute_metrics, compute_metrics_now,
    recent_daily_trend, summarize, top_products_by_revenue,
};
pub use period::{BucketKey, Period, PeriodBucket, aggregate};
pub use preferences::{DisplayPreferences, Widget};
pub use session::Session;

/// Errors that can occur when creating a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The product name is empty or only whitespace.
    EmptyProductName,
    /// The seller name is empty or only whitespace.
    EmptySeller,
    /// The unit price is zero or negative.
    NonPositivePrice,
    /// The quantity is zero.
    NonPositiveQuantity,
    /// `price * quantity` does not fit in a [`Decimal`].
    AmountOverflow,
}

impl std::fmt::Display for TransactionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionError::EmptyProductName => write!(f, "product name must not be empty"),
            TransactionError::EmptySeller => write!(f, "seller must not be empty"),
            TransactionError::NonPositivePrice => write!(f, "price must be positive"),
            TransactionError::NonPositiveQuantity => write!(f, "quantity must be positive"),
            TransactionError::AmountOverflow => write!(f, "total amount is too large"),
        }
    }
}

impl std::error::Error for TransactionError {}

/// A single recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the sale.
    pub date: NaiveDate,
    /// Name of the product sold.
    pub product_name: String,
    /// Price per unit.
    pub price: Decimal,
    /// Number of units sold.
    pub quantity: u32,
    /// Who made the sale.
    pub seller: String,
    /// `price * quantity`, fixed when the transaction is created.
    pub total_amount: Decimal,
}

impl Transaction {
    /// Creates a new transaction after validating its fields.
    pub fn new(
        date: NaiveDate,
        product_name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        seller: impl Into<String>,
    ) -> Result<Self, TransactionError> {
        let product_name = product_name.into();
        let seller = seller.into();
        if product_name.trim().is_empty() {
            return Err(TransactionError::EmptyProductName);
        }
        if seller.trim().is_empty() {
            return Err(TransactionError::EmptySeller);
        }
        if price <= Decimal::ZERO {
            return Err(TransactionError::NonPositivePrice);
        }
        if quantity == 0 {
            return Err(TransactionError::NonPositiveQuantity);
        }
        let total_amount = price
            .checked_mul(Decimal::from(quantity))
            .ok_or(TransactionError::AmountOverflow)?;

        Ok(Self {
            date,
            product_name,
            price,
            quantity,
            seller,
            total_amount,
        })
    }
}

/// In-memory append-only store of transactions.
#[derive(Debug, Default)]
pub struct Store {
    transactions: Vec<Transaction>,
}

impl Store {
    /// Appends an already validated transaction.
    pub fn append(&mut self, transaction: Transaction) {
        debug!(
            date = %transaction.date,
            product = %transaction.product_name,
            seller = %transaction.seller,
            total = %transaction.total_amount,
            "Appending transaction"
        );
        self.transactions.push(transaction);
    }

    /// Validates the fields and appends the resulting transaction.
    ///
    /// Nothing is stored when validation fails.
    pub fn add(
        &mut self,
        date: NaiveDate,
        product_name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        seller: impl Into<String>,
    ) -> Result<&Transaction, TransactionError> {
        let transaction = Transaction::new(date, product_name, price, quantity, seller)?;
        self.append(transaction);
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Appends every transaction in `transactions`, in order.
    pub fn extend(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        for transaction in transactions {
            self.append(transaction);
        }
    }

    /// Immutable view of every transaction in insertion order.
    pub fn snapshot(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Distinct sellers in order of first appearance.
    pub fn sellers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for t in &self.transactions {
            if !seen.contains(&t.seller) {
                seen.push(t.seller.clone());
            }
        }
        seen
    }
}

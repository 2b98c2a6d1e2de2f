use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use super::{DisplayPreferences, Store, Transaction, TransactionError, Widget};

/// State owned by one interactive run: the transaction store and the
/// widget preferences chosen for it.
#[derive(Debug, Default)]
pub struct Session {
    store: Store,
    preferences: DisplayPreferences,
}

impl Session {
    pub fn new(preferences: DisplayPreferences) -> Self {
        Self {
            store: Store::default(),
            preferences,
        }
    }

    /// Starts a session whose store is seeded with `transactions`.
    pub fn with_transactions(
        preferences: DisplayPreferences,
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> Self {
        let mut session = Self::new(preferences);
        session.store.extend(transactions);
        info!(records = session.store.len(), "Session started");
        session
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> &[Transaction] {
        self.store.snapshot()
    }

    pub fn preferences(&self) -> DisplayPreferences {
        self.preferences
    }

    pub fn set_widget(&mut self, widget: Widget, visible: bool) {
        info!(%widget, visible, "Widget preference changed");
        self.preferences.set(widget, visible);
    }

    pub fn add_transaction(
        &mut self,
        date: NaiveDate,
        product_name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        seller: impl Into<String>,
    ) -> Result<&Transaction, TransactionError> {
        self.store.add(date, product_name, price, quantity, seller)
    }
}

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ImportError, StatementImporter};
use crate::core::Transaction;

#[derive(Deserialize)]
struct JsonSale {
    date: NaiveDate,
    product_name: String,
    price: Decimal,
    quantity: u32,
    seller: String,
}

pub struct JsonImporter;

impl JsonImporter {
    fn parse_internal(path: &Path) -> Result<Vec<Transaction>, ImportError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    pub fn parse_str(input: &str) -> Result<Vec<Transaction>, ImportError> {
        let sales: Vec<JsonSale> =
            serde_json::from_str(input).map_err(|e| ImportError::Parse(e.to_string()))?;
        sales
            .into_iter()
            .enumerate()
            .map(|(idx, s)| {
                Transaction::new(s.date, s.product_name, s.price, s.quantity, s.seller)
                    .map_err(|source| ImportError::Transaction {
                        row: idx + 1,
                        source,
                    })
            })
            .collect()
    }
}

impl StatementImporter for JsonImporter {
    fn parse(path: &Path) -> Result<Vec<Transaction>, ImportError> {
        Self::parse_internal(path)
    }
}

pub fn parse(path: &Path) -> Result<Vec<Transaction>, ImportError> {
    JsonImporter::parse(path)
}

pub fn parse_str(input: &str) -> Result<Vec<Transaction>, ImportError> {
    JsonImporter::parse_str(input)
}

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::Reader;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ImportError, StatementImporter};
use crate::core::Transaction;

/// One input row. A `total_amount` column, if present, is ignored and
/// recomputed from price and quantity.
#[derive(Deserialize)]
struct CsvRow {
    date: String,
    product_name: String,
    price: String,
    quantity: u32,
    seller: String,
}

pub struct CsvImporter;

impl CsvImporter {
    fn parse_internal(path: &Path) -> Result<Vec<Transaction>, ImportError> {
        let rdr = Reader::from_path(path).map_err(|e| ImportError::Parse(e.to_string()))?;
        Self::parse_reader(rdr)
    }

    fn parse_reader<R: std::io::Read>(
        mut rdr: Reader<R>,
    ) -> Result<Vec<Transaction>, ImportError> {
        let mut records = Vec::new();
        for (idx, result) in rdr.deserialize().enumerate() {
            let row: CsvRow = result.map_err(|e| ImportError::Parse(e.to_string()))?;
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
                .map_err(|_| ImportError::Parse(format!("invalid date: {}", row.date)))?;
            let price = Decimal::from_str(row.price.trim())
                .map_err(|_| ImportError::Parse(format!("invalid price: {}", row.price)))?;
            let rec = Transaction::new(date, row.product_name, price, row.quantity, row.seller)
                .map_err(|source| ImportError::Transaction {
                    row: idx + 1,
                    source,
                })?;
            records.push(rec);
        }
        Ok(records)
    }
}

impl StatementImporter for CsvImporter {
    fn parse(path: &Path) -> Result<Vec<Transaction>, ImportError> {
        Self::parse_internal(path)
    }
}

pub fn parse(path: &Path) -> Result<Vec<Transaction>, ImportError> {
    CsvImporter::parse(path)
}

pub fn parse_str(input: &str) -> Result<Vec<Transaction>, ImportError> {
    CsvImporter::parse_reader(Reader::from_reader(input.as_bytes()))
}

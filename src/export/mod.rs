//! Serializes a filtered view to CSV or XLSX bytes.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use csv::WriterBuilder;
use rust_decimal::prelude::ToPrimitive;
use tracing::info;

use crate::core::Transaction;

/// Column order shared by every export format.
pub const COLUMNS: [&str; 6] = [
    "date",
    "product_name",
    "price",
    "quantity",
    "seller",
    "total_amount",
];

pub const SHEET_NAME: &str = "Sales Data";

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Xlsx(String),
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "csv error: {e}"),
            ExportError::Xlsx(e) => write!(f, "xlsx error: {e}"),
            ExportError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Csv(e) => Some(e),
            ExportError::Io(e) => Some(e),
            ExportError::Xlsx(_) => None,
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    #[value(alias = "excel")]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

fn row(t: &Transaction) -> [String; 6] {
    [
        t.date.format("%Y-%m-%d").to_string(),
        t.product_name.clone(),
        t.price.to_string(),
        t.quantity.to_string(),
        t.seller.clone(),
        t.total_amount.to_string(),
    ]
}

/// Header row followed by one row per transaction.
pub fn to_csv(records: &[Transaction]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(COLUMNS)?;
    for t in records {
        wtr.write_record(row(t))?;
    }
    wtr.into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Single-sheet workbook with the same layout as [`to_csv`]. Money and
/// quantity columns are numeric cells.
pub fn to_xlsx(records: &[Transaction]) -> Result<Vec<u8>, ExportError> {
    let mut book = umya_spreadsheet::new_file();
    let ws = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| ExportError::Xlsx("default worksheet missing".into()))?;
    ws.set_name(SHEET_NAME);

    for (col, header) in COLUMNS.iter().enumerate() {
        ws.get_cell_mut((col as u32 + 1, 1)).set_value(*header);
    }
    for (idx, t) in records.iter().enumerate() {
        let r = idx as u32 + 2;
        ws.get_cell_mut((1, r))
            .set_value(t.date.format("%Y-%m-%d").to_string());
        ws.get_cell_mut((2, r)).set_value(t.product_name.clone());
        ws.get_cell_mut((3, r))
            .set_value_number(t.price.to_f64().unwrap_or_default());
        ws.get_cell_mut((4, r)).set_value_number(t.quantity);
        ws.get_cell_mut((5, r)).set_value(t.seller.clone());
        ws.get_cell_mut((6, r))
            .set_value_number(t.total_amount.to_f64().unwrap_or_default());
    }

    let mut out = Cursor::new(Vec::<u8>::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out)
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    Ok(out.into_inner())
}

pub fn encode(format: ExportFormat, records: &[Transaction]) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Xlsx => to_xlsx(records),
    }
}

/// `sales_data_YYYYMMDD_HHMMSS.<ext>` stamped with `now`.
pub fn file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!(
        "sales_data_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Encodes `records` and writes them into `dir` under [`file_name`].
pub fn write_to(
    dir: &Path,
    format: ExportFormat,
    records: &[Transaction],
    now: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    let bytes = encode(format, records)?;
    let path = dir.join(file_name(format, now));
    std::fs::write(&path, &bytes)?;
    info!(
        path = %path.display(),
        %format,
        records = records.len(),
        bytes = bytes.len(),
        "Exported transactions"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<Transaction> {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        vec![
            Transaction::new(d, "Cotton Shirt", dec!(100.50), 2, "A").unwrap(),
            Transaction::new(d, "Silk, Saree", dec!(500), 1, "B").unwrap(),
        ]
    }

    #[test]
    fn csv_has_header_and_rows_in_column_order() {
        let bytes = to_csv(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "date,product_name,price,quantity,seller,total_amount");
        assert_eq!(lines[1], "2024-01-01,Cotton Shirt,100.50,2,A,201.00");
        assert_eq!(lines[2], "2024-01-01,\"Silk, Saree\",500,1,B,500");
    }

    #[test]
    fn csv_of_empty_view_is_header_only() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn xlsx_round_trips_through_reader() {
        let bytes = to_xlsx(&sample()).unwrap();
        let book =
            umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true).unwrap();
        let ws = book.get_sheet_by_name(SHEET_NAME).unwrap();
        assert_eq!(ws.get_value((1, 1)), "date");
        assert_eq!(ws.get_value((6, 1)), "total_amount");
        assert_eq!(ws.get_value((2, 3)), "Silk, Saree");
        assert_eq!(ws.get_value((4, 2)).parse::<f64>().unwrap(), 2.0);
        assert_eq!(ws.get_value((6, 2)).parse::<f64>().unwrap(), 201.0);
    }

    #[test]
    fn file_name_is_timestamped() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            file_name(ExportFormat::Xlsx, now),
            "sales_data_20240309_140507.xlsx"
        );
    }
}

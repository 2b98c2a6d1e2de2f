use std::str::FromStr;

use chrono::NaiveDate;

use super::Transaction;

/// Seller value that disables seller filtering.
pub const ALL_SELLERS: &str = "All";

/// Date range and seller constraints applied to a snapshot.
///
/// Every field is optional; an unset field places no constraint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Filter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub seller: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    InvalidToken(String),
    InvalidDate(String),
}

impl std::fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterParseError::InvalidToken(t) => write!(f, "invalid token: {t}"),
            FilterParseError::InvalidDate(d) => write!(f, "invalid date: {d}"),
        }
    }
}

impl std::error::Error for FilterParseError {}

impl FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut f = Filter::default();
        for token in s.split_whitespace() {
            if let Some(rest) = token.strip_prefix("seller:") {
                f.seller = Some(rest.to_string());
            } else if let Some(rest) = token.strip_prefix("start:") {
                f.start = Some(parse_date(rest)?);
            } else if let Some(rest) = token.strip_prefix("end:") {
                f.end = Some(parse_date(rest)?);
            } else if let Some(rest) = token.strip_prefix("date:") {
                let Some((from, to)) = rest.split_once("..") else {
                    return Err(FilterParseError::InvalidToken(token.into()));
                };
                if !from.is_empty() {
                    f.start = Some(parse_date(from)?);
                }
                if !to.is_empty() {
                    f.end = Some(parse_date(to)?);
                }
            } else {
                return Err(FilterParseError::InvalidToken(token.into()));
            }
        }
        Ok(f)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, FilterParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FilterParseError::InvalidDate(s.into()))
}

impl Filter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, seller: Option<String>) -> Self {
        Self { start, end, seller }
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(start) = self.start
            && t.date < start
        {
            return false;
        }
        if let Some(end) = self.end
            && t.date > end
        {
            return false;
        }
        match self.seller.as_deref() {
            None | Some(ALL_SELLERS) => true,
            Some(seller) => t.seller == seller,
        }
    }

    pub fn apply(&self, records: &[Transaction]) -> Vec<Transaction> {
        if records.is_empty() {
            return Vec::new();
        }
        records.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

/// Returns the records that fall within `[start, end]` and belong to `seller`.
///
/// `seller` of `None` or [`ALL_SELLERS`] keeps every seller. The input is
/// left untouched and the result preserves its order.
pub fn filter(
    records: &[Transaction],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    seller: Option<&str>,
) -> Vec<Transaction> {
    Filter::new(start, end, seller.map(str::to_string)).apply(records)
}

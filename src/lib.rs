//! Sales dashboard
//!
//! An append-only store of shop sales with filtering, period rollups and
//! business metrics, plus CSV/XLSX export and CSV/JSON import.

pub mod config;
pub mod core;
pub mod export;
pub mod import;
pub mod report;

//! Run report export
//!
//! Writes run reports to JSON or CSV files.

mod export;

pub use export::{export_report, load_report, ExportFormat};

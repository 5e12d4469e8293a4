//! Output of the metrics matrix: terminal tables and JSON/CSV exports
//!
//! Chart rendering is left to external tools; they consume
//! [`MetricsMatrix::series`](crate::models::MetricsMatrix::series) or the JSON export.

pub mod export;
pub mod formatting;
pub mod table;

pub use export::{ExportConfig, ExportFormat, ExportManager};
pub use formatting::{format_metric, format_throughput};
pub use table::render_matrix;

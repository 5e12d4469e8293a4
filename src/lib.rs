//! Extraction of throughput, RTT, loss and jitter from iperf and ping experiment
//! logs, assembled into a scenario × protocol matrix.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod parsers;
pub mod report;

pub use aggregator::MetricsAggregator;
pub use errors::{ReportError, ReportResult};
pub use models::{MetricKind, MetricsMatrix, Protocol, ProtocolMetricRecord, Scenario};

pub mod diagnostic;
pub mod metrics;

pub use diagnostic::Diagnostic;
pub use metrics::{MetricKind, MetricsMatrix, Protocol, ProtocolMetricRecord, Scenario, ScenarioMetrics};

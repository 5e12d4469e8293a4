//! Formatting utilities for metric values
//!
//! Keeps units and precision consistent between the table output and the CLI's
//! single-file `parse` output.

use crate::models::MetricKind;

/// Placeholder printed for an undefined metric
pub const UNDEFINED: &str = "-";

/// Formats throughput in Mbits/sec, switching to Gbits/sec or Kbits/sec for
/// values outside the 1..1000 range
///
/// # Examples
///
/// ```
/// use netlab_report::report::formatting::format_throughput;
///
/// assert_eq!(format_throughput(94.6), "94.60 Mbits/sec");
/// assert_eq!(format_throughput(19300.0), "19.30 Gbits/sec");
/// assert_eq!(format_throughput(0.512), "512.00 Kbits/sec");
/// ```
pub fn format_throughput(mbps: f64) -> String {
    if mbps >= 1000.0 {
        format!("{:.2} Gbits/sec", mbps / 1000.0)
    } else if mbps >= 1.0 || mbps == 0.0 {
        format!("{:.2} Mbits/sec", mbps)
    } else {
        format!("{:.2} Kbits/sec", mbps * 1000.0)
    }
}

/// Formats an optional metric with its unit, or [`UNDEFINED`]
pub fn format_metric(kind: MetricKind, value: Option<f64>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(v) => match kind {
            MetricKind::Throughput => format_throughput(v),
            MetricKind::Rtt | MetricKind::Jitter => format!("{:.3} ms", v),
            MetricKind::Loss => format!("{:.2}%", v),
        },
    }
}

/// Bare number for machine-readable output; empty when undefined
pub fn format_raw(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

//! Throughput extraction from TCP iperf logs
//!
//! iperf prints one rate line per interval followed by a summary line for the
//! whole run. Only the last rate line is kept, which is the summary when the run
//! completed and the latest interval otherwise.

use log::trace;
use serde::Serialize;
use std::path::Path;

use super::patterns::{PREFIXED_RATE_RE, RATE_MARKER, parse_number};
use super::units::to_mbits;
use super::{LogExtractor, resolve_diagnostic};
use crate::models::Diagnostic;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputMetrics {
    pub throughput_mbps: Option<f64>,
    pub diagnostic: Option<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct ThroughputExtractor {
    throughput_mbps: Option<f64>,
    matched_lines: usize,
}

/// Parses the first `<number> <K|M|G>bits/sec` on a line into Mbits/sec
///
/// Rate tokens with an unknown prefix are skipped, not treated as the end of
/// the search.
pub(crate) fn parse_prefixed_rate(line: &str) -> Option<f64> {
    PREFIXED_RATE_RE.captures_iter(line).find_map(|caps| {
        let value = parse_number(&caps[1])?;
        to_mbits(value, caps[2].chars().next())
    })
}

impl LogExtractor for ThroughputExtractor {
    type Output = ThroughputMetrics;

    fn observe_line(&mut self, line: &str) {
        if !line.contains(RATE_MARKER) {
            return;
        }
        if let Some(rate) = parse_prefixed_rate(line) {
            trace!("Throughput sample {rate} Mbits/sec");
            self.throughput_mbps = Some(rate);
            self.matched_lines += 1;
        }
    }

    fn finish(self, source: &Path, interrupted: Option<Diagnostic>) -> ThroughputMetrics {
        trace!(
            "{} rate lines in {}, keeping the last",
            self.matched_lines,
            source.display()
        );
        let diagnostic = resolve_diagnostic(interrupted, || {
            self.throughput_mbps.is_none().then(|| Diagnostic::NoThroughput {
                path: source.to_path_buf(),
            })
        });

        ThroughputMetrics {
            throughput_mbps: self.throughput_mbps,
            diagnostic,
        }
    }

    fn unavailable(diagnostic: Diagnostic) -> ThroughputMetrics {
        ThroughputMetrics {
            throughput_mbps: None,
            diagnostic: Some(diagnostic),
        }
    }

    fn description() -> &'static str {
        "iperf throughput"
    }
}

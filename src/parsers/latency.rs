//! Average RTT and loss extraction from ping logs
//!
//! ping prints one `time=` line per reply and, when it exits normally, a summary
//! with the loss percentage and `min/avg/max/mdev`. The summary is preferred.
//! Without it (ping killed before exiting), the average RTT is the mean of the
//! reply samples and loss defaults to 0%, since replies were received.

use log::{debug, trace};
use serde::Serialize;
use std::path::Path;

use super::patterns::{
    PING_LOSS_MARKER, PING_LOSS_RE, PING_RTT_MARKERS, PING_RTT_RE, PING_TIME_MARKER,
    PING_TIME_RE, parse_number,
};
use super::{LogExtractor, resolve_diagnostic};
use crate::models::Diagnostic;

/// Where a resolved ping metric came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// ping's own summary lines
    Summary,
    /// Derived from the per-reply `time=` lines
    Samples,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyMetrics {
    pub avg_rtt_ms: Option<f64>,
    pub loss_pct: Option<f64>,
    pub rtt_source: Option<MetricSource>,
    pub loss_source: Option<MetricSource>,
    /// Number of inline RTT samples seen
    pub sample_count: usize,
    pub diagnostic: Option<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct LatencyExtractor {
    samples: Vec<f64>,
    summary_avg_rtt_ms: Option<f64>,
    summary_loss_pct: Option<f64>,
}

impl LatencyExtractor {
    fn sample_mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

impl LogExtractor for LatencyExtractor {
    type Output = LatencyMetrics;

    fn observe_line(&mut self, line: &str) {
        if line.contains(PING_TIME_MARKER) {
            if let Some(rtt) = PING_TIME_RE
                .captures(line)
                .and_then(|caps| parse_number(&caps[1]))
            {
                self.samples.push(rtt);
            }
        }

        if line.contains(PING_LOSS_MARKER) {
            if let Some(loss) = PING_LOSS_RE
                .captures(line)
                .and_then(|caps| parse_number(&caps[1]))
            {
                trace!("Summary loss {loss}%");
                self.summary_loss_pct = Some(loss);
            }
        }

        if PING_RTT_MARKERS.iter().any(|marker| line.contains(marker)) {
            if let Some(avg) = PING_RTT_RE
                .captures(line)
                .and_then(|caps| parse_number(&caps[1]))
            {
                trace!("Summary average RTT {avg} ms");
                self.summary_avg_rtt_ms = Some(avg);
            }
        }
    }

    fn finish(self, source: &Path, interrupted: Option<Diagnostic>) -> LatencyMetrics {
        let (avg_rtt_ms, rtt_source) = match self.summary_avg_rtt_ms {
            Some(avg) => (Some(avg), Some(MetricSource::Summary)),
            None => match self.sample_mean() {
                Some(mean) => (Some(mean), Some(MetricSource::Samples)),
                None => (None, None),
            },
        };

        let (loss_pct, loss_source) = match self.summary_loss_pct {
            Some(loss) => (Some(loss), Some(MetricSource::Summary)),
            None if !self.samples.is_empty() => (Some(0.0), Some(MetricSource::Samples)),
            None => (None, None),
        };

        if rtt_source == Some(MetricSource::Samples) || loss_source == Some(MetricSource::Samples) {
            debug!(
                "No complete ping summary in {}, using {} inline samples",
                source.display(),
                self.samples.len()
            );
        }

        let mut missing = Vec::new();
        if avg_rtt_ms.is_none() {
            missing.push("rtt");
        }
        if loss_pct.is_none() {
            missing.push("loss");
        }
        let diagnostic = resolve_diagnostic(interrupted, || {
            (!missing.is_empty()).then(|| Diagnostic::IncompleteMetrics {
                path: source.to_path_buf(),
                missing,
            })
        });

        LatencyMetrics {
            avg_rtt_ms,
            loss_pct,
            rtt_source,
            loss_source,
            sample_count: self.samples.len(),
            diagnostic,
        }
    }

    fn unavailable(diagnostic: Diagnostic) -> LatencyMetrics {
        LatencyMetrics {
            avg_rtt_ms: None,
            loss_pct: None,
            rtt_source: None,
            loss_source: None,
            sample_count: 0,
            diagnostic: Some(diagnostic),
        }
    }

    fn description() -> &'static str {
        "ping"
    }
}

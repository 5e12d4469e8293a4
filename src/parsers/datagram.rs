//! Rate, jitter and loss extraction from UDP iperf logs

use log::trace;
use serde::Serialize;
use std::path::Path;

use super::patterns::{
    BARE_RATE_RE, DATAGRAM_LOSS_RE, JITTER_RE, RATE_MARKER, parse_number,
};
use super::throughput::parse_prefixed_rate;
use super::units::to_mbits;
use super::{LogExtractor, resolve_diagnostic};
use crate::models::Diagnostic;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatagramMetrics {
    pub throughput_mbps: Option<f64>,
    pub jitter_ms: Option<f64>,
    pub loss_pct: Option<f64>,
    /// Lost datagrams from the same line as `loss_pct`
    pub lost_datagrams: Option<u64>,
    /// Total datagrams from the same line as `loss_pct`
    pub total_datagrams: Option<u64>,
    pub diagnostic: Option<Diagnostic>,
}

/// Each of the three metrics is tracked independently; a line may update any
/// subset of them.
#[derive(Debug, Default)]
pub struct DatagramExtractor {
    throughput_mbps: Option<f64>,
    jitter_ms: Option<f64>,
    loss: Option<DatagramLoss>,
}

#[derive(Debug, Clone, Copy)]
struct DatagramLoss {
    lost: Option<u64>,
    total: Option<u64>,
    percent: f64,
}

fn parse_rate(line: &str) -> Option<f64> {
    parse_prefixed_rate(line).or_else(|| {
        let caps = BARE_RATE_RE.captures(line)?;
        to_mbits(parse_number(&caps[1])?, None)
    })
}

fn parse_jitter(line: &str) -> Option<f64> {
    let caps = JITTER_RE.captures(line)?;
    parse_number(&caps[1])
}

fn parse_loss(line: &str) -> Option<DatagramLoss> {
    let caps = DATAGRAM_LOSS_RE.captures(line)?;
    Some(DatagramLoss {
        lost: caps[1].parse().ok(),
        total: caps[2].parse().ok(),
        percent: parse_number(&caps[3])?,
    })
}

impl LogExtractor for DatagramExtractor {
    type Output = DatagramMetrics;

    fn observe_line(&mut self, line: &str) {
        if !line.contains(RATE_MARKER) {
            return;
        }
        if let Some(rate) = parse_rate(line) {
            self.throughput_mbps = Some(rate);
        }
        if let Some(jitter) = parse_jitter(line) {
            self.jitter_ms = Some(jitter);
        }
        if let Some(loss) = parse_loss(line) {
            trace!("Datagram loss {}%", loss.percent);
            self.loss = Some(loss);
        }
    }

    fn finish(self, source: &Path, interrupted: Option<Diagnostic>) -> DatagramMetrics {
        let mut missing = Vec::new();
        if self.throughput_mbps.is_none() {
            missing.push("throughput");
        }
        if self.jitter_ms.is_none() {
            missing.push("jitter");
        }
        if self.loss.is_none() {
            missing.push("loss");
        }

        let diagnostic = resolve_diagnostic(interrupted, || {
            (!missing.is_empty()).then(|| Diagnostic::IncompleteMetrics {
                path: source.to_path_buf(),
                missing,
            })
        });

        DatagramMetrics {
            throughput_mbps: self.throughput_mbps,
            jitter_ms: self.jitter_ms,
            loss_pct: self.loss.map(|l| l.percent),
            lost_datagrams: self.loss.and_then(|l| l.lost),
            total_datagrams: self.loss.and_then(|l| l.total),
            diagnostic,
        }
    }

    fn unavailable(diagnostic: Diagnostic) -> DatagramMetrics {
        DatagramMetrics {
            throughput_mbps: None,
            jitter_ms: None,
            loss_pct: None,
            lost_datagrams: None,
            total_datagrams: None,
            diagnostic: Some(diagnostic),
        }
    }

    fn description() -> &'static str {
        "iperf datagram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source() -> PathBuf {
        PathBuf::from("exp1_udp_h1_h20.log")
    }

    const UDP_LOG: &str = "\
[ ID] Interval           Transfer     Bitrate         Jitter    Lost/Total Datagrams
[  5]   0.00-1.00   sec   128 KBytes  1.05 Mbits/sec  0.020 ms  0/50 (2.0%)
[  5]   1.00-2.00   sec   128 KBytes  1.04 Mbits/sec  0.031 ms  1/50 (2.0%)
- - - - - - - - - - - - - - - - - - - - - - - - -
[  5]   0.00-10.00  sec  1.25 MBytes  1.05 Mbits/sec  0.012 ms  3/50 (6.0%)  receiver
iperf Done.
";

    #[test]
    fn test_full_udp_log() {
        let metrics = DatagramExtractor::extract_text(UDP_LOG, &source());
        assert_eq!(metrics.throughput_mbps, Some(1.05));
        assert_eq!(metrics.jitter_ms, Some(0.012));
        assert_eq!(metrics.loss_pct, Some(6.0));
        assert_eq!(metrics.lost_datagrams, Some(3));
        assert_eq!(metrics.total_datagrams, Some(50));
        assert!(metrics.diagnostic.is_none());
    }

    #[test]
    fn test_loss_is_last_match_not_first_or_max() {
        let log = "\
1.0 Mbits/sec 0.5 ms 0/50 (2.0%)
1.0 Mbits/sec 0.5 ms 9/50 (18.0%)
1.0 Mbits/sec 0.5 ms 3/50 (6.0%)
";
        let metrics = DatagramExtractor::extract_text(log, &source());
        assert_eq!(metrics.loss_pct, Some(6.0));
    }

    #[test]
    fn test_each_metric_keeps_its_own_last_match() {
        let log = "\
[  5] 0.0-1.0 sec 128 KBytes 1.05 Mbits/sec 0.020 ms 1/50 (2.0%)
[  5] 1.0-2.0 sec 128 KBytes 2.10 Mbits/sec
";
        let metrics = DatagramExtractor::extract_text(log, &source());
        assert_eq!(metrics.throughput_mbps, Some(2.10));
        assert_eq!(metrics.jitter_ms, Some(0.020));
        assert_eq!(metrics.loss_pct, Some(2.0));
    }

    #[test]
    fn test_bare_rate_fallback() {
        let log = "[  3]  0.0-10.0 sec  99 KBytes  81234 bits/sec  0.100 ms  0/  70 (0%)\n";
        let metrics = DatagramExtractor::extract_text(log, &source());
        assert_eq!(metrics.throughput_mbps, Some(81234.0 / 1_000_000.0));
        assert_eq!(metrics.loss_pct, Some(0.0));
        assert_eq!(metrics.total_datagrams, Some(70));
    }

    #[test]
    fn test_lines_without_rate_marker_are_ignored() {
        let log = "\
Server listening on 5201, jitter 9.9 ms 9/9 (100%)
1.0 Mbits/sec 0.5 ms 0/50 (0%)
";
        let metrics = DatagramExtractor::extract_text(log, &source());
        assert_eq!(metrics.jitter_ms, Some(0.5));
        assert_eq!(metrics.loss_pct, Some(0.0));
    }

    #[test]
    fn test_partial_record_names_missing_fields() {
        let log = "[  5] 0.00-10.00 sec 1.25 MBytes 1.05 Mbits/sec sender\n";
        let metrics = DatagramExtractor::extract_text(log, &source());
        assert_eq!(metrics.throughput_mbps, Some(1.05));
        assert_eq!(metrics.jitter_ms, None);
        assert_eq!(metrics.loss_pct, None);
        assert_eq!(
            metrics.diagnostic,
            Some(Diagnostic::IncompleteMetrics {
                path: source(),
                missing: vec!["jitter", "loss"],
            })
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp9_udp_h1_h20.log");
        let metrics = DatagramExtractor::extract(&path);
        assert_eq!(metrics.throughput_mbps, None);
        assert_eq!(metrics.jitter_ms, None);
        assert_eq!(metrics.loss_pct, None);
        assert_eq!(metrics.diagnostic, Some(Diagnostic::MissingFile { path }));
    }
}

//! Line-oriented extractors for iperf and ping logs
//!
//! ## Module Organization
//!
//! - `units`: bandwidth prefix normalization into Mbits/sec
//! - `patterns`: the regex table shared by all extractors
//! - `throughput`: last reported rate of a TCP iperf log
//! - `datagram`: rate, jitter and datagram loss of a UDP iperf log
//! - `latency`: average RTT and loss of a ping log, with a fallback to inline samples
//!
//! Every extractor keeps one slot per metric and overwrites it on each match, so
//! the last matching line in the file wins. Lines that do not match are ignored.
//! Missing files and partial results never fail; they are reported as
//! [`Diagnostic`]s.

pub mod datagram;
pub mod latency;
pub mod patterns;
pub mod throughput;
pub mod units;

pub use datagram::{DatagramExtractor, DatagramMetrics};
pub use latency::{LatencyExtractor, LatencyMetrics, MetricSource};
pub use throughput::{ThroughputExtractor, ThroughputMetrics};
pub use units::{BitRatePrefix, to_mbits};

use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::models::Diagnostic;

/// A single-pass accumulator over the lines of one log
pub trait LogExtractor: Default {
    type Output;

    /// Feeds the next line, in file order
    fn observe_line(&mut self, line: &str);

    /// Resolves the accumulated state
    ///
    /// `interrupted` carries the read error that cut the scan short, if any. It
    /// takes the place of the missing-metrics diagnostic, since the missing
    /// metrics are a consequence of it.
    fn finish(self, source: &Path, interrupted: Option<Diagnostic>) -> Self::Output;

    /// The all-undefined result for a log that could not be opened
    fn unavailable(diagnostic: Diagnostic) -> Self::Output;

    /// Short description used in debug logging
    fn description() -> &'static str;

    /// Scans the file at `path` once, top to bottom
    fn extract(path: &Path) -> Self::Output {
        let mut extractor = Self::default();
        match scan_log(path, |line| extractor.observe_line(line)) {
            Ok(scan) => {
                debug!(
                    "Scanned {} lines of {} log {}",
                    scan.lines,
                    Self::description(),
                    path.display()
                );
                extractor.finish(path, scan.interrupted)
            }
            Err(diagnostic) => {
                diagnostic.emit();
                Self::unavailable(diagnostic)
            }
        }
    }

    /// Runs the extractor over in-memory text; `source` only names it in diagnostics
    fn extract_text(text: &str, source: &Path) -> Self::Output {
        let mut extractor = Self::default();
        text.lines().for_each(|line| extractor.observe_line(line));
        extractor.finish(source, None)
    }
}

/// Outcome of a scan over a log that could be opened
#[derive(Debug, Clone, PartialEq)]
pub struct LogScan {
    /// Lines visited before the end of the file or the read error
    pub lines: usize,
    /// Set when a read error ended the scan early
    pub interrupted: Option<Diagnostic>,
}

/// Picks the diagnostic for a finished scan and emits it
///
/// A read error wins over whatever `incomplete` would report, so each log
/// produces at most one warning.
pub(crate) fn resolve_diagnostic<F>(interrupted: Option<Diagnostic>, incomplete: F) -> Option<Diagnostic>
where
    F: FnOnce() -> Option<Diagnostic>,
{
    let diagnostic = interrupted.or_else(incomplete);
    if let Some(diagnostic) = &diagnostic {
        diagnostic.emit();
    }
    diagnostic
}

/// Calls `visit` on every line of the file
///
/// Invalid UTF-8 is replaced rather than rejected. A read error part way through
/// ends the scan and is returned in [`LogScan::interrupted`], keeping what was
/// visited so far. Only a file that cannot be opened at all is an error.
pub fn scan_log<F>(path: &Path, mut visit: F) -> Result<LogScan, Diagnostic>
where
    F: FnMut(&str),
{
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Diagnostic::MissingFile {
            path: path.to_path_buf(),
        },
        _ => Diagnostic::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut lines = 0;
    let mut interrupted = None;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                visit(line.trim_end_matches(['\n', '\r']));
                lines += 1;
            }
            Err(e) => {
                debug!(
                    "Read error in {} after {} lines, keeping partial results",
                    path.display(),
                    lines
                );
                interrupted = Some(Diagnostic::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                break;
            }
        }
    }

    Ok(LogScan { lines, interrupted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_scan_log_visits_lines_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.log");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"first\r\nsecond\nthird").unwrap();

        let mut seen = Vec::new();
        let scan = scan_log(&path, |line| seen.push(line.to_string())).unwrap();

        assert_eq!(scan.lines, 3);
        assert_eq!(scan.interrupted, None);
        assert_eq!(seen, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_scan_log_replaces_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.log");
        std::fs::write(&path, b"ok\n\xff\xfe garbage\nstill ok\n").unwrap();

        let mut seen = Vec::new();
        scan_log(&path, |line| seen.push(line.to_string())).unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], "still ok");
    }

    #[test]
    fn test_scan_log_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.log");
        let err = scan_log(&path, |_| {}).unwrap_err();
        assert_eq!(err, Diagnostic::MissingFile { path });
    }

    #[test]
    fn test_scan_log_read_error_is_reported() {
        // Opening a directory succeeds on Linux, reading it fails with EISDIR
        let dir = tempdir().unwrap();
        let scan = scan_log(dir.path(), |_| {}).unwrap();

        assert_eq!(scan.lines, 0);
        assert!(matches!(
            scan.interrupted,
            Some(Diagnostic::Unreadable { ref path, .. }) if path == dir.path()
        ));
    }

    #[test]
    fn test_read_error_replaces_incomplete_metrics() {
        let dir = tempdir().unwrap();

        let ping = LatencyExtractor::extract(dir.path());
        assert!(matches!(ping.diagnostic, Some(Diagnostic::Unreadable { .. })));
        assert_eq!(ping.avg_rtt_ms, None);

        let tcp = ThroughputExtractor::extract(dir.path());
        assert!(matches!(tcp.diagnostic, Some(Diagnostic::Unreadable { .. })));

        let udp = DatagramExtractor::extract(dir.path());
        assert!(matches!(udp.diagnostic, Some(Diagnostic::Unreadable { .. })));
    }
}

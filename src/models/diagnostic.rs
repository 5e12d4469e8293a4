//! Advisory diagnostics raised while scanning experiment logs
//!
//! None of these conditions is fatal. They are logged at warning level when
//! raised and carried along with the extraction result so callers (and tests)
//! can inspect exactly what was reported.

use log::warn;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The log file does not exist
    MissingFile { path: PathBuf },
    /// The log file exists but could not be opened or read to the end
    Unreadable { path: PathBuf, reason: String },
    /// A bandwidth-test log had no usable rate line
    NoThroughput { path: PathBuf },
    /// Some of the metrics a log should carry were never found
    IncompleteMetrics {
        path: PathBuf,
        missing: Vec<&'static str>,
    },
}

impl Diagnostic {
    /// Writes the diagnostic to the warning-level log stream
    pub fn emit(&self) {
        warn!("{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingFile { path } => {
                write!(f, "File not found: {}", path.display())
            }
            Diagnostic::Unreadable { path, reason } => {
                write!(f, "Could not read {}: {}", path.display(), reason)
            }
            Diagnostic::NoThroughput { path } => {
                write!(f, "No throughput parsed from {}", path.display())
            }
            Diagnostic::IncompleteMetrics { path, missing } => write!(
                f,
                "Metrics incomplete in {} (missing: {})",
                path.display(),
                missing.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_path_and_condition() {
        let missing = Diagnostic::MissingFile {
            path: PathBuf::from("exp1_tcp_h1_h20.log"),
        };
        assert_eq!(missing.to_string(), "File not found: exp1_tcp_h1_h20.log");

        let incomplete = Diagnostic::IncompleteMetrics {
            path: PathBuf::from("exp2_udp_h1_h20.log"),
            missing: vec!["jitter", "loss"],
        };
        let message = incomplete.to_string();
        assert!(message.contains("exp2_udp_h1_h20.log"));
        assert!(message.contains("jitter, loss"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let diagnostic = Diagnostic::NoThroughput {
            path: PathBuf::from("a.log"),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "no_throughput");
        assert_eq!(json["path"], "a.log");
    }
}

//! Plain-text tables for the terminal

use super::formatting::format_metric;
use crate::models::{MetricKind, MetricsMatrix, Protocol};

const LABEL_WIDTH: usize = 20;
const CELL_WIDTH: usize = 18;

/// Renders one table per metric, scenarios as rows and protocols as columns
pub fn render_matrix(matrix: &MetricsMatrix) -> String {
    let mut out = String::new();

    for kind in MetricKind::ALL {
        out.push_str(&format!("{}\n", kind.axis_label()));
        out.push_str(&format!("{}\n", "=".repeat(kind.axis_label().len())));

        out.push_str(&format!("{:<LABEL_WIDTH$}", "Scenario"));
        for protocol in Protocol::ALL {
            out.push_str(&format!("{:>CELL_WIDTH$}", protocol.as_str()));
        }
        out.push('\n');

        for entry in matrix.scenarios() {
            out.push_str(&format!("{:<LABEL_WIDTH$}", entry.scenario.label));
            for protocol in Protocol::ALL {
                let value = entry.records.get(&protocol).and_then(|r| r.get(kind));
                out.push_str(&format!("{:>CELL_WIDTH$}", format_metric(kind, value)));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !matrix.diagnostics().is_empty() {
        out.push_str(&format!("Warnings ({}):\n", matrix.diagnostics().len()));
        for diagnostic in matrix.diagnostics() {
            out.push_str(&format!("  - {diagnostic}\n"));
        }
    }

    out
}

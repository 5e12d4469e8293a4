use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use super::formatting::format_raw;
use super::table::render_matrix;
use crate::errors::{ReportError, ReportResult};
use crate::models::{Diagnostic, MetricKind, MetricsMatrix, Protocol, ProtocolMetricRecord};

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Destination file; standard output when `None`
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Table,
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(ExportFormat::Table),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportData<'a> {
    pub generated_at: DateTime<Utc>,
    pub scenarios: Vec<ScenarioExport<'a>>,
    pub diagnostics: &'a [Diagnostic],
}

#[derive(Debug, Serialize)]
pub struct ScenarioExport<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub protocols: Vec<ProtocolExport>,
}

#[derive(Debug, Serialize)]
pub struct ProtocolExport {
    pub protocol: Protocol,
    #[serde(flatten)]
    pub metrics: ProtocolMetricRecord,
}

pub struct ExportManager {
    config: ExportConfig,
}

impl ExportManager {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Renders the matrix in the configured format and writes it out
    pub fn export(&self, matrix: &MetricsMatrix) -> ReportResult<()> {
        let content = self.render(matrix)?;

        match &self.config.output_path {
            Some(path) => {
                fs::write(path, content)?;
                info!("Wrote {:?} report to {}", self.config.format, path.display());
            }
            None => print!("{content}"),
        }
        Ok(())
    }

    pub fn render(&self, matrix: &MetricsMatrix) -> ReportResult<String> {
        match self.config.format {
            ExportFormat::Table => Ok(render_matrix(matrix)),
            ExportFormat::Json => {
                let mut json = serde_json::to_string_pretty(&prepare_export(matrix))?;
                json.push('\n');
                Ok(json)
            }
            ExportFormat::Csv => Ok(render_csv(matrix)),
        }
    }
}

pub fn prepare_export(matrix: &MetricsMatrix) -> ExportData<'_> {
    let scenarios = matrix
        .scenarios()
        .iter()
        .map(|entry| ScenarioExport {
            id: &entry.scenario.id,
            label: &entry.scenario.label,
            protocols: entry
                .records
                .iter()
                .map(|(protocol, record)| ProtocolExport {
                    protocol: *protocol,
                    metrics: *record,
                })
                .collect(),
        })
        .collect();

    ExportData {
        generated_at: Utc::now(),
        scenarios,
        diagnostics: matrix.diagnostics(),
    }
}

/// One row per (scenario, protocol); undefined metrics are empty cells
pub fn render_csv(matrix: &MetricsMatrix) -> String {
    let mut csv_content = String::from("scenario,label,protocol");
    for kind in MetricKind::ALL {
        csv_content.push(',');
        csv_content.push_str(kind.key());
    }
    csv_content.push('\n');

    for entry in matrix.scenarios() {
        for (protocol, record) in &entry.records {
            csv_content.push_str(&format!(
                "{},{},{}",
                csv_field(&entry.scenario.id),
                csv_field(&entry.scenario.label),
                protocol
            ));
            for kind in MetricKind::ALL {
                csv_content.push(',');
                csv_content.push_str(&format_raw(record.get(kind)));
            }
            csv_content.push('\n');
        }
    }

    csv_content
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

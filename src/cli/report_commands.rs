use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::aggregator::MetricsAggregator;
use crate::cli::commands::{Commands, LogKind};
use crate::config::AppConfig;
use crate::models::MetricKind;
use crate::parsers::{DatagramExtractor, LatencyExtractor, LogExtractor, ThroughputExtractor};
use crate::report::formatting::format_metric;
use crate::report::{ExportConfig, ExportFormat, ExportManager};

pub struct ReportCommandHandler {
    config: AppConfig,
}

impl ReportCommandHandler {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn handle(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Analyze { format, output, concurrent } => {
                self.handle_analyze(&format, output, concurrent).await
            }
            Commands::Parse { kind, file, json } => self.handle_parse(kind, &file, json),
            Commands::Files { missing_only } => {
                self.handle_files(missing_only);
                Ok(())
            }
        }
    }

    async fn handle_analyze(&self, format: &str, output: Option<PathBuf>, concurrent: bool) -> Result<()> {
        let format: ExportFormat = format.parse()?;
        let aggregator = MetricsAggregator::from_config(&self.config);
        debug!(
            "Analyzing {} scenarios in {} (concurrent: {})",
            aggregator.scenarios().len(),
            aggregator.log_dir().display(),
            concurrent
        );

        let matrix = if concurrent {
            aggregator
                .collect_concurrent()
                .await
                .context("Concurrent log scan failed")?
        } else {
            aggregator.collect()
        };

        let output_display = output.as_ref().map(|p| p.display().to_string());
        ExportManager::new(ExportConfig {
            format,
            output_path: output,
        })
        .export(&matrix)
        .with_context(|| match &output_display {
            Some(path) => format!("Failed to write report to {path}"),
            None => "Failed to write report".to_string(),
        })?;

        if let Some(path) = output_display {
            println!("Report written to {path}");
        }
        Ok(())
    }

    fn handle_parse(&self, kind: LogKind, file: &Path, json: bool) -> Result<()> {
        match kind {
            LogKind::Iperf => {
                let metrics = ThroughputExtractor::extract(file);
                print_result(json, &metrics, &[(MetricKind::Throughput, metrics.throughput_mbps)])
            }
            LogKind::Udp => {
                let metrics = DatagramExtractor::extract(file);
                print_result(
                    json,
                    &metrics,
                    &[
                        (MetricKind::Throughput, metrics.throughput_mbps),
                        (MetricKind::Jitter, metrics.jitter_ms),
                        (MetricKind::Loss, metrics.loss_pct),
                    ],
                )
            }
            LogKind::Ping => {
                let metrics = LatencyExtractor::extract(file);
                print_result(
                    json,
                    &metrics,
                    &[
                        (MetricKind::Rtt, metrics.avg_rtt_ms),
                        (MetricKind::Loss, metrics.loss_pct),
                    ],
                )
            }
        }
    }

    fn handle_files(&self, missing_only: bool) {
        let aggregator = MetricsAggregator::from_config(&self.config);
        let logs = aggregator.expected_logs();
        let missing = logs.iter().filter(|l| !l.path.exists()).count();

        println!("Expected Log Files");
        println!("==================");
        for expected in &logs {
            let present = expected.path.exists();
            if missing_only && present {
                continue;
            }
            println!(
                "  [{}] {:<6} {:<5} {}",
                if present { "ok" } else { "--" },
                expected.scenario_id,
                expected.protocol,
                expected.path.display()
            );
        }
        println!("\n{} of {} files present", logs.len() - missing, logs.len());
    }
}

fn print_result<T: Serialize>(json: bool, metrics: &T, fields: &[(MetricKind, Option<f64>)]) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(metrics)?);
        return Ok(());
    }

    for (kind, value) in fields {
        println!("  {:<24} {}", kind.axis_label(), format_metric(*kind, *value));
    }
    Ok(())
}

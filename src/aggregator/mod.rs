//! Builds the scenario × protocol metrics matrix
//!
//! For each scenario:
//!
//! - **TCP**: throughput from the iperf log, RTT and loss from the ping captured
//!   alongside it. Jitter is not defined.
//! - **UDP**: throughput, jitter and loss from the iperf log, RTT from the ping
//!   captured alongside it. The ping's loss is dropped: UDP loss is what iperf saw.
//! - **ICMP**: RTT and loss from the standalone ping. Throughput and jitter are
//!   not defined.
//!
//! Missing or unusable logs leave the affected fields undefined; aggregation
//! always covers every scenario.

pub mod naming;

pub use naming::{LogNaming, LogRole};

use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::errors::ReportResult;
use crate::models::{Diagnostic, MetricsMatrix, Protocol, ProtocolMetricRecord, Scenario};
use crate::parsers::{DatagramExtractor, LatencyExtractor, LogExtractor, ThroughputExtractor};

/// One log the naming convention expects for a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedLog {
    pub scenario_id: String,
    pub protocol: Protocol,
    pub role: LogRole,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    log_dir: PathBuf,
    host_pair: String,
    scenarios: Vec<Scenario>,
    naming: LogNaming,
}

impl MetricsAggregator {
    pub fn new(
        log_dir: impl Into<PathBuf>,
        host_pair: impl Into<String>,
        scenarios: Vec<Scenario>,
        naming: LogNaming,
    ) -> Self {
        Self {
            log_dir: log_dir.into(),
            host_pair: host_pair.into(),
            scenarios,
            naming,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.log_dir.clone(),
            config.host_pair.clone(),
            config.scenarios.clone(),
            config.naming.clone(),
        )
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn log_path(&self, role: LogRole, scenario: &Scenario, protocol: Protocol) -> PathBuf {
        self.naming
            .path(&self.log_dir, role, &scenario.id, protocol, &self.host_pair)
    }

    /// Every log file the aggregator will try to read, in scan order
    pub fn expected_logs(&self) -> Vec<ExpectedLog> {
        let roles = [
            (Protocol::Tcp, LogRole::Transport),
            (Protocol::Tcp, LogRole::ProbeDuring),
            (Protocol::Udp, LogRole::Transport),
            (Protocol::Udp, LogRole::ProbeDuring),
            (Protocol::Icmp, LogRole::ProbeOnly),
        ];

        self.scenarios
            .iter()
            .flat_map(|scenario| {
                roles.iter().map(move |&(protocol, role)| ExpectedLog {
                    scenario_id: scenario.id.clone(),
                    protocol,
                    role,
                    path: self.log_path(role, scenario, protocol),
                })
            })
            .collect()
    }

    /// Builds the matrix sequentially, one file at a time
    pub fn collect(&self) -> MetricsMatrix {
        let mut matrix = MetricsMatrix::new();
        for scenario in &self.scenarios {
            let (records, diagnostics) = self.collect_scenario(scenario);
            matrix.push_scenario(scenario.clone(), records, diagnostics);
        }
        self.log_summary(&matrix);
        matrix
    }

    /// Builds the matrix with one blocking task per scenario
    ///
    /// Results are merged back in scenario order, so the matrix is identical to
    /// the one [`collect`](Self::collect) produces.
    pub async fn collect_concurrent(&self) -> ReportResult<MetricsMatrix> {
        let jobs = self
            .scenarios
            .iter()
            .cloned()
            .map(|scenario| {
                let aggregator = self.clone();
                tokio::task::spawn_blocking(move || {
                    let (records, diagnostics) = aggregator.collect_scenario(&scenario);
                    (scenario, records, diagnostics)
                })
            })
            .collect::<Vec<_>>();

        let mut matrix = MetricsMatrix::new();
        for job in jobs {
            let (scenario, records, diagnostics) = job.await?;
            matrix.push_scenario(scenario, records, diagnostics);
        }
        self.log_summary(&matrix);
        Ok(matrix)
    }

    fn collect_scenario(
        &self,
        scenario: &Scenario,
    ) -> (BTreeMap<Protocol, ProtocolMetricRecord>, Vec<Diagnostic>) {
        debug!("Collecting metrics for scenario '{}'", scenario.id);
        let mut diagnostics = Vec::new();
        let mut records = BTreeMap::new();

        for protocol in Protocol::ALL {
            let record = match protocol {
                Protocol::Tcp => self.tcp_record(scenario, &mut diagnostics),
                Protocol::Udp => self.udp_record(scenario, &mut diagnostics),
                Protocol::Icmp => self.icmp_record(scenario, &mut diagnostics),
            };
            records.insert(protocol, record);
        }

        (records, diagnostics)
    }

    fn tcp_record(&self, scenario: &Scenario, diagnostics: &mut Vec<Diagnostic>) -> ProtocolMetricRecord {
        let throughput =
            ThroughputExtractor::extract(&self.log_path(LogRole::Transport, scenario, Protocol::Tcp));
        let ping =
            LatencyExtractor::extract(&self.log_path(LogRole::ProbeDuring, scenario, Protocol::Tcp));
        diagnostics.extend(throughput.diagnostic);
        diagnostics.extend(ping.diagnostic);

        ProtocolMetricRecord {
            throughput_mbps: throughput.throughput_mbps,
            rtt_ms: ping.avg_rtt_ms,
            loss_pct: ping.loss_pct,
            jitter_ms: None,
        }
    }

    fn udp_record(&self, scenario: &Scenario, diagnostics: &mut Vec<Diagnostic>) -> ProtocolMetricRecord {
        let datagram =
            DatagramExtractor::extract(&self.log_path(LogRole::Transport, scenario, Protocol::Udp));
        let ping =
            LatencyExtractor::extract(&self.log_path(LogRole::ProbeDuring, scenario, Protocol::Udp));
        diagnostics.extend(datagram.diagnostic);
        diagnostics.extend(ping.diagnostic);

        ProtocolMetricRecord {
            throughput_mbps: datagram.throughput_mbps,
            rtt_ms: ping.avg_rtt_ms,
            loss_pct: datagram.loss_pct,
            jitter_ms: datagram.jitter_ms,
        }
    }

    fn icmp_record(&self, scenario: &Scenario, diagnostics: &mut Vec<Diagnostic>) -> ProtocolMetricRecord {
        let ping =
            LatencyExtractor::extract(&self.log_path(LogRole::ProbeOnly, scenario, Protocol::Icmp));
        diagnostics.extend(ping.diagnostic);

        ProtocolMetricRecord {
            throughput_mbps: None,
            rtt_ms: ping.avg_rtt_ms,
            loss_pct: ping.loss_pct,
            jitter_ms: None,
        }
    }

    fn log_summary(&self, matrix: &MetricsMatrix) {
        info!(
            "Collected {} scenarios from {} ({} diagnostics)",
            matrix.len(),
            self.log_dir.display(),
            matrix.diagnostics().len()
        );
    }
}

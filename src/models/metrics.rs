//! Metric records and the scenario × protocol matrix
//!
//! Every measured value is an `Option<f64>`: `None` is the "undefined" marker for a
//! metric that was not measured or does not apply. Records always carry all four
//! fields so consumers can treat them uniformly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Diagnostic;

/// Transport protocols measured in every scenario
///
/// The derived ordering (TCP, UDP, ICMP) is the order records are stored and
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Connection-oriented bandwidth test plus a concurrent ping
    Tcp,
    /// Connectionless bandwidth test reporting jitter and datagram loss
    Udp,
    /// Ping on its own, no transport flow
    Icmp,
}

impl Protocol {
    pub const ALL: [Protocol; 3] = [Protocol::Tcp, Protocol::Udp, Protocol::Icmp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
        }
    }

    /// Lower-case name used in log file names
    pub fn log_key(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The four metrics reported per protocol, with their presentation metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Throughput,
    Rtt,
    Loss,
    Jitter,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Throughput,
        MetricKind::Rtt,
        MetricKind::Loss,
        MetricKind::Jitter,
    ];

    /// Field name used in exports
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Throughput => "throughput_mbps",
            MetricKind::Rtt => "rtt_ms",
            MetricKind::Loss => "loss_pct",
            MetricKind::Jitter => "jitter_ms",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            MetricKind::Throughput => "Throughput (Mbits/sec)",
            MetricKind::Rtt => "Average RTT (ms)",
            MetricKind::Loss => "Packet Loss (%)",
            MetricKind::Jitter => "Jitter (ms)",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::Throughput => "Throughput vs Scenario (TCP/UDP/ICMP)",
            MetricKind::Rtt => "RTT vs Scenario (TCP/UDP/ICMP)",
            MetricKind::Loss => "Packet Loss vs Scenario (TCP/UDP/ICMP)",
            MetricKind::Jitter => "Jitter vs Scenario (TCP/UDP/ICMP)",
        }
    }

    /// Default image name for a chart of this metric
    pub fn chart_file_name(&self) -> &'static str {
        match self {
            MetricKind::Throughput => "throughput_comparison.png",
            MetricKind::Rtt => "rtt_comparison.png",
            MetricKind::Loss => "loss_comparison.png",
            MetricKind::Jitter => "jitter_comparison.png",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Throughput => "Mbits/sec",
            MetricKind::Rtt | MetricKind::Jitter => "ms",
            MetricKind::Loss => "%",
        }
    }
}

/// Metrics for one (scenario, protocol) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMetricRecord {
    /// Throughput in Mbits/sec
    pub throughput_mbps: Option<f64>,
    /// Average round-trip time in milliseconds
    pub rtt_ms: Option<f64>,
    /// Packet loss in percent
    pub loss_pct: Option<f64>,
    /// Jitter in milliseconds, only defined for UDP
    pub jitter_ms: Option<f64>,
}

impl ProtocolMetricRecord {
    /// A record with every metric undefined
    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Throughput => self.throughput_mbps,
            MetricKind::Rtt => self.rtt_ms,
            MetricKind::Loss => self.loss_pct,
            MetricKind::Jitter => self.jitter_ms,
        }
    }

    /// Bitwise comparison, so two undefined records or two identical NaN-free
    /// records compare equal without float tolerance
    pub fn bit_eq(&self, other: &Self) -> bool {
        MetricKind::ALL
            .iter()
            .all(|kind| self.get(*kind).map(f64::to_bits) == other.get(*kind).map(f64::to_bits))
    }
}

/// An experimental condition, e.g. `exp1` labelled "Baseline (Exp1)"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Identifier used in log file names
    pub id: String,
    /// Human-readable label used in reports
    pub label: String,
}

impl Scenario {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioMetrics {
    pub scenario: Scenario,
    pub records: BTreeMap<Protocol, ProtocolMetricRecord>,
}

/// Scenario → protocol → record, in scenario insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsMatrix {
    scenarios: Vec<ScenarioMetrics>,
    diagnostics: Vec<Diagnostic>,
}

impl MetricsMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_scenario(
        &mut self,
        scenario: Scenario,
        records: BTreeMap<Protocol, ProtocolMetricRecord>,
        diagnostics: Vec<Diagnostic>,
    ) {
        self.scenarios.push(ScenarioMetrics { scenario, records });
        self.diagnostics.extend(diagnostics);
    }

    pub fn scenarios(&self) -> &[ScenarioMetrics] {
        &self.scenarios
    }

    /// Every diagnostic raised while building the matrix, in scan order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, scenario_id: &str, protocol: Protocol) -> Option<&ProtocolMetricRecord> {
        self.scenarios
            .iter()
            .find(|s| s.scenario.id == scenario_id)
            .and_then(|s| s.records.get(&protocol))
    }

    /// Lazily yields `(scenario label, value)` for one metric of one protocol,
    /// skipping undefined values instead of reporting them as zero
    pub fn series(
        &self,
        kind: MetricKind,
        protocol: Protocol,
    ) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scenarios.iter().filter_map(move |s| {
            s.records
                .get(&protocol)
                .and_then(|record| record.get(kind))
                .map(|value| (s.scenario.label.as_str(), value))
        })
    }

    /// True when both matrices hold the same scenarios and bit-identical values
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.scenarios.len() == other.scenarios.len()
            && self.scenarios.iter().zip(&other.scenarios).all(|(a, b)| {
                a.scenario == b.scenario
                    && a.records.len() == b.records.len()
                    && a.records
                        .iter()
                        .zip(&b.records)
                        .all(|((pa, ra), (pb, rb))| pa == pb && ra.bit_eq(rb))
            })
            && self.diagnostics == other.diagnostics
    }
}

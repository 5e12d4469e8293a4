use netlab_report::aggregator::{LogNaming, MetricsAggregator};
use netlab_report::models::{Diagnostic, MetricKind, Protocol, ProtocolMetricRecord, Scenario};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const TCP_LOG: &str = "\
Connecting to host 10.0.0.20, port 5201
[  5]   0.00-1.00   sec  5.96 MBytes  50.0 Mbits/sec    0    126 KBytes
[  5]   1.00-2.00   sec  9.54 MBytes  80.0 Mbits/sec    0    185 KBytes
- - - - - - - - - - - - - - - - - - - - - - - - -
[  5]   0.00-10.00  sec   112 MBytes  94.6 Mbits/sec    0             sender
[  5]   0.00-10.00  sec   111 MBytes  93.1 Mbits/sec                  receiver

iperf Done.
";

const UDP_LOG: &str = "\
[  5]   0.00-1.00   sec   128 KBytes  1.05 Mbits/sec  0.020 ms  0/50 (2.0%)
[  5]   0.00-10.00  sec  1.25 MBytes  1.05 Mbits/sec  0.012 ms  3/50 (6.0%)  receiver
";

const PING_DURING: &str = "\
64 bytes from 10.0.0.20: icmp_seq=1 ttl=64 time=3.10 ms
64 bytes from 10.0.0.20: icmp_seq=2 ttl=64 time=2.90 ms

--- 10.0.0.20 ping statistics ---
2 packets transmitted, 2 received, 0% packet loss, time 1001ms
rtt min/avg/max/mdev = 2.900/3.000/3.100/0.100 ms
";

const PING_TRUNCATED: &str = "\
PING 10.0.0.20 (10.0.0.20) 56(84) bytes of data.
64 bytes from 10.0.0.20: icmp_seq=1 ttl=64 time=10.0 ms
64 bytes from 10.0.0.20: icmp_seq=2 ttl=64 time=12.5 ms
64 bytes from 10.0.0.20: icmp_seq=3 ttl=64 time=15.0 ms
64 bytes from 10.0.0.20: icmp_seq=4 ttl=64 time=17.5 ms
64 bytes from 10.0.0.20: icmp_seq=5 ttl=64 time=20.0 ms
";

fn write_log(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Should write log fixture");
}

/// Writes a complete exp1, a partial exp2 (no UDP logs) and nothing for exp3
fn lab_directory() -> TempDir {
    let dir = tempdir().expect("Should create temp dir");
    let path = dir.path();

    write_log(path, "exp1_tcp_h1_h20.log", TCP_LOG);
    write_log(path, "exp1_ping_during_tcp_h1_h20.log", PING_DURING);
    write_log(path, "exp1_udp_h1_h20.log", UDP_LOG);
    write_log(path, "exp1_ping_during_udp_h1_h20.log", PING_DURING);
    write_log(path, "exp1_ping_h1_h20.log", PING_TRUNCATED);

    write_log(path, "exp2_tcp_h1_h20.log", TCP_LOG);
    write_log(path, "exp2_ping_during_tcp_h1_h20.log", PING_TRUNCATED);
    write_log(path, "exp2_ping_h1_h20.log", PING_DURING);

    dir
}

fn aggregator(dir: &Path) -> MetricsAggregator {
    MetricsAggregator::new(
        dir,
        "h1_h20",
        vec![
            Scenario::new("exp1", "Baseline (Exp1)"),
            Scenario::new("exp2", "High-load (Exp2)"),
            Scenario::new("exp3", "Delay (Exp3)"),
        ],
        LogNaming::default(),
    )
}

#[test]
fn test_complete_scenario_records() {
    let dir = lab_directory();
    let matrix = aggregator(dir.path()).collect();

    let tcp = matrix.get("exp1", Protocol::Tcp).expect("TCP record should exist");
    assert_eq!(tcp.throughput_mbps, Some(93.1), "Last rate line (receiver) should win");
    assert_eq!(tcp.rtt_ms, Some(3.0));
    assert_eq!(tcp.loss_pct, Some(0.0));
    assert_eq!(tcp.jitter_ms, None);

    let udp = matrix.get("exp1", Protocol::Udp).expect("UDP record should exist");
    assert_eq!(udp.throughput_mbps, Some(1.05));
    assert_eq!(udp.jitter_ms, Some(0.012));
    assert_eq!(udp.loss_pct, Some(6.0));
    assert_eq!(udp.rtt_ms, Some(3.0));

    let icmp = matrix.get("exp1", Protocol::Icmp).expect("ICMP record should exist");
    assert_eq!(icmp.rtt_ms, Some(15.0), "Truncated ping should fall back to sample mean");
    assert_eq!(icmp.loss_pct, Some(0.0));
    assert_eq!(icmp.throughput_mbps, None);
    assert_eq!(icmp.jitter_ms, None);
}

#[test]
fn test_partial_and_missing_scenarios_still_present() {
    let dir = lab_directory();
    let matrix = aggregator(dir.path()).collect();

    // Every scenario is in the matrix, in configured order
    let labels: Vec<_> = matrix.scenarios().iter().map(|s| s.scenario.label.as_str()).collect();
    assert_eq!(labels, vec!["Baseline (Exp1)", "High-load (Exp2)", "Delay (Exp3)"]);

    // exp2 has no UDP logs
    let udp = matrix.get("exp2", Protocol::Udp).unwrap();
    assert_eq!(*udp, ProtocolMetricRecord::undefined());
    let tcp = matrix.get("exp2", Protocol::Tcp).unwrap();
    assert_eq!(tcp.rtt_ms, Some(15.0));

    // exp3 has nothing at all
    for protocol in Protocol::ALL {
        assert_eq!(matrix.get("exp3", protocol), Some(&ProtocolMetricRecord::undefined()));
    }

    // 2 missing UDP logs for exp2, 5 for exp3
    let missing = matrix
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::MissingFile { .. }))
        .count();
    assert_eq!(missing, 7);
    assert_eq!(matrix.diagnostics().len(), 7);
}

#[test]
fn test_series_for_report_sink_skips_undefined() {
    let dir = lab_directory();
    let matrix = aggregator(dir.path()).collect();

    let udp_throughput: Vec<_> = matrix.series(MetricKind::Throughput, Protocol::Udp).collect();
    assert_eq!(udp_throughput, vec![("Baseline (Exp1)", 1.05)]);

    let icmp_rtt: Vec<_> = matrix.series(MetricKind::Rtt, Protocol::Icmp).collect();
    assert_eq!(icmp_rtt, vec![("Baseline (Exp1)", 15.0), ("High-load (Exp2)", 3.0)]);

    assert_eq!(matrix.series(MetricKind::Jitter, Protocol::Tcp).count(), 0);
    assert_eq!(matrix.series(MetricKind::Throughput, Protocol::Icmp).count(), 0);
}

#[test]
fn test_undefined_by_protocol_regardless_of_content() {
    let dir = tempdir().unwrap();
    let path = dir.path();
    // Logs that would yield rate and jitter values if read by the wrong extractor
    let noisy = "1.0 Mbits/sec 0.5 ms 1/10 (10%)\nrtt min/avg/max/mdev = 1.0/2.0/3.0/0.1 ms\n";
    write_log(path, "exp1_tcp_h1_h20.log", noisy);
    write_log(path, "exp1_ping_during_tcp_h1_h20.log", noisy);
    write_log(path, "exp1_ping_h1_h20.log", noisy);

    let aggregator = MetricsAggregator::new(
        path,
        "h1_h20",
        vec![Scenario::new("exp1", "Baseline (Exp1)")],
        LogNaming::default(),
    );
    let matrix = aggregator.collect();

    let tcp = matrix.get("exp1", Protocol::Tcp).unwrap();
    assert_eq!(tcp.throughput_mbps, Some(1.0));
    assert_eq!(tcp.jitter_ms, None, "TCP jitter is never defined");

    let icmp = matrix.get("exp1", Protocol::Icmp).unwrap();
    assert_eq!(icmp.rtt_ms, Some(2.0));
    assert_eq!(icmp.throughput_mbps, None, "ICMP throughput is never defined");
    assert_eq!(icmp.jitter_ms, None, "ICMP jitter is never defined");
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let dir = lab_directory();
    let aggregator = aggregator(dir.path());

    let first = aggregator.collect();
    let second = aggregator.collect();
    assert!(first.bit_eq(&second), "Identical inputs must give identical matrices");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_collection_matches_sequential() {
    let dir = lab_directory();
    let aggregator = aggregator(dir.path());

    let sequential = aggregator.collect();
    let concurrent = aggregator
        .collect_concurrent()
        .await
        .expect("Concurrent collection should work");

    assert!(sequential.bit_eq(&concurrent), "Concurrent scan must merge in scenario order");
}

#[test]
fn test_custom_naming_and_hosts() {
    let dir = tempdir().unwrap();
    write_log(dir.path(), "base-iperf-udp-h2_h1.txt", UDP_LOG);

    let naming = LogNaming {
        transport: "{scenario}-iperf-{protocol}-{hosts}.txt".to_string(),
        ..LogNaming::default()
    };
    let aggregator = MetricsAggregator::new(
        dir.path(),
        "h2_h1",
        vec![Scenario::new("base", "Base")],
        naming,
    );
    let matrix = aggregator.collect();

    assert_eq!(matrix.get("base", Protocol::Udp).unwrap().loss_pct, Some(6.0));
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI structure for the netlab-report application
/// Uses clap's derive macros for automatic CLI generation
#[derive(Parser)]
#[command(author = "Kaipo Chen")]
#[command(version)] // Automatically uses version from Cargo.toml
#[command(about = "Network Lab Report - Extract throughput, RTT, loss and jitter from iperf and ping logs")]
#[command(long_about = "Netlab Report reads the iperf and ping logs written during network experiments, \
normalizes bandwidth units, and builds a per-scenario comparison of TCP, UDP and ICMP. \
Missing or truncated logs never abort a run; they are reported as warnings and the affected \
metrics are left undefined.")]
pub struct Cli {
    /// Configuration file (TOML); defaults to ./netlab.toml when present
    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    /// Directory holding the experiment logs, overrides the config file
    #[arg(short = 'd', long, global = true, help = "Directory containing the experiment logs")]
    pub log_dir: Option<PathBuf>,

    /// Host pair suffix used in log names, overrides the config file
    #[arg(long, global = true, help = "Host pair used in log names (e.g. h1_h20)")]
    pub hosts: Option<String>,

    /// Enable debug logging for this crate
    #[arg(short, long, global = true, help = "Verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the metrics matrix for every configured scenario
    #[command(about = "Analyze all experiment logs and report metrics per scenario and protocol")]
    #[command(long_about = "Scans the TCP, UDP and ping logs of every configured scenario and prints \
throughput, average RTT, packet loss and jitter per protocol.\n\n\
Examples:\n  \
nlr analyze                           # Table of all metrics\n  \
nlr analyze --format json -o out.json # Export for plotting\n  \
nlr analyze -d ./logs --concurrent    # Scan scenarios in parallel")]
    Analyze {
        /// Output format
        #[arg(
            short,
            long,
            default_value = "table",
            help = "Output format: table, json, csv"
        )]
        format: String,

        /// File path for the report; printed to stdout when omitted
        #[arg(short, long, help = "Output file path")]
        output: Option<PathBuf>,

        /// Scan scenarios on worker threads
        #[arg(long, help = "Scan scenarios concurrently")]
        concurrent: bool,
    },

    /// Run a single extractor against one log file
    #[command(about = "Parse one log file and print the extracted metrics")]
    Parse {
        /// Which extractor to run
        #[arg(value_enum)]
        kind: LogKind,

        /// Log file to parse
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Show the log files the naming convention expects
    #[command(about = "List expected log files and whether they exist")]
    Files {
        /// Only list files that are missing
        #[arg(long, help = "Show only missing files")]
        missing_only: bool,
    },
}

/// Log flavors understood by the `parse` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogKind {
    /// TCP iperf log (throughput only)
    Iperf,
    /// UDP iperf log (throughput, jitter, loss)
    Udp,
    /// ping log (average RTT, loss)
    Ping,
}

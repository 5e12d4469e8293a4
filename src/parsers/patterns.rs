//! Line patterns shared by the iperf and ping extractors

use lazy_static::lazy_static;
use regex::Regex;

/// Substring every iperf rate line carries
pub const RATE_MARKER: &str = "bits/sec";
/// Substring of a ping reply line carrying a per-packet RTT
pub const PING_TIME_MARKER: &str = " time=";
pub const PING_LOSS_MARKER: &str = "packet loss";
/// Linux ping prints `rtt min/avg/max/mdev`, BSD ping prints `round-trip min/avg/max/stddev`
pub const PING_RTT_MARKERS: [&str; 2] = ["rtt ", "round-trip"];

lazy_static! {
    /// `94.6 Mbits/sec`; any single letter is captured, callers iterate matches and skip unknown prefixes
    pub static ref PREFIXED_RATE_RE: Regex = Regex::new(r"([\d.]+)\s+([A-Za-z])bits/sec").unwrap();
    /// `81234 bits/sec`
    pub static ref BARE_RATE_RE: Regex = Regex::new(r"([\d.]+)\s+bits/sec").unwrap();
    /// `0.012 ms`, first occurrence on the line
    pub static ref JITTER_RE: Regex = Regex::new(r"([\d.]+)\s*ms").unwrap();
    /// `3/50 (6%)`; iperf2 pads the total as `3/  50`
    pub static ref DATAGRAM_LOSS_RE: Regex = Regex::new(r"(\d+)/\s*(\d+)\s*\(([\d.]+)%\)").unwrap();
    /// `time=0.043 ms`
    pub static ref PING_TIME_RE: Regex = Regex::new(r"time=([\d.]+)\s*ms").unwrap();
    /// `20 packets transmitted, 20 received, 0% packet loss`
    pub static ref PING_LOSS_RE: Regex = Regex::new(r"([\d.]+)%\s+packet loss").unwrap();
    /// `rtt min/avg/max/mdev = 0.032/0.043/0.050/0.003 ms`, capturing the average
    pub static ref PING_RTT_RE: Regex = Regex::new(r"=\s*[\d.]+/([\d.]+)/[\d.]+/[\d.]+\s*ms").unwrap();
}

/// Parses a captured numeric token, rejecting things like `1.2.3` or `.`
pub fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

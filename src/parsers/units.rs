//! Bandwidth unit normalization
//!
//! All throughput values are stored in Mbits/sec. iperf prints rates with a
//! K, M or G prefix, or with no prefix at all when the rate is given in plain
//! bits/sec.

use log::trace;

use crate::errors::ReportError;

/// Number of base units (bits/sec) in one Mbit/sec
pub const BITS_PER_MBIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitRatePrefix {
    Kilo,
    Mega,
    Giga,
}

impl BitRatePrefix {
    /// Converts a value carrying this prefix into Mbits/sec
    pub fn to_mbits(self, value: f64) -> f64 {
        match self {
            BitRatePrefix::Kilo => value / 1000.0,
            BitRatePrefix::Mega => value,
            BitRatePrefix::Giga => value * 1000.0,
        }
    }
}

impl TryFrom<char> for BitRatePrefix {
    type Error = ReportError;

    fn try_from(prefix: char) -> Result<Self, Self::Error> {
        match prefix {
            'K' => Ok(BitRatePrefix::Kilo),
            'M' => Ok(BitRatePrefix::Mega),
            'G' => Ok(BitRatePrefix::Giga),
            other => Err(ReportError::UnknownPrefix(other)),
        }
    }
}

/// Normalizes `value` with an optional one-letter prefix into Mbits/sec
///
/// Returns `None` for an unrecognized prefix: that means the log format is not
/// one we understand, not that the caller did something wrong.
pub fn to_mbits(value: f64, prefix: Option<char>) -> Option<f64> {
    match prefix {
        None => Some(value / BITS_PER_MBIT),
        Some(p) => match BitRatePrefix::try_from(p) {
            Ok(prefix) => Some(prefix.to_mbits(value)),
            Err(e) => {
                trace!("{e}, treating {value} as undefined");
                None
            }
        },
    }
}

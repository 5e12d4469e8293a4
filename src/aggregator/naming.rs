//! Log file naming convention
//!
//! Templates use `{scenario}`, `{protocol}` and `{hosts}` placeholders. The
//! defaults match the layout written by the experiment runner:
//!
//! - `exp1_tcp_h1_h20.log` (bandwidth test)
//! - `exp1_ping_during_tcp_h1_h20.log` (ping captured alongside the bandwidth test)
//! - `exp1_ping_h1_h20.log` (ping on its own)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{ReportError, ReportResult};
use crate::models::Protocol;

const SCENARIO: &str = "{scenario}";
const PROTOCOL: &str = "{protocol}";
const HOSTS: &str = "{hosts}";

/// Which tool produced a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRole {
    /// iperf output for a TCP or UDP flow
    Transport,
    /// ping captured while a transport flow was running
    ProbeDuring,
    /// ping with no concurrent flow
    ProbeOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogNaming {
    pub transport: String,
    pub probe_during: String,
    pub probe_only: String,
}

impl Default for LogNaming {
    fn default() -> Self {
        Self {
            transport: "{scenario}_{protocol}_{hosts}.log".to_string(),
            probe_during: "{scenario}_ping_during_{protocol}_{hosts}.log".to_string(),
            probe_only: "{scenario}_ping_{hosts}.log".to_string(),
        }
    }
}

impl LogNaming {
    pub fn validate(&self) -> ReportResult<()> {
        let required: [(&String, &[&'static str]); 3] = [
            (&self.transport, &[SCENARIO, PROTOCOL]),
            (&self.probe_during, &[SCENARIO, PROTOCOL]),
            (&self.probe_only, &[SCENARIO]),
        ];

        for (template, placeholders) in required {
            for &placeholder in placeholders {
                if !template.contains(placeholder) {
                    return Err(ReportError::InvalidTemplate {
                        template: template.clone(),
                        placeholder,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn template(&self, role: LogRole) -> &str {
        match role {
            LogRole::Transport => &self.transport,
            LogRole::ProbeDuring => &self.probe_during,
            LogRole::ProbeOnly => &self.probe_only,
        }
    }

    pub fn file_name(&self, role: LogRole, scenario_id: &str, protocol: Protocol, hosts: &str) -> String {
        self.template(role)
            .replace(SCENARIO, scenario_id)
            .replace(PROTOCOL, protocol.log_key())
            .replace(HOSTS, hosts)
    }

    pub fn path(
        &self,
        log_dir: &Path,
        role: LogRole,
        scenario_id: &str,
        protocol: Protocol,
        hosts: &str,
    ) -> PathBuf {
        log_dir.join(self.file_name(role, scenario_id, protocol, hosts))
    }
}

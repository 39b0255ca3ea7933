//! Body of `GET /health`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeState {
    Ok,
    Error,
}

/// Result of probing one dependency.
#[derive(Debug, Serialize)]
pub struct Probe {
    pub status: ProbeState,
    pub message: String,
}

impl Probe {
    /// `ok` with `healthy` as the message when `passed`, otherwise `error` with `failed`.
    pub fn from_outcome(passed: bool, healthy: impl Into<String>, failed: &str) -> Self {
        if passed {
            Self {
                status: ProbeState::Ok,
                message: healthy.into(),
            }
        } else {
            Self {
                status: ProbeState::Error,
                message: failed.to_string(),
            }
        }
    }

    pub fn passed(&self) -> bool {
        self.status == ProbeState::Ok
    }
}

#[derive(Debug, Serialize)]
pub struct Probes {
    pub database: Probe,
    pub cache: Probe,
    pub click_queue: Probe,
}

impl Probes {
    pub fn all_passed(&self) -> bool {
        [&self.database, &self.cache, &self.click_queue]
            .iter()
            .all(|p| p.passed())
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: OverallStatus,
    pub version: &'static str,
    pub checks: Probes,
}

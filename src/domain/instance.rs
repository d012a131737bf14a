//! Instance records as observed from the hypervisor.

use chrono::{DateTime, Utc};

/// Lifecycle status reported by the hypervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceStatus {
    Running,
    Stopped,
    Frozen,
    Starting,
    Stopping,
    Other(String),
}

impl InstanceStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Running" => Self::Running,
            "Stopped" => Self::Stopped,
            "Frozen" => Self::Frozen,
            "Starting" => Self::Starting,
            "Stopping" => Self::Stopping,
            other => Self::Other(other.to_string()),
        }
    }

    /// Statuses that need a stop before delete or relocation
    /// (running: code 103, frozen: code 110).
    #[must_use]
    pub fn is_running_like(&self) -> bool {
        matches!(self, Self::Running | Self::Frozen)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "Running",
            Self::Stopped => "Stopped",
            Self::Frozen => "Frozen",
            Self::Starting => "Starting",
            Self::Stopping => "Stopping",
            Self::Other(raw) => raw,
        }
    }
}

/// One instance as reported by the hypervisor listing.
#[derive(Debug, Clone)]
pub struct InstanceRecord {
    pub name: String,
    pub description: String,
    pub status: InstanceStatus,
    pub status_code: i64,
    pub profiles: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Observed, not stored; absent when the instance is not running.
    pub memory_usage: Option<u64>,
}

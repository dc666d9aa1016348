use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of latency samples retained per site, oldest evicted first.
pub const HISTORY_LIMIT: usize = 20;

/// Availability status of a monitored site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SiteStatus {
    Pending,
    Up,
    Down,
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteStatus::Pending => write!(f, "PENDING"),
            SiteStatus::Up => write!(f, "UP"),
            SiteStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// A monitored target and its live probe state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Opaque identifier, unique for the lifetime of the process
    pub id: String,

    /// Display label
    pub name: String,

    /// Probe target, an absolute http/https URL
    pub url: String,

    /// Current availability status; only probe completion mutates this
    pub status: SiteStatus,

    /// Latest measured round-trip time; 0 while DOWN or PENDING
    #[serde(rename = "latency")]
    pub latency_ms: u64,

    /// Most recent latency samples, oldest first, capped at [`HISTORY_LIMIT`]
    pub history: VecDeque<u64>,

    /// Completion time of the most recent probe
    #[serde(rename = "lastChecked")]
    pub last_checked_at: Option<DateTime<Utc>>,

    /// Remediation action identifiers to run on failed probes
    #[serde(default)]
    pub recovery_plans: Vec<String>,
}

impl Site {
    /// Create a site awaiting its first probe
    pub fn new(name: impl Into<String>, url: impl Into<String>, recovery_plans: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            url: url.into(),
            status: SiteStatus::Pending,
            latency_ms: 0,
            history: VecDeque::new(),
            last_checked_at: None,
            recovery_plans,
        }
    }

    /// Append a latency sample, evicting the oldest past the cap
    pub fn push_sample(&mut self, latency_ms: u64) {
        self.history.push_back(latency_ms);
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }
}

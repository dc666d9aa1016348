//! SitePulse - availability monitoring engine
//!
//! This library provides the monitoring core: a registry of probed sites,
//! an HTTP health checker, the status state machine with its event log,
//! remediation dispatch for failing sites, and the periodic scheduler
//! that drives it all.

pub mod checker;
pub mod config;
pub mod events;
pub mod monitor;
pub mod registry;
pub mod remediation;
pub mod scheduler;
pub mod site;
pub mod transition;
pub mod validation;

// Re-export main types
pub use checker::{HttpProbe, Probe, ProbeOutcome};
pub use config::Config;
pub use events::{EventEntry, EventLog};
pub use monitor::Monitor;
pub use registry::SiteRegistry;
pub use remediation::{ClearCacheAction, RemediationAction, RemediationDispatcher};
pub use scheduler::Scheduler;
pub use site::{Site, SiteStatus};

/// Re-export common error types
pub use anyhow;

/// SitePulse result type using anyhow for error handling
pub type Result<T> = anyhow::Result<T>;

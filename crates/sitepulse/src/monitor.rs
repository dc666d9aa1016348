use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use crate::checker::{Probe, ProbeOutcome};
use crate::events::EventLog;
use crate::registry::SiteRegistry;
use crate::remediation::RemediationDispatcher;
use crate::transition;

/// The monitoring engine: probes a site, applies the status transition,
/// records events, and dispatches remediation.
pub struct Monitor {
    registry: Arc<SiteRegistry>,
    events: Arc<EventLog>,
    remediation: Arc<RemediationDispatcher>,
    probe: Arc<dyn Probe>,
    in_flight: Mutex<HashSet<String>>,
}

impl Monitor {
    pub fn new(
        registry: Arc<SiteRegistry>,
        events: Arc<EventLog>,
        remediation: Arc<RemediationDispatcher>,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self { registry, events, remediation, probe, in_flight: Mutex::new(HashSet::new()) }
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Check one site by id. At most one check per site runs at a time;
    /// a check requested while another is in flight is coalesced away.
    pub async fn check_site(&self, id: &str) {
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if !in_flight.insert(id.to_string()) {
                debug!(site = id, "check already in flight, skipping");
                return;
            }
        }

        // The guard releases the slot even if the check unwinds.
        let _slot = InFlightSlot { set: &self.in_flight, id };

        self.run_check(id).await;
    }

    async fn run_check(&self, id: &str) {
        // Snapshot the target; the site may be removed while we probe.
        let Some(site) = self.registry.get(id).await else {
            return;
        };

        info!("Checking {} ({})", site.name, site.url);

        let outcome = ProbeOutcome::from_result(self.probe.probe(&site.url).await);
        let now = Utc::now();

        match &outcome {
            ProbeOutcome::Success { latency_ms } => {
                info!("Status: UP, latency: {latency_ms}ms");
            }
            ProbeOutcome::Failure { message } => {
                info!("Status: DOWN, error: {message}");
            }
        }

        let Some(effect) = self.registry.update(id, |s| transition::apply(s, &outcome, now)).await
        else {
            // Removed mid-probe; drop the outcome on the floor.
            return;
        };

        if let Some(event) = effect.event {
            self.events.push(event).await;
        }

        if effect.remediate {
            for plan in &site.recovery_plans {
                self.remediation.dispatch(plan, &site.url).await;
            }
        }
    }
}

/// Removes a site id from the in-flight set on drop
struct InFlightSlot<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: &'a str,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.set.lock().unwrap_or_else(PoisonError::into_inner).remove(self.id);
    }
}

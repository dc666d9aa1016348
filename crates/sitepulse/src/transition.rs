//! Status state machine: PENDING -> UP/DOWN, driven by probe outcomes.

use chrono::{DateTime, Utc};

use crate::checker::ProbeOutcome;
use crate::events::{EventEntry, RECOVERED_MESSAGE};
use crate::site::{Site, SiteStatus};

/// What the caller must do after a transition has been applied
#[derive(Debug)]
pub struct TransitionEffect {
    /// Entry to append to the event log, present only on an observable
    /// transition (DOWN -> UP recovery, or entering DOWN)
    pub event: Option<EventEntry>,
    /// Whether the site's recovery plans should be dispatched. Fires on
    /// every failed probe, not only the first of an outage.
    pub remediate: bool,
}

/// Apply one probe outcome to a site.
///
/// Always pushes a latency sample (0 on failure) and stamps
/// `last_checked_at`, whatever the previous status was.
pub fn apply(site: &mut Site, outcome: &ProbeOutcome, now: DateTime<Utc>) -> TransitionEffect {
    let mut event = None;
    let remediate;

    match outcome {
        ProbeOutcome::Success { latency_ms } => {
            if site.status == SiteStatus::Down {
                event = Some(EventEntry::new(site, SiteStatus::Up, RECOVERED_MESSAGE, now));
            }
            site.status = SiteStatus::Up;
            site.latency_ms = *latency_ms;
            remediate = false;
        }
        ProbeOutcome::Failure { message } => {
            if matches!(site.status, SiteStatus::Up | SiteStatus::Pending) {
                event = Some(EventEntry::new(site, SiteStatus::Down, message.clone(), now));
            }
            site.status = SiteStatus::Down;
            site.latency_ms = 0;
            remediate = true;
        }
    }

    site.push_sample(site.latency_ms);
    site.last_checked_at = Some(now);

    TransitionEffect { event, remediate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::HISTORY_LIMIT;

    fn site() -> Site {
        Site::new("Example", "https://example.com", vec![])
    }

    fn success(latency_ms: u64) -> ProbeOutcome {
        ProbeOutcome::Success { latency_ms }
    }

    fn failure(message: &str) -> ProbeOutcome {
        ProbeOutcome::Failure { message: message.to_string() }
    }

    #[test]
    fn first_success_is_silent() {
        let mut site = site();
        let effect = apply(&mut site, &success(120), Utc::now());

        assert!(effect.event.is_none());
        assert!(!effect.remediate);
        assert_eq!(site.status, SiteStatus::Up);
        assert_eq!(site.latency_ms, 120);
        assert_eq!(site.history.back(), Some(&120));
        assert!(site.last_checked_at.is_some());
    }

    #[test]
    fn sustained_up_is_silent() {
        let mut site = site();
        apply(&mut site, &success(100), Utc::now());
        let effect = apply(&mut site, &success(110), Utc::now());

        assert!(effect.event.is_none());
        assert_eq!(site.latency_ms, 110);
    }

    #[test]
    fn first_failure_logs_down_with_message() {
        let mut site = site();
        let effect = apply(&mut site, &failure("connection refused"), Utc::now());

        let event = effect.event.expect("expected DOWN event");
        assert_eq!(event.status, SiteStatus::Down);
        assert_eq!(event.message, "connection refused");
        assert_eq!(event.website_id, site.id);
        assert!(effect.remediate);
        assert_eq!(site.status, SiteStatus::Down);
        assert_eq!(site.latency_ms, 0);
        assert_eq!(site.history.back(), Some(&0));
    }

    #[test]
    fn up_to_down_logs_once() {
        let mut site = site();
        apply(&mut site, &success(100), Utc::now());
        let effect = apply(&mut site, &failure("timeout"), Utc::now());

        assert!(effect.event.is_some());
        assert_eq!(site.status, SiteStatus::Down);
    }

    #[test]
    fn sustained_down_is_silent_but_still_remediates() {
        let mut site = site();
        apply(&mut site, &failure("timeout"), Utc::now());

        let before = site.last_checked_at;
        let effect = apply(&mut site, &failure("timeout"), Utc::now());

        assert!(effect.event.is_none());
        assert!(effect.remediate);
        assert_eq!(site.history.len(), 2);
        assert!(site.last_checked_at >= before);
    }

    #[test]
    fn recovery_logs_up_with_fixed_message() {
        let mut site = site();
        apply(&mut site, &failure("timeout"), Utc::now());
        let effect = apply(&mut site, &success(80), Utc::now());

        let event = effect.event.expect("expected UP event");
        assert_eq!(event.status, SiteStatus::Up);
        assert_eq!(event.message, RECOVERED_MESSAGE);
        assert!(!effect.remediate);
        assert_eq!(site.status, SiteStatus::Up);
        assert_eq!(site.latency_ms, 80);
    }

    #[test]
    fn history_stays_bounded_across_many_checks() {
        let mut site = site();
        for i in 0..40u64 {
            apply(&mut site, &success(i), Utc::now());
        }

        assert_eq!(site.history.len(), HISTORY_LIMIT);
        // FIFO eviction: first 20 samples are gone
        assert_eq!(site.history.front(), Some(&20));
    }
}

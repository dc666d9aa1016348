use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::site::{Site, SiteStatus};

/// Maximum entries returned to readers, most recent first
pub const READ_LIMIT: usize = 50;

/// Entries retained in the underlying store before eviction
const RETAINED_LIMIT: usize = 200;

/// Log message for a DOWN -> UP transition
pub const RECOVERED_MESSAGE: &str = "Service recovered";

/// A recorded status transition.
///
/// Holds a denormalized copy of the site's identity, not a reference,
/// so entries survive later deletion of the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub id: String,
    pub website_id: String,
    pub name: String,
    /// The status transitioned into, UP or DOWN
    pub status: SiteStatus,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl EventEntry {
    pub fn new(
        site: &Site,
        status: SiteStatus,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            website_id: site.id.clone(),
            name: site.name.clone(),
            status,
            timestamp,
            message: message.into(),
        }
    }
}

/// Append-only, bounded, most-recent-first log of status transitions
#[derive(Debug, Default)]
pub struct EventLog {
    entries: RwLock<VecDeque<EventEntry>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition. Entries past the retention cap are evicted
    /// oldest first.
    pub async fn push(&self, entry: EventEntry) {
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        while entries.len() > RETAINED_LIMIT {
            entries.pop_back();
        }
    }

    /// Most recent entries, newest first, capped at `limit`
    pub async fn recent(&self, limit: usize) -> Vec<EventEntry> {
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(site: &Site, message: &str) -> EventEntry {
        EventEntry::new(site, SiteStatus::Down, message, Utc::now())
    }

    #[tokio::test]
    async fn recent_returns_newest_first() {
        let log = EventLog::new();
        let site = Site::new("Example", "https://example.com", vec![]);

        log.push(entry(&site, "first")).await;
        log.push(entry(&site, "second")).await;

        let recent = log.recent(READ_LIMIT).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "second");
        assert_eq!(recent[1].message, "first");
    }

    #[tokio::test]
    async fn reads_are_capped() {
        let log = EventLog::new();
        let site = Site::new("Example", "https://example.com", vec![]);

        for i in 0..60 {
            log.push(entry(&site, &format!("event {i}"))).await;
        }

        assert_eq!(log.recent(READ_LIMIT).await.len(), READ_LIMIT);
    }

    #[tokio::test]
    async fn store_evicts_oldest_past_retention_cap() {
        let log = EventLog::new();
        let site = Site::new("Example", "https://example.com", vec![]);

        for i in 0..250 {
            log.push(entry(&site, &format!("event {i}"))).await;
        }

        assert_eq!(log.len().await, 200);
        // Newest entry is still at the front
        assert_eq!(log.recent(1).await[0].message, "event 249");
    }

    #[tokio::test]
    async fn entries_survive_site_identity_changes() {
        let log = EventLog::new();
        let site = Site::new("Example", "https://example.com", vec![]);
        log.push(entry(&site, "down")).await;
        drop(site);

        let recent = log.recent(READ_LIMIT).await;
        assert_eq!(recent[0].name, "Example");
    }
}

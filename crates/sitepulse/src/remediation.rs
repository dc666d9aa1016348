use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{info, warn};

/// Identifier of the built-in cache purge action
pub const CLEAR_CACHE: &str = "clear_cache";

/// Timeout for a single remediation call
const REMEDIATION_TIMEOUT: Duration = Duration::from_secs(3);

/// A named recovery action executed against a failing site.
///
/// Implementations must be best-effort: errors are reported to the
/// dispatcher and go no further.
#[async_trait::async_trait]
pub trait RemediationAction: Send + Sync {
    async fn execute(&self, url: &str) -> Result<()>;
}

/// Maps action identifiers to handlers.
///
/// New actions are added by registering a handler, not by branching in
/// the status state machine. Unknown identifiers are a logged no-op.
#[derive(Default)]
pub struct RemediationDispatcher {
    actions: HashMap<String, Arc<dyn RemediationAction>>,
}

impl RemediationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, action: Arc<dyn RemediationAction>) {
        self.actions.insert(name.into(), action);
    }

    pub fn with_action(
        mut self,
        name: impl Into<String>,
        action: Arc<dyn RemediationAction>,
    ) -> Self {
        self.register(name, action);
        self
    }

    /// Run one action by name. Failures are contained here; the health
    /// check that triggered the dispatch is never affected.
    pub async fn dispatch(&self, name: &str, url: &str) {
        match self.actions.get(name) {
            Some(action) => match action.execute(url).await {
                Ok(()) => info!(action = name, url, "remediation action completed"),
                Err(e) => warn!(action = name, url, "remediation action failed: {e:#}"),
            },
            None => warn!(action = name, "unknown remediation action, skipping"),
        }
    }
}

/// Purges the edge cache for a failing site's URL through the Cloudflare
/// zone purge API.
pub struct ClearCacheAction {
    client: reqwest::Client,
    zone_id: Option<String>,
    api_token: Option<String>,
}

impl ClearCacheAction {
    pub fn new(zone_id: Option<String>, api_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REMEDIATION_TIMEOUT).build()?;

        Ok(Self { client, zone_id, api_token })
    }

    /// Credentials come from `CLOUDFLARE_ZONE_ID` and
    /// `CLOUDFLARE_API_TOKEN`. Missing values are tolerated; the action
    /// then fails gracefully at execution time.
    pub fn from_env() -> Result<Self> {
        Self::new(env::var("CLOUDFLARE_ZONE_ID").ok(), env::var("CLOUDFLARE_API_TOKEN").ok())
    }
}

#[async_trait::async_trait]
impl RemediationAction for ClearCacheAction {
    async fn execute(&self, url: &str) -> Result<()> {
        let (Some(zone_id), Some(api_token)) = (&self.zone_id, &self.api_token) else {
            bail!("cache purge credentials are not configured");
        };

        let endpoint = format!("https://api.cloudflare.com/client/v4/zones/{zone_id}/purge_cache");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_token)
            .json(&serde_json::json!({ "files": [url] }))
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("cache purge API returned status {}", response.status());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingAction {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RemediationAction for RecordingAction {
        async fn execute(&self, _url: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingAction;

    #[async_trait::async_trait]
    impl RemediationAction for FailingAction {
        async fn execute(&self, _url: &str) -> Result<()> {
            bail!("remediation backend unavailable")
        }
    }

    #[tokio::test]
    async fn dispatch_runs_registered_action() {
        let action = Arc::new(RecordingAction::default());
        let dispatcher = RemediationDispatcher::new().with_action("restart", action.clone());

        dispatcher.dispatch("restart", "https://example.com").await;

        assert_eq!(action.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_action_is_a_noop() {
        let dispatcher = RemediationDispatcher::new();
        // Must not panic or error
        dispatcher.dispatch("no_such_action", "https://example.com").await;
    }

    #[tokio::test]
    async fn action_failure_is_contained() {
        let dispatcher = RemediationDispatcher::new().with_action("flaky", Arc::new(FailingAction));
        // Returns normally despite the handler erroring
        dispatcher.dispatch("flaky", "https://example.com").await;
    }

    #[tokio::test]
    async fn clear_cache_without_credentials_fails_gracefully() {
        let action = ClearCacheAction::new(None, None).unwrap();

        let err = action.execute("https://example.com").await.unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }
}

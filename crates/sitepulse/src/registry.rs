use thiserror::Error;
use tokio::sync::RwLock;

use crate::site::Site;
use crate::validation::validate_probe_url;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Site name cannot be empty")]
    EmptyName,
    #[error("{0}")]
    InvalidUrl(String),
}

/// Owned, shared set of monitored sites.
///
/// Backed by a single lock; transitions are applied under the write lock
/// so readers never observe a half-updated site. Iteration order is
/// insertion order.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: RwLock<Vec<Site>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a site. It starts PENDING with an empty history; the
    /// caller is expected to dispatch an immediate first check.
    pub async fn add(
        &self,
        name: &str,
        url: &str,
        recovery_plans: Vec<String>,
    ) -> Result<Site, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        validate_probe_url(url).map_err(RegistryError::InvalidUrl)?;

        let site = Site::new(name, url, recovery_plans);
        self.sites.write().await.push(site.clone());
        Ok(site)
    }

    /// Remove a site. Removing an unknown id is a no-op.
    pub async fn remove(&self, id: &str) -> bool {
        let mut sites = self.sites.write().await;
        let before = sites.len();
        sites.retain(|site| site.id != id);
        sites.len() != before
    }

    pub async fn get(&self, id: &str) -> Option<Site> {
        self.sites.read().await.iter().find(|site| site.id == id).cloned()
    }

    /// Snapshot of all sites for iteration or read
    pub async fn list(&self) -> Vec<Site> {
        self.sites.read().await.clone()
    }

    /// Apply a mutation to one site under the write lock. Returns `None`
    /// if the site was removed in the meantime.
    pub async fn update<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Site) -> R,
    {
        let mut sites = self.sites.write().await;
        sites.iter_mut().find(|site| site.id == id).map(f)
    }
}

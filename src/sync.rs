//! Token List Sync
//!
//! Owns the locally displayed view of the remote registry. A sync cycle
//! reads one page of identifiers, enriches them, and atomically swaps
//! the displayed snapshot. Readers only ever observe fully-formed
//! snapshots; a failed cycle leaves the previous one in place.

use crate::enrich::{EnrichError, EnrichedToken, Enricher};
use crate::registry::RegistryClient;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Configuration for sync behavior
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size for registry listing
    pub page_limit: u64,
    /// Maximum in-flight enrichment lookups
    pub enrich_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_limit: 100,
            enrich_concurrency: 8,
        }
    }
}

/// Errors that can fail a sync cycle
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Registry listing failed: {0}")]
    List(#[from] crate::registry::RegistryError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

/// Maintains the local, enriched view of the remote registry
pub struct TokenListSync {
    client: Arc<dyn RegistryClient>,
    enricher: Enricher,
    viewer: Option<String>,
    snapshot: RwLock<Vec<EnrichedToken>>,
    config: SyncConfig,
}

impl TokenListSync {
    /// Create a sync manager for the given registry and viewer identity.
    ///
    /// The viewer identity is injected here once; when absent, balance
    /// lookups are skipped for every cycle.
    pub fn new(
        client: Arc<dyn RegistryClient>,
        viewer: Option<String>,
        config: SyncConfig,
    ) -> Self {
        let enricher = Enricher::new(client.clone(), config.enrich_concurrency);
        Self {
            client,
            enricher,
            viewer,
            snapshot: RwLock::new(Vec::new()),
            config,
        }
    }

    /// Run one full sync cycle: list, enrich, swap.
    ///
    /// On failure the previously displayed snapshot is retained
    /// untouched - partial cycles never leak to readers.
    // TODO: page through the registry once it can grow past one page;
    // only the first page is read today.
    pub async fn refresh(&self) -> Result<usize, SyncError> {
        let identifiers = self.client.list(0, self.config.page_limit).await?;

        tracing::debug!(count = identifiers.len(), "Listed registry page");

        let enriched = self
            .enricher
            .enrich(&identifiers, self.viewer.as_deref())
            .await?;

        let count = enriched.len();
        let mut snapshot = self.snapshot.write().await;
        *snapshot = enriched;
        drop(snapshot);

        tracing::info!(tokens = count, "Token list synced");
        Ok(count)
    }

    /// The most recently completed snapshot.
    pub async fn tokens(&self) -> Vec<EnrichedToken> {
        self.snapshot.read().await.clone()
    }

    /// Viewer identity this view was built for, if any.
    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::MockRegistry;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.page_limit, 100);
        assert_eq!(config.enrich_concurrency, 8);
    }

    #[tokio::test]
    async fn test_refresh_swaps_snapshot() {
        let registry = Arc::new(
            MockRegistry::new(["a.test", "b.test"])
                .with_metadata("a.test", 6)
                .with_metadata("b.test", 6),
        );
        let sync = TokenListSync::new(registry.clone(), None, SyncConfig::default());

        assert!(sync.tokens().await.is_empty());

        let count = sync.refresh().await.unwrap();
        assert_eq!(count, 2);

        let tokens = sync.tokens().await;
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].identifier, "a.test");
        assert_eq!(tokens[1].identifier, "b.test");
        assert_eq!(registry.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let registry = Arc::new(MockRegistry::new(["a.test"]).with_metadata("a.test", 6));
        let sync = TokenListSync::new(registry.clone(), None, SyncConfig::default());
        sync.refresh().await.unwrap();
        assert_eq!(sync.tokens().await.len(), 1);

        registry.add("missing.test").await.unwrap();
        let err = sync.refresh().await.unwrap_err();
        assert!(matches!(err, SyncError::Enrich(_)));

        // Reader still sees the last completed cycle
        let tokens = sync.tokens().await;
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].identifier, "a.test");
    }

    #[tokio::test]
    async fn test_end_to_end_without_viewer() {
        // Registry returns two tokens, viewer absent: metadata only,
        // balances never requested, both render the sentinel.
        let registry = Arc::new(
            MockRegistry::new(["a.test", "b.test"])
                .with_metadata("a.test", 6)
                .with_metadata("b.test", 6),
        );
        let sync = TokenListSync::new(registry.clone(), None, SyncConfig::default());
        sync.refresh().await.unwrap();

        let tokens = sync.tokens().await;
        assert_eq!(tokens[0].display_balance(), "-");
        assert_eq!(tokens[1].display_balance(), "-");
        assert_eq!(registry.view_methods_for("a.test"), vec!["ft_metadata"]);
        assert_eq!(registry.view_methods_for("b.test"), vec!["ft_metadata"]);
    }
}

//! Token Enrichment
//!
//! Takes one page of bare identifiers from the registry and attaches
//! live on-chain data to each: the viewer's balance (when a viewer
//! identity is present) and the token's metadata.
//!
//! Entries are enriched concurrently up to a configured bound, but
//! results always come back in input order - completion order is
//! irrelevant to the caller.

use crate::normalize::{display_amount, normalize};
use crate::registry::{RegistryClient, RegistryError, TokenMetadata};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A registry entry with its on-chain data attached.
///
/// Produced by one sync cycle; the whole collection is swapped
/// atomically at the view layer, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedToken {
    pub identifier: String,
    /// Raw balance of the current viewer. None means the lookup was not
    /// applicable (no viewer) or not resolved - distinct from zero.
    pub balance: Option<u128>,
    pub metadata: TokenMetadata,
}

impl EnrichedToken {
    /// Display-ready balance, `-` when absent.
    pub fn display_balance(&self) -> String {
        display_amount(normalize(self.balance, self.metadata.decimals))
    }
}

/// Which remote lookup failed during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Balance,
    Metadata,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Balance => write!(f, "balance"),
            Lookup::Metadata => write!(f, "metadata"),
        }
    }
}

/// A balance or metadata lookup failed for one identifier.
///
/// One failing entry fails the whole batch; the sync cycle keeps the
/// previously displayed snapshot in that case.
#[derive(Error, Debug)]
#[error("Failed to enrich {identifier} ({lookup} lookup): {source}")]
pub struct EnrichError {
    pub identifier: String,
    pub lookup: Lookup,
    #[source]
    pub source: RegistryError,
}

/// Enriches pages of registry identifiers with balances and metadata
pub struct Enricher {
    client: Arc<dyn RegistryClient>,
    concurrency: usize,
}

impl Enricher {
    /// Create an enricher with the given concurrency bound (minimum 1)
    pub fn new(client: Arc<dyn RegistryClient>, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// Enrich one already-paginated slice of identifiers.
    ///
    /// The result has the same length and order as the input. Read-only:
    /// no registry mutation is ever issued from here.
    pub async fn enrich(
        &self,
        identifiers: &[String],
        viewer: Option<&str>,
    ) -> Result<Vec<EnrichedToken>, EnrichError> {
        stream::iter(identifiers.iter().cloned())
            .map(|identifier| self.enrich_one(identifier, viewer))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    async fn enrich_one(
        &self,
        identifier: String,
        viewer: Option<&str>,
    ) -> Result<EnrichedToken, EnrichError> {
        // Balance and metadata are independent lookups; run them together.
        let (balance, metadata) = tokio::try_join!(
            self.fetch_balance(&identifier, viewer),
            self.fetch_metadata(&identifier)
        )?;

        tracing::debug!(token = %identifier, has_balance = balance.is_some(), "Enriched token");

        Ok(EnrichedToken {
            identifier,
            balance,
            metadata,
        })
    }

    /// Viewer balance, skipped entirely when there is no viewer identity.
    async fn fetch_balance(
        &self,
        identifier: &str,
        viewer: Option<&str>,
    ) -> Result<Option<u128>, EnrichError> {
        let Some(account_id) = viewer else {
            return Ok(None);
        };

        let value = self
            .client
            .view(identifier, "ft_balance_of", json!({ "account_id": account_id }))
            .await
            .map_err(|source| EnrichError {
                identifier: identifier.to_string(),
                lookup: Lookup::Balance,
                source,
            })?;

        // Raw balances travel as JSON strings (u128 exceeds JSON numbers)
        let raw = value
            .as_str()
            .ok_or_else(|| EnrichError {
                identifier: identifier.to_string(),
                lookup: Lookup::Balance,
                source: RegistryError::Decode(format!("expected string balance, got {value}")),
            })?
            .parse::<u128>()
            .map_err(|e| EnrichError {
                identifier: identifier.to_string(),
                lookup: Lookup::Balance,
                source: RegistryError::Decode(format!("invalid balance: {e}")),
            })?;

        Ok(Some(raw))
    }

    async fn fetch_metadata(&self, identifier: &str) -> Result<TokenMetadata, EnrichError> {
        let value = self
            .client
            .view(identifier, "ft_metadata", json!({}))
            .await
            .map_err(|source| EnrichError {
                identifier: identifier.to_string(),
                lookup: Lookup::Metadata,
                source,
            })?;

        serde_json::from_value(value).map_err(|e| EnrichError {
            identifier: identifier.to_string(),
            lookup: Lookup::Metadata,
            source: RegistryError::Decode(e.to_string()),
        })
    }
}

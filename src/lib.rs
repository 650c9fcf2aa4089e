//! # Tokenlist Sync
//!
//! Client-side synchronization layer for a remote, append-style registry
//! of fungible-token identifiers. Maintains a local enriched view of the
//! registry and performs validated mutations against it.
//!
//! ## Features
//!
//! - **Paginated listing**: reads the registry page by page
//! - **Concurrent enrichment**: balance + metadata lookups per entry,
//!   bounded in-flight, results in input order
//! - **Validated mutations**: structured outcome classification and an
//!   unconditional optimistic re-sync
//! - **Transient notifications**: one live message with a cancellable
//!   auto-clear timer
//!
//! ## Modules
//!
//! - [`registry`]: remote registry capability trait and gateway client
//! - [`enrich`]: per-entry balance and metadata enrichment
//! - [`sync`]: the sync cycle and the atomically swapped snapshot
//! - [`mutation`]: the add-token pipeline
//! - [`notify`]: notification lifecycle
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokenlist_sync::{
//!     GatewayClient, GatewayConfig, MutationPipeline, Notifier, SyncConfig, TokenListSync,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(GatewayClient::new(GatewayConfig::default())?);
//!
//!     let sync = Arc::new(TokenListSync::new(
//!         client.clone(),
//!         Some("alice.test".to_string()),
//!         SyncConfig::default(),
//!     ));
//!     sync.refresh().await?;
//!
//!     for token in sync.tokens().await {
//!         println!("{} {}", token.identifier, token.display_balance());
//!     }
//!
//!     let notifier = Arc::new(Notifier::new());
//!     let pipeline = MutationPipeline::new(client, sync, notifier);
//!     pipeline.submit("usdc.test").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod enrich;
pub mod mutation;
pub mod normalize;
pub mod notify;
pub mod registry;
pub mod sync;

// Re-export top-level types for convenience
pub use registry::{GatewayClient, GatewayConfig, RegistryClient, RegistryError, TokenMetadata};

pub use enrich::{EnrichError, EnrichedToken, Enricher, Lookup};

pub use normalize::{display_amount, normalize};

pub use sync::{SyncConfig, SyncError, TokenListSync};

pub use mutation::{MutationError, MutationOutcome, MutationPipeline};

pub use notify::{Notification, Notifier, DEFAULT_CLEAR_AFTER};

pub use config::{
    Config, ConfigError, GatewayConfig as ConfigGatewayConfig, LoggingConfig,
    NotificationsConfig, SyncConfig as ConfigSyncConfig,
};

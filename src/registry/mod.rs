//! Remote Registry Access
//!
//! The registry is a remote, append-style list of fungible-token
//! identifiers. This module defines the capability surface the rest of
//! the crate consumes, plus the types that cross it:
//!
//! - **RegistryClient**: trait over `list` / `add` / `add_many` / `view`
//! - **GatewayClient**: reqwest implementation against an HTTP gateway
//! - **TokenMetadata**: on-chain metadata for one token contract

mod gateway;
#[cfg(test)]
pub(crate) mod mock;

pub use gateway::{GatewayClient, GatewayConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Capability surface of the remote token registry.
///
/// Implementations own all transport concerns (session, signing,
/// encoding); consumers only see identifiers and JSON values. Every
/// method is a suspension point and runs to completion once issued -
/// there is no cancellation.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Read one page of token identifiers, in insertion order.
    async fn list(&self, from_index: u64, limit: u64) -> Result<Vec<String>, RegistryError>;

    /// Add a single identifier. The registry verifies the account
    /// behaves as a fungible token before accepting it; verification
    /// failures surface as [`RegistryError::Execution`].
    async fn add(&self, identifier: &str) -> Result<bool, RegistryError>;

    /// Add a batch of identifiers, returning how many were added.
    /// No per-element verification is performed by the registry.
    async fn add_many(&self, identifiers: &[String]) -> Result<u64, RegistryError>;

    /// Generic read-only call against a token contract, parameterized
    /// by method name (`ft_balance_of`, `ft_metadata`).
    async fn view(
        &self,
        identifier: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, RegistryError>;
}

/// On-chain metadata of a fungible token contract.
///
/// Fetched once per entry per sync cycle, never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Protocol tag, e.g. "ft-1.0.0"
    pub spec: String,
    pub name: String,
    pub symbol: String,
    pub icon: Option<String>,
    pub reference: Option<String>,
    pub reference_hash: Option<String>,
    /// Authoritative for converting raw balances to display values
    pub decimals: u32,
}

/// Errors that can occur when talking to the remote registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The registry's own business-rule check rejected the call.
    /// The payload is the raw JSON body of the rejection; the mutation
    /// pipeline inspects it for a machine-readable failure reason.
    #[error("Execution rejected: {payload}")]
    Execution { payload: String },

    #[error("Gateway error {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Decode(err.to_string())
    }
}

//! Registry Gateway Client
//!
//! HTTP implementation of [`RegistryClient`] against a gateway service
//! that holds the wallet session and forwards calls to the chain.
//! Session establishment itself lives in the gateway, not here.

use super::{RegistryClient, RegistryError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client for the registry gateway's REST API
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

/// Configuration for the gateway client
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL for the gateway (e.g., "http://localhost:3030")
    pub base_url: String,
    /// Account id of the registry contract
    pub registry_account: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030".to_string(),
            registry_account: "tokenlist.test".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl GatewayClient {
    /// Create a new gateway client with the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn map_transport(e: reqwest::Error) -> RegistryError {
        if e.is_timeout() {
            RegistryError::Timeout
        } else if e.is_connect() {
            RegistryError::Unavailable
        } else {
            RegistryError::Request(e)
        }
    }
}

#[async_trait]
impl RegistryClient for GatewayClient {
    async fn list(&self, from_index: u64, limit: u64) -> Result<Vec<String>, RegistryError> {
        let url = format!(
            "{}/registry/{}?from_index={}&limit={}",
            self.config.base_url, self.config.registry_account, from_index, limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_transport)?;

        if response.status().is_success() {
            let result: ListResponse = response.json().await.map_err(RegistryError::Request)?;
            Ok(result.tokens)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(RegistryError::Gateway {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn add(&self, identifier: &str) -> Result<bool, RegistryError> {
        let url = format!(
            "{}/registry/{}",
            self.config.base_url, self.config.registry_account
        );

        let body = AddRequest {
            token: identifier.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if status.is_success() {
            let result: AddResponse = response.json().await.map_err(RegistryError::Request)?;
            Ok(result.added)
        } else if status.as_u16() == 422 {
            // The gateway relays the chain's execution failure verbatim
            let payload = response.text().await.unwrap_or_default();
            Err(RegistryError::Execution { payload })
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(RegistryError::Gateway {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn add_many(&self, identifiers: &[String]) -> Result<u64, RegistryError> {
        let url = format!(
            "{}/registry/{}/batch",
            self.config.base_url, self.config.registry_account
        );

        let body = AddManyRequest {
            tokens: identifiers.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if status.is_success() {
            let result: AddManyResponse = response.json().await.map_err(RegistryError::Request)?;
            Ok(result.added)
        } else if status.as_u16() == 422 {
            let payload = response.text().await.unwrap_or_default();
            Err(RegistryError::Execution { payload })
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(RegistryError::Gateway {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn view(
        &self,
        identifier: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, RegistryError> {
        let url = format!("{}/view/{}/{}", self.config.base_url, identifier, method);

        let response = self
            .client
            .post(&url)
            .json(&args)
            .send()
            .await
            .map_err(Self::map_transport)?;

        if response.status().is_success() {
            response.json().await.map_err(RegistryError::Request)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(RegistryError::Gateway {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct AddRequest {
    token: String,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    added: bool,
}

#[derive(Debug, Serialize)]
struct AddManyRequest {
    tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AddManyResponse {
    added: u64,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    tokens: Vec<String>,
}

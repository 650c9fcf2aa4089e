//! Scripted in-memory registry used by the crate's tests.
//!
//! Supports per-identifier latency injection (to scramble completion
//! order), scripted `add` outcomes, and call recording so tests can
//! assert exactly which remote calls were issued.

use super::{RegistryClient, RegistryError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) struct MockRegistry {
    tokens: Mutex<Vec<String>>,
    metadata: Mutex<HashMap<String, Value>>,
    balances: Mutex<HashMap<String, Value>>,
    view_latency: Mutex<HashMap<String, Duration>>,
    /// Scripted outcomes for `add`, consumed front to back.
    /// When empty, `add` appends to `tokens` and returns Ok(true).
    add_script: Mutex<VecDeque<Result<bool, RegistryError>>>,
    /// Extra delay applied to every `add` call
    add_delay: Mutex<Duration>,
    pub list_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    /// (identifier, method) per view call, in issue order
    pub view_calls: Mutex<Vec<(String, String)>>,
}

impl MockRegistry {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Mutex::new(tokens.into_iter().map(Into::into).collect()),
            metadata: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            view_latency: Mutex::new(HashMap::new()),
            add_script: Mutex::new(VecDeque::new()),
            add_delay: Mutex::new(Duration::ZERO),
            list_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            view_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_metadata(self, identifier: &str, decimals: u32) -> Self {
        self.metadata.lock().unwrap().insert(
            identifier.to_string(),
            json!({
                "spec": "ft-1.0.0",
                "name": format!("Token {identifier}"),
                "symbol": identifier.to_uppercase(),
                "icon": null,
                "reference": null,
                "reference_hash": null,
                "decimals": decimals,
            }),
        );
        self
    }

    pub fn with_balance(self, identifier: &str, raw: &str) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert(identifier.to_string(), Value::String(raw.to_string()));
        self
    }

    pub fn with_view_latency(self, identifier: &str, latency: Duration) -> Self {
        self.view_latency
            .lock()
            .unwrap()
            .insert(identifier.to_string(), latency);
        self
    }

    pub fn with_add_delay(self, delay: Duration) -> Self {
        *self.add_delay.lock().unwrap() = delay;
        self
    }

    pub fn script_add(self, outcome: Result<bool, RegistryError>) -> Self {
        self.add_script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn view_methods_for(&self, identifier: &str) -> Vec<String> {
        self.view_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == identifier)
            .map(|(_, method)| method.clone())
            .collect()
    }
}

#[async_trait]
impl RegistryClient for MockRegistry {
    async fn list(&self, from_index: u64, limit: u64) -> Result<Vec<String>, RegistryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let tokens = self.tokens.lock().unwrap();
        let from = from_index as usize;
        let to = (from_index + limit).min(tokens.len() as u64) as usize;
        Ok(tokens.get(from..to).unwrap_or_default().to_vec())
    }

    async fn add(&self, identifier: &str) -> Result<bool, RegistryError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.add_delay.lock().unwrap();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        if let Some(outcome) = self.add_script.lock().unwrap().pop_front() {
            return outcome;
        }
        self.tokens.lock().unwrap().push(identifier.to_string());
        Ok(true)
    }

    async fn add_many(&self, identifiers: &[String]) -> Result<u64, RegistryError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.extend(identifiers.iter().cloned());
        Ok(identifiers.len() as u64)
    }

    async fn view(
        &self,
        identifier: &str,
        method: &str,
        _args: Value,
    ) -> Result<Value, RegistryError> {
        let latency = self
            .view_latency
            .lock()
            .unwrap()
            .get(identifier)
            .copied()
            .unwrap_or(Duration::ZERO);
        if latency > Duration::ZERO {
            tokio::time::sleep(latency).await;
        }

        self.view_calls
            .lock()
            .unwrap()
            .push((identifier.to_string(), method.to_string()));

        match method {
            "ft_metadata" => self
                .metadata
                .lock()
                .unwrap()
                .get(identifier)
                .cloned()
                .ok_or_else(|| RegistryError::Gateway {
                    status: 404,
                    message: format!("no contract at {identifier}"),
                }),
            "ft_balance_of" => Ok(self
                .balances
                .lock()
                .unwrap()
                .get(identifier)
                .cloned()
                .unwrap_or_else(|| Value::String("0".to_string()))),
            other => Err(RegistryError::Gateway {
                status: 400,
                message: format!("unknown view method {other}"),
            }),
        }
    }
}

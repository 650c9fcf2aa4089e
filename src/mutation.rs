//! Registry Mutations
//!
//! Validates and submits new identifiers against the remote registry,
//! classifies the outcome, reports it through the notifier, and always
//! finishes with a full re-sync of the token list - success or not -
//! so the displayed view tracks remote state even when the mutation's
//! own outcome is ambiguous.
//!
//! State machine: Idle -> Submitting -> {Succeeded, Rejected, Failed}
//! -> Idle. While Submitting, the input surface is locked; a second
//! concurrent submission is refused, never queued.

use crate::notify::Notifier;
use crate::registry::{RegistryClient, RegistryError};
use crate::sync::TokenListSync;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// The substring the registry's own verification step puts into
/// `kind.ExecutionError` when the submitted account is not a token
const VERIFICATION_FAILURE: &str = "Unable to get result of token account verification";

const NOT_A_TOKEN_MESSAGE: &str =
    "The provided account ID does not contain a fungible token contract";

/// Classified result of one mutation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The registry accepted the identifier
    Success,
    /// The registry's verification step determined the account does not
    /// implement the fungible token interface
    RejectedNotAToken,
    /// Rejection with an unparseable or unrecognized payload; treated
    /// as potentially indicating a broken session, not a bad input
    UnrecognizedFailure,
}

/// Errors a mutation attempt can surface to the caller
#[derive(Error, Debug)]
pub enum MutationError {
    /// Precondition violation, refused before any remote call
    #[error("Identifier must not be empty")]
    EmptyIdentifier,

    /// A submission is already in flight; the input surface is locked
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// Unclassified remote failure, re-raised for the presentation
    /// layer to surface as a blocking alert
    #[error("Unrecognized registry failure: {0}")]
    Unclassified(#[source] RegistryError),
}

/// Submits validated mutations and keeps the view in sync afterwards
pub struct MutationPipeline {
    client: Arc<dyn RegistryClient>,
    sync: Arc<TokenListSync>,
    notifier: Arc<Notifier>,
    // Held for the whole Submitting phase; try_lock refuses re-entry
    submit_lock: Mutex<()>,
    submitting: AtomicBool,
}

impl MutationPipeline {
    pub fn new(
        client: Arc<dyn RegistryClient>,
        sync: Arc<TokenListSync>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            client,
            sync,
            notifier,
            submit_lock: Mutex::new(()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Whether a submission is in flight. The presentation layer reads
    /// this flag to lock its input surface; the core never touches
    /// presentation state itself.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Submit one identifier to the registry.
    ///
    /// Emits exactly one of: a success notification, a classified
    /// failure notification, or a re-raised [`MutationError::Unclassified`].
    /// The token list re-syncs unconditionally before this returns.
    pub async fn submit(&self, identifier: &str) -> Result<MutationOutcome, MutationError> {
        if identifier.is_empty() {
            return Err(MutationError::EmptyIdentifier);
        }

        let guard = self
            .submit_lock
            .try_lock()
            .map_err(|_| MutationError::SubmissionInProgress)?;
        self.submitting.store(true, Ordering::SeqCst);

        tracing::info!(token = %identifier, "Submitting token to registry");
        let result = self.client.add(identifier).await;

        let outcome = match &result {
            Ok(_) => MutationOutcome::Success,
            Err(err) => classify_rejection(err),
        };

        match outcome {
            MutationOutcome::Success => {
                self.notifier
                    .show(format!("Added {identifier} to the token list"), false)
                    .await;
            }
            MutationOutcome::RejectedNotAToken => {
                tracing::warn!(token = %identifier, "Registry rejected non-token account");
                self.notifier.show(NOT_A_TOKEN_MESSAGE, true).await;
            }
            MutationOutcome::UnrecognizedFailure => {
                // No notification here: the caller owns the blocking alert
                if let Err(err) = &result {
                    tracing::error!(token = %identifier, error = %err, "Unclassified registry failure");
                }
            }
        }

        // Unlock first, then re-sync, in every terminal state
        self.submitting.store(false, Ordering::SeqCst);
        drop(guard);
        self.resync().await;

        match outcome {
            MutationOutcome::UnrecognizedFailure => {
                // result is guaranteed Err on this branch
                let err = result.err().unwrap_or(RegistryError::Unavailable);
                Err(MutationError::Unclassified(err))
            }
            outcome => Ok(outcome),
        }
    }

    /// Bulk entry point over the registry's `add_many`.
    ///
    /// Element-wise empty validation only; the registry performs no
    /// token-interface verification on the bulk path.
    pub async fn submit_many(&self, identifiers: &[String]) -> Result<u64, MutationError> {
        if identifiers.is_empty() || identifiers.iter().any(|id| id.is_empty()) {
            return Err(MutationError::EmptyIdentifier);
        }

        let guard = self
            .submit_lock
            .try_lock()
            .map_err(|_| MutationError::SubmissionInProgress)?;
        self.submitting.store(true, Ordering::SeqCst);

        tracing::info!(count = identifiers.len(), "Submitting token batch to registry");
        let result = self.client.add_many(identifiers).await;

        if let Ok(added) = &result {
            self.notifier
                .show(format!("Added {added} tokens to the token list"), false)
                .await;
        } else if let Err(err) = &result {
            tracing::error!(error = %err, "Batch submission failed");
        }

        self.submitting.store(false, Ordering::SeqCst);
        drop(guard);
        self.resync().await;

        result.map_err(MutationError::Unclassified)
    }

    async fn resync(&self) {
        if let Err(err) = self.sync.refresh().await {
            // The mutation outcome already reached the user; a failed
            // refresh only means the view is stale, not that the
            // mutation failed.
            tracing::warn!(error = %err, "Post-mutation re-sync failed");
        }
    }
}

/// Classify a rejection by its machine-readable failure reason.
///
/// Only a payload that parses as JSON and carries the registry's
/// verification-failure text under `kind.ExecutionError` counts as
/// [`MutationOutcome::RejectedNotAToken`]; everything else - malformed
/// payloads included - is unrecognized.
fn classify_rejection(err: &RegistryError) -> MutationOutcome {
    let RegistryError::Execution { payload } = err else {
        return MutationOutcome::UnrecognizedFailure;
    };

    let Ok(parsed) = serde_json::from_str::<Value>(payload) else {
        return MutationOutcome::UnrecognizedFailure;
    };

    match parsed.pointer("/kind/ExecutionError").and_then(Value::as_str) {
        Some(reason) if reason.contains(VERIFICATION_FAILURE) => {
            MutationOutcome::RejectedNotAToken
        }
        _ => MutationOutcome::UnrecognizedFailure,
    }
}

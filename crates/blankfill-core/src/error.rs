// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Blankfill service.

use thiserror::Error;

use crate::types::RequestStatus;

/// Boxed error source carried by backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all Blankfill adapter traits and core operations.
#[derive(Debug, Error)]
pub enum BlankfillError {
    /// Configuration errors (invalid TOML, missing model files, bad secrets).
    #[error("configuration error: {0}")]
    Config(String),

    /// The submitted sentence or client tag violates an input rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// No request with the given identifier is stored.
    #[error("request {id} does not exist")]
    NotFound { id: String },

    /// A request with the same identifier is already stored.
    #[error("request {id} already exists")]
    DuplicateKey { id: String },

    /// The store failed while creating a new request.
    #[error("unexpected storage error while creating request: {source}")]
    UnexpectedStore { source: BoxError },

    /// The store failed while mutating a request that already exists.
    #[error("critical storage error: {message}: {source}")]
    CriticalStore { message: String, source: BoxError },

    /// Other storage backend errors (connection, reads, row decoding).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// A status change that does not move the request forward.
    #[error("request {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Results may only be written while a request is running.
    #[error("results of request {id} cannot be written in status {status}")]
    ResultsNotWritable { id: String, status: RequestStatus },

    /// The inference pipeline failed (model load, tokenization, session run).
    #[error("inference error: {message}")]
    Inference {
        message: String,
        source: Option<BoxError>,
    },

    /// Internal errors that indicate bugs or unexpected states.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlankfillError {
    /// Shorthand for an inference error without an underlying source.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotFound { .. }
                | Self::InvalidTransition { .. }
                | Self::ResultsNotWritable { .. }
        )
    }
}

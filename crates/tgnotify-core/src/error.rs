// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for tgnotify.

use thiserror::Error;

/// The primary error type used across all adapter traits and the dispatch pipeline.
///
/// None of these are fatal once the process is running; the consumer logs
/// the error and moves on to the next event. Only startup code treats them
/// as terminal.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Configuration errors (missing credentials, malformed DSNs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection failure, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A change event or row payload could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A row that must exist was absent.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Enrichment lookup failed for a reason other than a missing row.
    #[error("lookup error: {message}")]
    Lookup {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Delivery transport errors (Telegram API unreachable, bad request).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Event stream transport errors.
    #[error("stream error: {message}")]
    Stream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external call exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NotifyError {
    /// Wraps a serde_json failure as a decode error with context.
    pub fn decode(message: impl Into<String>, source: serde_json::Error) -> Self {
        NotifyError::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps a failed enrichment query. Missing rows use [`NotifyError::NotFound`].
    pub fn lookup<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NotifyError::Lookup {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps any storage-layer error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NotifyError::Storage {
            source: Box::new(source),
        }
    }
}

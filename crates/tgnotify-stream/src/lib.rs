// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-event stream consumption.
//!
//! [`consumer::run`] pulls one message at a time from an [`EventSource`],
//! routes it by topic and hands it to the dispatcher. [`kafka::KafkaSource`]
//! is the production source.

pub mod consumer;
pub mod kafka;
pub mod router;

use async_trait::async_trait;

use tgnotify_core::NotifyError;

pub use consumer::{handle_message, run};
pub use kafka::{KafkaSettings, KafkaSource};
pub use router::TopicRouter;

/// One message read from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Empty for tombstones and heartbeats.
    pub payload: Vec<u8>,
}

/// A source of stream messages.
///
/// `next` returns `Err` for transport failures; the consumer logs them and
/// keeps reading.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn next(&self) -> Result<StreamMessage, NotifyError>;
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery sink.
//!
//! `MockSink` captures every delivery attempt. Outcomes default to
//! [`DeliveryOutcome::Sent`] and can be scripted per chat.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tgnotify_core::{
    AdapterType, ChatId, DeliveryOutcome, DeliverySink, HealthStatus, NotifyError, PluginAdapter,
};

/// One captured delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub chat_id: ChatId,
    pub text: String,
    /// `true` when sent through [`DeliverySink::deliver`] (HTML parse mode).
    pub html: bool,
}

/// A [`DeliverySink`] that records attempts instead of sending them.
#[derive(Clone, Default)]
pub struct MockSink {
    attempts: Arc<Mutex<Vec<Delivery>>>,
    outcomes: Arc<Mutex<HashMap<ChatId, DeliveryOutcome>>>,
    stalled: Arc<Mutex<HashSet<ChatId>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attempt to `chat_id` will report `outcome`.
    pub async fn script(&self, chat_id: i64, outcome: DeliveryOutcome) {
        self.outcomes.lock().await.insert(ChatId(chat_id), outcome);
    }

    /// Attempts to `chat_id` will hang for an hour before answering.
    pub async fn stall(&self, chat_id: i64) {
        self.stalled.lock().await.insert(ChatId(chat_id));
    }

    /// All attempts, in the order they started.
    pub async fn attempts(&self) -> Vec<Delivery> {
        self.attempts.lock().await.clone()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }

    /// Chats that received a message with outcome `Sent`.
    pub async fn delivered_to(&self) -> Vec<ChatId> {
        let outcomes = self.outcomes.lock().await;
        let mut chats: Vec<ChatId> = self
            .attempts
            .lock()
            .await
            .iter()
            .map(|d| d.chat_id)
            .filter(|c| outcomes.get(c).is_none_or(|o| *o == DeliveryOutcome::Sent))
            .collect();
        chats.sort();
        chats
    }

    async fn record(&self, chat_id: ChatId, text: &str, html: bool) -> DeliveryOutcome {
        self.attempts.lock().await.push(Delivery {
            chat_id,
            text: text.to_string(),
            html,
        });
        let stalled = self.stalled.lock().await.contains(&chat_id);
        if stalled {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.outcomes
            .lock()
            .await
            .get(&chat_id)
            .cloned()
            .unwrap_or(DeliveryOutcome::Sent)
    }
}

#[async_trait]
impl PluginAdapter for MockSink {
    fn name(&self) -> &str {
        "mock-sink"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DeliverySink for MockSink {
    async fn deliver(&self, chat_id: ChatId, html: &str) -> DeliveryOutcome {
        self.record(chat_id, html, true).await
    }

    async fn deliver_plain(&self, chat_id: ChatId, text: &str) -> DeliveryOutcome {
        self.record(chat_id, text, false).await
    }
}

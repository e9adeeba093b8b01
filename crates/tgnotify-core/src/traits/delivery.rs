// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery sink trait for pushing rendered text into a chat.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, DeliveryOutcome};

/// Delivers rendered Telegram HTML to a single chat.
///
/// Delivery never returns an error: every failure is classified into
/// [`DeliveryOutcome::RecipientGone`] or [`DeliveryOutcome::TransientFailure`].
#[async_trait]
pub trait DeliverySink: PluginAdapter {
    /// Sends `html` to `chat_id` using the HTML parse mode.
    async fn deliver(&self, chat_id: ChatId, html: &str) -> DeliveryOutcome;

    /// Sends plain text to `chat_id`, with no markup parsing.
    async fn deliver_plain(&self, chat_id: ChatId, text: &str) -> DeliveryOutcome;
}

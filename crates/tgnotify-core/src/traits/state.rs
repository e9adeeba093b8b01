// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived OAuth state store.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ChatId;

/// Maps an opaque OAuth `state` token to the chat that requested it.
#[async_trait]
pub trait OAuthStateStore: PluginAdapter {
    /// Stores `chat_id` under `state` for `ttl`.
    async fn put(&self, state: &str, chat_id: ChatId, ttl: Duration) -> Result<(), NotifyError>;

    /// Removes and returns the chat stored under `state`. A state can be
    /// taken once.
    async fn take(&self, state: &str) -> Result<Option<ChatId>, NotifyError>;
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat directory trait: which Telegram chats are linked to which account.

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, LinkedChat, UserId};

/// Store of chat ↔ account links.
///
/// The dispatch engine only uses [`linked_chats`](Self::linked_chats) and
/// [`disable_chat`](Self::disable_chat). The remaining methods serve the
/// bot commands and the OAuth callback.
#[async_trait]
pub trait ChatDirectory: PluginAdapter {
    /// Returns the ids of all enabled chats linked to `user_id`.
    async fn linked_chats(&self, user_id: UserId) -> Result<Vec<ChatId>, NotifyError>;

    /// Marks every link of `chat_id` as disabled.
    async fn disable_chat(&self, chat_id: ChatId) -> Result<(), NotifyError>;

    /// Links `chat_id` to `user_id`, re-enabling the pair if it already exists.
    async fn link_chat(&self, chat_id: ChatId, user_id: UserId) -> Result<(), NotifyError>;

    /// Removes every link of `chat_id`. Returns the number of removed links.
    async fn unlink_chat(&self, chat_id: ChatId) -> Result<u64, NotifyError>;

    /// Returns the enabled link for `chat_id`, if any.
    async fn find_link(&self, chat_id: ChatId) -> Result<Option<LinkedChat>, NotifyError>;
}

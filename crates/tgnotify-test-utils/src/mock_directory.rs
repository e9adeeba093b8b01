// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat directory backed by a vector of links.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tgnotify_core::{
    AdapterType, ChatDirectory, ChatId, HealthStatus, LinkedChat, NotifyError, PluginAdapter,
    UserId,
};

/// An in-memory [`ChatDirectory`].
#[derive(Clone, Default)]
pub struct MockDirectory {
    links: Arc<Mutex<Vec<LinkedChat>>>,
    lookups: Arc<AtomicUsize>,
    fail_lookups: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory where `user_id` is linked to each of `chats`.
    pub fn with_user(user_id: i64, chats: &[i64]) -> Self {
        let links = chats
            .iter()
            .map(|&chat| LinkedChat {
                chat_id: ChatId(chat),
                user_id: UserId(user_id),
                disabled: false,
            })
            .collect();
        Self {
            links: Arc::new(Mutex::new(links)),
            ..Self::default()
        }
    }

    /// Makes every `linked_chats` call fail with a storage error.
    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    /// Makes every `linked_chats` call sleep before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Number of `linked_chats` calls so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Chat ids whose links have been disabled.
    pub async fn disabled_chats(&self) -> Vec<ChatId> {
        let links = self.links.lock().await;
        let mut ids: Vec<ChatId> = links.iter().filter(|l| l.disabled).map(|l| l.chat_id).collect();
        ids.dedup();
        ids
    }

    /// A snapshot of every stored link.
    pub async fn links(&self) -> Vec<LinkedChat> {
        self.links.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockDirectory {
    fn name(&self) -> &str {
        "mock-directory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Directory
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatDirectory for MockDirectory {
    async fn linked_chats(&self, user_id: UserId) -> Result<Vec<ChatId>, NotifyError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(NotifyError::storage(std::io::Error::other("directory unavailable")));
        }
        Ok(self
            .links
            .lock()
            .await
            .iter()
            .filter(|l| l.user_id == user_id && !l.disabled)
            .map(|l| l.chat_id)
            .collect())
    }

    async fn disable_chat(&self, chat_id: ChatId) -> Result<(), NotifyError> {
        for link in self.links.lock().await.iter_mut().filter(|l| l.chat_id == chat_id) {
            link.disabled = true;
        }
        Ok(())
    }

    async fn link_chat(&self, chat_id: ChatId, user_id: UserId) -> Result<(), NotifyError> {
        let mut links = self.links.lock().await;
        match links
            .iter_mut()
            .find(|l| l.chat_id == chat_id && l.user_id == user_id)
        {
            Some(existing) => existing.disabled = false,
            None => links.push(LinkedChat {
                chat_id,
                user_id,
                disabled: false,
            }),
        }
        Ok(())
    }

    async fn unlink_chat(&self, chat_id: ChatId) -> Result<u64, NotifyError> {
        let mut links = self.links.lock().await;
        let before = links.len();
        links.retain(|l| l.chat_id != chat_id);
        Ok((before - links.len()) as u64)
    }

    async fn find_link(&self, chat_id: ChatId) -> Result<Option<LinkedChat>, NotifyError> {
        Ok(self
            .links
            .lock()
            .await
            .iter()
            .find(|l| l.chat_id == chat_id && !l.disabled)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_chats_drop_out_of_lookups() {
        let dir = MockDirectory::with_user(1, &[10, 11]);
        dir.disable_chat(ChatId(10)).await.unwrap();
        assert_eq!(dir.linked_chats(UserId(1)).await.unwrap(), vec![ChatId(11)]);
        assert_eq!(dir.disabled_chats().await, vec![ChatId(10)]);
        assert_eq!(dir.lookup_count(), 1);
    }

    #[tokio::test]
    async fn relinking_reenables() {
        let dir = MockDirectory::with_user(1, &[10]);
        dir.disable_chat(ChatId(10)).await.unwrap();
        dir.link_chat(ChatId(10), UserId(1)).await.unwrap();
        assert_eq!(dir.links().await.len(), 1);
        assert!(dir.find_link(ChatId(10)).await.unwrap().is_some());
    }
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock OAuth state store. TTLs are recorded but never enforced.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tgnotify_core::{
    AdapterType, ChatId, HealthStatus, NotifyError, OAuthStateStore, PluginAdapter,
};

#[derive(Clone, Default)]
pub struct MockStateStore {
    entries: Arc<Mutex<HashMap<String, (ChatId, Duration)>>>,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending states with their chat and TTL.
    pub async fn entries(&self) -> HashMap<String, (ChatId, Duration)> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockStateStore {
    fn name(&self) -> &str {
        "mock-state"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::StateStore
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl OAuthStateStore for MockStateStore {
    async fn put(&self, state: &str, chat_id: ChatId, ttl: Duration) -> Result<(), NotifyError> {
        self.entries
            .lock()
            .await
            .insert(state.to_string(), (chat_id, ttl));
        Ok(())
    }

    async fn take(&self, state: &str) -> Result<Option<ChatId>, NotifyError> {
        Ok(self.entries.lock().await.remove(state).map(|(chat, _)| chat))
    }
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis implementation of [`OAuthStateStore`].
//!
//! Values are JSON `{"chat_id": <id>}` under `tg-bot-oauth:<state>`, so a
//! rolling deploy can read states written by the previous bot.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::Client;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use tracing::info;

use tgnotify_core::{
    AdapterType, ChatId, HealthStatus, NotifyError, OAuthStateStore, PluginAdapter,
};

use crate::dsn::mask_dsn;

const KEY_PREFIX: &str = "tg-bot-oauth:";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct StoredState {
    chat_id: i64,
}

/// Redis key holding `state`.
pub fn state_key(state: &str) -> String {
    format!("{KEY_PREFIX}{state}")
}

fn encode(chat_id: ChatId) -> Result<String, NotifyError> {
    serde_json::to_string(&StoredState { chat_id: chat_id.0 })
        .map_err(|e| NotifyError::Internal(e.to_string()))
}

fn decode(raw: &str) -> Result<ChatId, NotifyError> {
    serde_json::from_str::<StoredState>(raw)
        .map(|s| ChatId(s.chat_id))
        .map_err(|e| NotifyError::decode("invalid oauth state value", e))
}

/// OAuth states with expiry, taken with `GETDEL`.
#[derive(Clone)]
pub struct RedisStateStore {
    conn: ConnectionManager,
}

impl RedisStateStore {
    pub async fn connect(dsn: &str) -> Result<Self, NotifyError> {
        info!(dsn = %mask_dsn(dsn), "connecting to redis");
        let client = Client::open(dsn).map_err(NotifyError::storage)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(NotifyError::storage)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl PluginAdapter for RedisStateStore {
    fn name(&self) -> &str {
        "redis"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::StateStore
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        let mut conn = self.conn.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl OAuthStateStore for RedisStateStore {
    async fn put(&self, state: &str, chat_id: ChatId, ttl: Duration) -> Result<(), NotifyError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(state_key(state), encode(chat_id)?, ttl.as_secs().max(1))
            .await
            .map_err(NotifyError::storage)?;
        Ok(())
    }

    async fn take(&self, state: &str) -> Result<Option<ChatId>, NotifyError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get_del(state_key(state))
            .await
            .map_err(NotifyError::storage)?;
        raw.as_deref().map(decode).transpose()
    }
}

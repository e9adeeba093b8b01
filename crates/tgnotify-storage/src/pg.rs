// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postgres implementation of [`ChatDirectory`].

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use tgnotify_core::{
    AdapterType, ChatDirectory, ChatId, HealthStatus, LinkedChat, NotifyError, PluginAdapter,
    UserId,
};

use crate::dsn::mask_dsn;

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS telegram_notify_chat (
    chat_id bigint,
    user_id bigint,
    disabled int2,
    primary key (chat_id, user_id)
)";

/// Chat links stored in `telegram_notify_chat`.
#[derive(Debug, Clone)]
pub struct PgChatDirectory {
    pool: PgPool,
}

impl PgChatDirectory {
    /// Connects, then creates the link table if it does not exist.
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self, NotifyError> {
        info!(dsn = %mask_dsn(dsn), "connecting to postgres");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(dsn)
            .await
            .map_err(NotifyError::storage)?;

        let directory = Self { pool };
        directory.init_schema().await?;
        Ok(directory)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<(), NotifyError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(NotifyError::storage)?;
        debug!("telegram_notify_chat table ready");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for PgChatDirectory {
    fn name(&self) -> &str {
        "postgres"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Directory
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl ChatDirectory for PgChatDirectory {
    async fn linked_chats(&self, user_id: UserId) -> Result<Vec<ChatId>, NotifyError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT chat_id FROM telegram_notify_chat WHERE user_id = $1 AND disabled = 0",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(NotifyError::storage)?;
        Ok(ids.into_iter().map(ChatId).collect())
    }

    async fn disable_chat(&self, chat_id: ChatId) -> Result<(), NotifyError> {
        sqlx::query("UPDATE telegram_notify_chat SET disabled = 1 WHERE chat_id = $1")
            .bind(chat_id.0)
            .execute(&self.pool)
            .await
            .map_err(NotifyError::storage)?;
        Ok(())
    }

    async fn link_chat(&self, chat_id: ChatId, user_id: UserId) -> Result<(), NotifyError> {
        sqlx::query(
            "INSERT INTO telegram_notify_chat (chat_id, user_id, disabled) VALUES ($1, $2, 0) \
             ON CONFLICT (chat_id, user_id) DO UPDATE SET disabled = 0",
        )
        .bind(chat_id.0)
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(NotifyError::storage)?;
        Ok(())
    }

    async fn unlink_chat(&self, chat_id: ChatId) -> Result<u64, NotifyError> {
        let result = sqlx::query("DELETE FROM telegram_notify_chat WHERE chat_id = $1")
            .bind(chat_id.0)
            .execute(&self.pool)
            .await
            .map_err(NotifyError::storage)?;
        Ok(result.rows_affected())
    }

    async fn find_link(&self, chat_id: ChatId) -> Result<Option<LinkedChat>, NotifyError> {
        let row: Option<(i64, i64, i16)> = sqlx::query_as(
            "SELECT chat_id, user_id, disabled FROM telegram_notify_chat \
             WHERE chat_id = $1 AND disabled = 0 LIMIT 1",
        )
        .bind(chat_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(NotifyError::storage)?;

        Ok(row.map(|(chat_id, user_id, disabled)| LinkedChat {
            chat_id: ChatId(chat_id),
            user_id: UserId(user_id),
            disabled: disabled != 0,
        }))
    }
}

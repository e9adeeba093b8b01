// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MySQL implementation of [`EnrichmentGateway`] over the site schema.

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

use tgnotify_core::{
    AdapterType, EnrichmentGateway, HealthStatus, Member, NotifyError, NotifyField,
    PluginAdapter, UserId,
};

use crate::dsn::mask_dsn;

// Site ids are unsigned columns; cast so they decode as i64.
const MEMBER_QUERY: &str = "SELECT CAST(uid AS SIGNED), username, nickname \
                            FROM chii_members WHERE uid = ? LIMIT 1";
const FIELD_QUERY: &str = "SELECT CAST(ntf_id AS SIGNED), CAST(ntf_hash AS SIGNED), \
                           CAST(ntf_rid AS SIGNED), ntf_title \
                           FROM chii_notify_field WHERE ntf_id = ? LIMIT 1";

fn query_failed(entity: &'static str, id: i64) -> impl FnOnce(sqlx::Error) -> NotifyError {
    move |e| NotifyError::lookup(format!("{entity} {id} query failed"), e)
}

/// Read-only member and notification field lookups.
#[derive(Debug, Clone)]
pub struct MysqlEnrichment {
    pool: MySqlPool,
}

impl MysqlEnrichment {
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self, NotifyError> {
        info!(dsn = %mask_dsn(dsn), "connecting to mysql");
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(dsn)
            .await
            .map_err(NotifyError::storage)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PluginAdapter for MysqlEnrichment {
    fn name(&self) -> &str {
        "mysql"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Enrichment
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl EnrichmentGateway for MysqlEnrichment {
    async fn member(&self, user_id: UserId) -> Result<Member, NotifyError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(MEMBER_QUERY)
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("member", user_id.0))?;

        let (uid, username, nickname) = row.ok_or(NotifyError::NotFound {
            entity: "member",
            id: user_id.0,
        })?;
        Ok(Member {
            uid: UserId(uid),
            username,
            nickname,
        })
    }

    async fn notify_field(&self, field_id: i64) -> Result<NotifyField, NotifyError> {
        let row: Option<(i64, i64, i64, String)> = sqlx::query_as(FIELD_QUERY)
            .bind(field_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("notify field", field_id))?;

        let (id, hash, rid, title) = row.ok_or(NotifyError::NotFound {
            entity: "notify field",
            id: field_id,
        })?;
        Ok(NotifyField {
            id,
            hash,
            rid,
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failure_is_a_lookup_error() {
        let err = query_failed("member", 42)(sqlx::Error::PoolTimedOut);
        match err {
            NotifyError::Lookup { message, source } => {
                assert_eq!(message, "member 42 query failed");
                assert!(source.is_some());
            }
            other => panic!("expected Lookup, got {other:?}"),
        }
    }

    #[test]
    fn query_failure_names_the_field() {
        let err = query_failed("notify field", 350)(sqlx::Error::PoolClosed);
        assert_eq!(err.to_string(), "lookup error: notify field 350 query failed");
    }
}

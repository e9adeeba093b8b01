// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock enrichment gateway.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tgnotify_core::{
    AdapterType, EnrichmentGateway, HealthStatus, Member, NotifyError, NotifyField,
    PluginAdapter, UserId,
};

/// An in-memory [`EnrichmentGateway`]. Unknown ids answer `NotFound`.
#[derive(Clone, Default)]
pub struct MockEnrichment {
    members: Arc<Mutex<HashMap<UserId, Member>>>,
    fields: Arc<Mutex<HashMap<i64, NotifyField>>>,
    member_calls: Arc<AtomicUsize>,
    field_calls: Arc<AtomicUsize>,
}

impl MockEnrichment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member whose nickname is `nickname`.
    pub async fn add_member(&self, uid: i64, nickname: &str) {
        self.members.lock().await.insert(
            UserId(uid),
            Member {
                uid: UserId(uid),
                username: format!("user{uid}"),
                nickname: nickname.to_string(),
            },
        );
    }

    /// Registers a notification field.
    pub async fn add_field(&self, id: i64, hash: i64, rid: i64, title: &str) {
        self.fields.lock().await.insert(
            id,
            NotifyField {
                id,
                hash,
                rid,
                title: title.to_string(),
            },
        );
    }

    pub fn member_calls(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.load(Ordering::SeqCst)
    }

    /// Total lookups of either kind.
    pub fn total_calls(&self) -> usize {
        self.member_calls() + self.field_calls()
    }
}

#[async_trait]
impl PluginAdapter for MockEnrichment {
    fn name(&self) -> &str {
        "mock-enrichment"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Enrichment
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EnrichmentGateway for MockEnrichment {
    async fn member(&self, user_id: UserId) -> Result<Member, NotifyError> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);
        self.members
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(NotifyError::NotFound {
                entity: "member",
                id: user_id.0,
            })
    }

    async fn notify_field(&self, field_id: i64) -> Result<NotifyField, NotifyError> {
        self.field_calls.fetch_add(1, Ordering::SeqCst);
        self.fields
            .lock()
            .await
            .get(&field_id)
            .cloned()
            .ok_or(NotifyError::NotFound {
                entity: "notify field",
                id: field_id,
            })
    }
}

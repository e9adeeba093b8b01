// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enrichment gateway trait for site-side lookups.

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Member, NotifyField, UserId};

/// Read-only access to the site database.
///
/// Missing rows must surface as [`NotifyError::NotFound`], never as a
/// default-valued record.
#[async_trait]
pub trait EnrichmentGateway: PluginAdapter {
    /// Resolves a member by uid.
    async fn member(&self, user_id: UserId) -> Result<Member, NotifyError>;

    /// Resolves a notification field row by id.
    async fn notify_field(&self, field_id: i64) -> Result<NotifyField, NotifyError>;
}

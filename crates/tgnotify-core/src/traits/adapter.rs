// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all adapters must implement.

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all tgnotify adapters.
///
/// Provides identity and health check capabilities used by the gateway's
/// `/health` endpoint and by startup logging.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    /// Returns the role this adapter plays.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, NotifyError>;
}

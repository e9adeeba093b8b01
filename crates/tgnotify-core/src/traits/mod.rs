// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod delivery;
pub mod directory;
pub mod enrichment;
pub mod state;

pub use adapter::PluginAdapter;
pub use delivery::DeliverySink;
pub use directory::ChatDirectory;
pub use enrichment::EnrichmentGateway;
pub use state::OAuthStateStore;

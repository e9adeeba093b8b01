// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for tgnotify.
//!
//! This crate provides the trait seams, error type, and shared domain types
//! used throughout the workspace. The dispatch pipeline only ever talks to
//! the traits defined here; Postgres, MySQL, Redis, and Telegram live behind
//! them in their own crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NotifyError;
pub use types::{
    AdapterType, ChatId, DeliveryOutcome, HealthStatus, LinkedChat, Member, NotifyField, UserId,
};

// Re-export all adapter traits at crate root.
pub use traits::{ChatDirectory, DeliverySink, EnrichmentGateway, OAuthStateStore, PluginAdapter};

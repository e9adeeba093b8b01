// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapters for tgnotify.
//!
//! - [`PgChatDirectory`]: the `telegram_notify_chat` link table in Postgres.
//! - [`MysqlEnrichment`]: read-only lookups against the site's MySQL database.
//! - [`RedisStateStore`]: short-lived OAuth state in Redis.

pub mod dsn;
pub mod mysql;
pub mod pg;
pub mod redis_state;

pub use dsn::mask_dsn;
pub use mysql::MysqlEnrichment;
pub use pg::PgChatDirectory;
pub use redis_state::RedisStateStore;

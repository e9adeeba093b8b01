// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory adapters for tgnotify tests.
//!
//! Every mock is cheaply cloneable: clones share state, so a test can hand
//! one clone to the code under test and keep another for assertions.
//!
//! # Components
//!
//! - [`MockDirectory`] - chat links with call counting and disable tracking
//! - [`MockEnrichment`] - members and notification fields
//! - [`MockSink`] - captured deliveries with scripted per-chat outcomes
//! - [`MockStateStore`] - OAuth state map

pub mod mock_directory;
pub mod mock_enrichment;
pub mod mock_sink;
pub mod mock_state;

pub use mock_directory::MockDirectory;
pub use mock_enrichment::MockEnrichment;
pub use mock_sink::{Delivery, MockSink};
pub use mock_state::MockStateStore;

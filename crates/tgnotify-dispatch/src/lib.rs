// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification dispatch pipeline for tgnotify.
//!
//! Turns change events from the site database into Telegram messages:
//! [`envelope`] decodes the capture format, [`rules`] maps notification
//! types to their presentation, [`markup`] renders Telegram HTML and
//! [`engine`] ties them together with the directory, enrichment and
//! delivery adapters.

pub mod engine;
pub mod envelope;
pub mod markup;
pub mod outcome;
pub mod rows;
pub mod rules;

pub use engine::{DispatchSettings, Dispatcher, EventKind};
pub use envelope::{Envelope, Operation, decode};
pub use outcome::{DispatchReport, FanOutSummary, SkipReason};
pub use rules::{NotifyRule, lookup};

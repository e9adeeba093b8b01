// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What happened to one change event.

use crate::envelope::Operation;

/// Why an event was dropped without delivering anything. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty stream message.
    Heartbeat,
    NotCreate(Operation),
    EmptyPayload,
    Stale { age_ms: i64 },
    NoLinkedChats,
    UnknownRule(i64),
}

impl SkipReason {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Heartbeat => "heartbeat",
            SkipReason::NotCreate(_) => "not_create",
            SkipReason::EmptyPayload => "empty_payload",
            SkipReason::Stale { .. } => "stale",
            SkipReason::NoLinkedChats => "no_linked_chats",
            SkipReason::UnknownRule(_) => "unknown_rule",
        }
    }
}

/// Per-outcome counts for one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutSummary {
    pub sent: usize,
    pub gone: usize,
    pub failed: usize,
}

impl FanOutSummary {
    pub fn attempts(&self) -> usize {
        self.sent + self.gone + self.failed
    }
}

/// Result of handling one event that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReport {
    Skipped(SkipReason),
    Delivered(FanOutSummary),
}

impl DispatchReport {
    pub fn label(&self) -> &'static str {
        match self {
            DispatchReport::Skipped(reason) => reason.label(),
            DispatchReport::Delivered(_) => "delivered",
        }
    }

    /// The fan-out counts, or `None` when the event was skipped.
    pub fn summary(&self) -> Option<FanOutSummary> {
        match self {
            DispatchReport::Delivered(summary) => Some(*summary),
            DispatchReport::Skipped(_) => None,
        }
    }
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed row snapshots carried in `after` payloads.
//!
//! Every field the pipeline reads is required: a snapshot missing one is a
//! decode error, never a zero value. Columns the pipeline ignores are not
//! declared and are skipped during deserialization.

use serde::Deserialize;

use tgnotify_core::UserId;

/// A `chii_pms` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrivateMessageRow {
    pub msg_id: i64,
    /// Sender uid.
    pub msg_sid: i64,
    /// Recipient uid.
    pub msg_rid: i64,
}

impl PrivateMessageRow {
    pub fn sender(&self) -> UserId {
        UserId(self.msg_sid)
    }

    pub fn recipient(&self) -> UserId {
        UserId(self.msg_rid)
    }
}

/// A `chii_notify` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationRow {
    /// Recipient uid.
    pub nt_uid: i64,
    pub nt_from_uid: i64,
    pub nt_type: i64,
    /// `chii_notify_field.ntf_id` of the target.
    pub nt_mid: i64,
    /// Post inside the target, `0` when the notification points at the target itself.
    pub nt_related_id: i64,
}

impl NotificationRow {
    pub fn recipient(&self) -> UserId {
        UserId(self.nt_uid)
    }

    pub fn sender(&self) -> UserId {
        UserId(self.nt_from_uid)
    }
}

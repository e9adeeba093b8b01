// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapter traits and the dispatch pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Site account identifier (`uid` on the site side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Telegram chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Directory,
    Enrichment,
    Delivery,
    StateStore,
    Observability,
}

/// A durable link between a Telegram chat and a site account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedChat {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub disabled: bool,
}

/// A site member as seen by the enrichment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub uid: UserId,
    pub username: String,
    pub nickname: String,
}

impl Member {
    /// Name shown to the recipient. Falls back to the username when the
    /// nickname is blank.
    pub fn display_name(&self) -> &str {
        if self.nickname.trim().is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }
}

/// A notification field row: the shared title/target of a notification family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyField {
    pub id: i64,
    pub hash: i64,
    pub rid: i64,
    pub title: String,
}

/// The result of one delivery attempt to one chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The message was accepted by the platform.
    Sent,
    /// The chat can never receive messages again; the link should be disabled.
    RecipientGone,
    /// The attempt failed but the chat may work later.
    TransientFailure(String),
}

impl DeliveryOutcome {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Sent => "sent",
            DeliveryOutcome::RecipientGone => "recipient_gone",
            DeliveryOutcome::TransientFailure(_) => "transient_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_nickname() {
        let m = Member {
            uid: UserId(1),
            username: "sai".into(),
            nickname: "Sai".into(),
        };
        assert_eq!(m.display_name(), "Sai");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let m = Member {
            uid: UserId(1),
            username: "sai".into(),
            nickname: "  ".into(),
        };
        assert_eq!(m.display_name(), "sai");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&ChatId(-100123)).unwrap();
        assert_eq!(json, "-100123");
        let uid: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(uid, UserId(7));
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(DeliveryOutcome::Sent.label(), "sent");
        assert_eq!(DeliveryOutcome::RecipientGone.label(), "recipient_gone");
        assert_eq!(
            DeliveryOutcome::TransientFailure("x".into()).label(),
            "transient_failure"
        );
    }
}

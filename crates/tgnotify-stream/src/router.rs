// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tgnotify_dispatch::EventKind;

/// Maps topic names to the event kind they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRouter {
    pub pm_topic: String,
    pub notify_topic: String,
}

impl TopicRouter {
    pub fn new(pm_topic: impl Into<String>, notify_topic: impl Into<String>) -> Self {
        Self {
            pm_topic: pm_topic.into(),
            notify_topic: notify_topic.into(),
        }
    }

    /// The kind of events on `topic`, or `None` for topics we don't consume.
    pub fn route(&self, topic: &str) -> Option<EventKind> {
        if topic == self.pm_topic {
            Some(EventKind::PrivateMessage)
        } else if topic == self.notify_topic {
            Some(EventKind::Notification)
        } else {
            None
        }
    }

    /// Topics to subscribe to.
    pub fn topics(&self) -> [&str; 2] {
        [&self.pm_topic, &self.notify_topic]
    }
}

impl Default for TopicRouter {
    fn default() -> Self {
        Self::new(
            "debezium.chii.bangumi.chii_pms",
            "debezium.chii.bangumi.chii_notify",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_topics() {
        let router = TopicRouter::default();
        assert_eq!(
            router.route("debezium.chii.bangumi.chii_pms"),
            Some(EventKind::PrivateMessage)
        );
        assert_eq!(
            router.route("debezium.chii.bangumi.chii_notify"),
            Some(EventKind::Notification)
        );
        assert_eq!(router.route("debezium.chii.bangumi.chii_members"), None);
    }
}

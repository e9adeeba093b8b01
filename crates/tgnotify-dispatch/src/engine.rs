// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch engine: gate, enrich, render and fan out one change event.
//!
//! Every external call is bounded by [`DispatchSettings::call_timeout`].
//! Lookups that fail or time out abandon the event and are returned to the
//! caller; delivery failures are isolated per chat and never abort the event.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, info, warn};

use tgnotify_core::{
    ChatDirectory, ChatId, DeliveryOutcome, DeliverySink, EnrichmentGateway, NotifyError,
};

use crate::envelope::{self, Envelope};
use crate::markup::{self, SiteRoots};
use crate::outcome::{DispatchReport, FanOutSummary, SkipReason};
use crate::rows::{NotificationRow, PrivateMessageRow};
use crate::rules;

/// Which table a change event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PrivateMessage,
    Notification,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::PrivateMessage => "private_message",
            EventKind::Notification => "notification",
        }
    }
}

/// Tuning for the engine.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Events older than this are dropped.
    pub freshness: Duration,
    /// Deadline for each directory, enrichment or delivery call.
    pub call_timeout: Duration,
    /// Maximum concurrent deliveries for one event.
    pub concurrency: usize,
    pub roots: SiteRoots,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            freshness: Duration::from_secs(120),
            call_timeout: Duration::from_secs(10),
            concurrency: 8,
            roots: SiteRoots::default(),
        }
    }
}

/// Routes change events to linked Telegram chats.
pub struct Dispatcher {
    directory: Arc<dyn ChatDirectory>,
    enrichment: Arc<dyn EnrichmentGateway>,
    sink: Arc<dyn DeliverySink>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        directory: Arc<dyn ChatDirectory>,
        enrichment: Arc<dyn EnrichmentGateway>,
        sink: Arc<dyn DeliverySink>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            directory,
            enrichment,
            sink,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Decodes and handles one raw stream message.
    pub async fn dispatch(
        &self,
        kind: EventKind,
        raw: &[u8],
    ) -> Result<DispatchReport, NotifyError> {
        self.dispatch_at(kind, raw, now_ms()).await
    }

    /// [`Self::dispatch`] with an explicit processing time.
    pub async fn dispatch_at(
        &self,
        kind: EventKind,
        raw: &[u8],
        now_ms: i64,
    ) -> Result<DispatchReport, NotifyError> {
        let result = match envelope::decode(raw) {
            Ok(None) => Ok(DispatchReport::Skipped(SkipReason::Heartbeat)),
            Ok(Some(envelope)) => match kind {
                EventKind::PrivateMessage => {
                    self.handle_private_message_at(&envelope, now_ms).await
                }
                EventKind::Notification => self.handle_notification_at(&envelope, now_ms).await,
            },
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(report) => report.label(),
            Err(NotifyError::Decode { .. }) => "decode_error",
            Err(_) => "lookup_error",
        };
        tgnotify_prometheus::record_event(kind.label(), outcome);

        result
    }

    /// Handles a `chii_pms` change event.
    pub async fn handle_private_message(
        &self,
        envelope: &Envelope,
    ) -> Result<DispatchReport, NotifyError> {
        self.handle_private_message_at(envelope, now_ms()).await
    }

    pub async fn handle_private_message_at(
        &self,
        envelope: &Envelope,
        now_ms: i64,
    ) -> Result<DispatchReport, NotifyError> {
        if let Err(reason) = envelope.eligibility(now_ms, self.settings.freshness) {
            debug!(reason = reason.label(), "skipping private message event");
            return Ok(DispatchReport::Skipped(reason));
        }
        let pm: PrivateMessageRow = envelope.after_row()?;

        let chats = self
            .bounded(self.directory.linked_chats(pm.recipient()))
            .await?;
        if chats.is_empty() {
            return Ok(DispatchReport::Skipped(SkipReason::NoLinkedChats));
        }

        let sender = self.bounded(self.enrichment.member(pm.sender())).await?;

        let url = self.settings.roots.private_message_url(pm.msg_id);
        let text = markup::render_private_message(sender.display_name(), &url);

        info!(
            user_id = %pm.recipient(),
            msg_id = pm.msg_id,
            chats = chats.len(),
            "sending private message notice"
        );
        Ok(DispatchReport::Delivered(self.fan_out(chats, &text).await))
    }

    /// Handles a `chii_notify` change event.
    pub async fn handle_notification(
        &self,
        envelope: &Envelope,
    ) -> Result<DispatchReport, NotifyError> {
        self.handle_notification_at(envelope, now_ms()).await
    }

    pub async fn handle_notification_at(
        &self,
        envelope: &Envelope,
        now_ms: i64,
    ) -> Result<DispatchReport, NotifyError> {
        if let Err(reason) = envelope.eligibility(now_ms, self.settings.freshness) {
            debug!(reason = reason.label(), "skipping notification event");
            return Ok(DispatchReport::Skipped(reason));
        }
        let notify: NotificationRow = envelope.after_row()?;

        let chats = self
            .bounded(self.directory.linked_chats(notify.recipient()))
            .await?;
        if chats.is_empty() {
            return Ok(DispatchReport::Skipped(SkipReason::NoLinkedChats));
        }

        let Some(rule) = rules::lookup(notify.nt_type) else {
            warn!(nt_type = notify.nt_type, "no rule for notification type");
            return Ok(DispatchReport::Skipped(SkipReason::UnknownRule(
                notify.nt_type,
            )));
        };

        let field = self
            .bounded(self.enrichment.notify_field(notify.nt_mid))
            .await?;
        if field.hash != rule.hash {
            warn!(
                nt_type = rule.code,
                field_id = field.id,
                field_hash = field.hash,
                rule_hash = rule.hash,
                "notify field belongs to a different family"
            );
        }

        let sender = self.bounded(self.enrichment.member(notify.sender())).await?;

        let url = self
            .settings
            .roots
            .notification_url(rule, notify.nt_mid, notify.nt_related_id);
        let text = markup::render_notification(rule, sender.display_name(), &field.title, &url);

        info!(
            user_id = %notify.recipient(),
            nt_type = rule.code,
            chats = chats.len(),
            "sending notification"
        );
        Ok(DispatchReport::Delivered(self.fan_out(chats, &text).await))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, NotifyError>>,
    ) -> Result<T, NotifyError> {
        let duration = self.settings.call_timeout;
        tokio::time::timeout(duration, call)
            .await
            .map_err(|_| NotifyError::Timeout { duration })?
    }

    async fn fan_out(&self, chats: Vec<ChatId>, text: &str) -> FanOutSummary {
        let outcomes: Vec<DeliveryOutcome> = futures::stream::iter(chats)
            .map(|chat_id| self.deliver_one(chat_id, text))
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;

        outcomes
            .iter()
            .fold(FanOutSummary::default(), |mut summary, outcome| {
                match outcome {
                    DeliveryOutcome::Sent => summary.sent += 1,
                    DeliveryOutcome::RecipientGone => summary.gone += 1,
                    DeliveryOutcome::TransientFailure(_) => summary.failed += 1,
                }
                summary
            })
    }

    async fn deliver_one(&self, chat_id: ChatId, text: &str) -> DeliveryOutcome {
        let outcome = tokio::time::timeout(self.settings.call_timeout, self.sink.deliver(chat_id, text))
            .await
            .unwrap_or_else(|_| DeliveryOutcome::TransientFailure("delivery timed out".to_string()));

        tgnotify_prometheus::record_delivery(outcome.label());

        match &outcome {
            DeliveryOutcome::Sent => {}
            DeliveryOutcome::RecipientGone => {
                info!(chat_id = %chat_id, "recipient gone, disabling chat");
                match self.bounded(self.directory.disable_chat(chat_id)).await {
                    Ok(()) => tgnotify_prometheus::record_chat_disabled(),
                    Err(e) => warn!(chat_id = %chat_id, error = %e, "failed to disable chat"),
                }
            }
            DeliveryOutcome::TransientFailure(reason) => {
                warn!(chat_id = %chat_id, reason = %reason, "delivery failed");
            }
        }

        outcome
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram implementation of [`DeliverySink`].

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId as TgChatId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::debug;

use tgnotify_core::{
    AdapterType, ChatId, DeliveryOutcome, DeliverySink, HealthStatus, NotifyError, PluginAdapter,
};

/// Sends notification text with `sendMessage`.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Maps a Bot API failure to a delivery outcome.
///
/// Only errors that can never succeed on retry for this chat count as
/// [`DeliveryOutcome::RecipientGone`].
pub fn classify_error(err: &RequestError) -> DeliveryOutcome {
    match err {
        RequestError::Api(api) if recipient_gone(api) => DeliveryOutcome::RecipientGone,
        other => DeliveryOutcome::TransientFailure(other.to_string()),
    }
}

fn recipient_gone(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::BotBlocked
            | ApiError::BotKicked
            | ApiError::BotKickedFromSupergroup
            | ApiError::ChatNotFound
            | ApiError::UserDeactivated
            | ApiError::CantInitiateConversation
    )
}

fn outcome<T>(chat_id: ChatId, result: Result<T, RequestError>) -> DeliveryOutcome {
    match result {
        Ok(_) => DeliveryOutcome::Sent,
        Err(e) => {
            let outcome = classify_error(&e);
            debug!(chat_id = chat_id.0, error = %e, outcome = outcome.label(), "sendMessage failed");
            outcome
        }
    }
}

#[async_trait]
impl PluginAdapter for TelegramSink {
    fn name(&self) -> &str {
        "telegram"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, NotifyError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }
}

#[async_trait]
impl DeliverySink for TelegramSink {
    async fn deliver(&self, chat_id: ChatId, html: &str) -> DeliveryOutcome {
        let result = self
            .bot
            .send_message(TgChatId(chat_id.0), html)
            .parse_mode(ParseMode::Html)
            .await;
        outcome(chat_id, result)
    }

    async fn deliver_plain(&self, chat_id: ChatId, text: &str) -> DeliveryOutcome {
        let result = self.bot.send_message(TgChatId(chat_id.0), text).await;
        outcome(chat_id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_and_missing_chats_are_gone() {
        for api in [
            ApiError::BotBlocked,
            ApiError::BotKicked,
            ApiError::BotKickedFromSupergroup,
            ApiError::ChatNotFound,
            ApiError::UserDeactivated,
            ApiError::CantInitiateConversation,
        ] {
            assert_eq!(
                classify_error(&RequestError::Api(api)),
                DeliveryOutcome::RecipientGone
            );
        }
    }

    #[test]
    fn other_api_errors_are_transient() {
        let err = RequestError::Api(ApiError::Unknown("Bad Request: message is too long".into()));
        match classify_error(&err) {
            DeliveryOutcome::TransientFailure(reason) => {
                assert!(reason.contains("message is too long"));
            }
            other => panic!("expected transient failure, got {other:?}"),
        }
    }

    #[test]
    fn sink_metadata() {
        let sink = TelegramSink::new(Bot::new("123456:ABC-DEF"));
        assert_eq!(sink.name(), "telegram");
        assert_eq!(sink.adapter_type(), AdapterType::Delivery);
    }
}

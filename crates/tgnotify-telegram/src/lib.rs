// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram side of tgnotify.
//!
//! [`TelegramSink`] pushes rendered notifications into chats and classifies
//! Bot API failures into [`DeliveryOutcome`](tgnotify_core::DeliveryOutcome)s.
//! [`TelegramListener`] long-polls for the `/start`, `/help`, `/logout` and
//! `/debug` commands used to link a chat to a site account.

pub mod commands;
pub mod listener;
pub mod sink;

use teloxide::Bot;
use teloxide::requests::Requester;
use teloxide::types::Me;
use tgnotify_config::model::TelegramConfig;
use tgnotify_core::NotifyError;
use tracing::info;

pub use commands::{Command, CommandService, LoginButton, Reply, mint_state};
pub use listener::TelegramListener;
pub use sink::{TelegramSink, classify_error};

/// Builds a [`Bot`] from config without touching the network.
pub fn build_bot(config: &TelegramConfig) -> Result<Bot, NotifyError> {
    let token = config
        .bot_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| NotifyError::Config("telegram.bot_token is required".into()))?;

    let bot = Bot::new(token);
    match config.api_url.as_deref() {
        Some(raw) => {
            let url = reqwest::Url::parse(raw).map_err(|e| {
                NotifyError::Config(format!("telegram.api_url is not a valid URL: {e}"))
            })?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Validates the token with `getMe`.
pub async fn verify_bot(bot: &Bot) -> Result<Me, NotifyError> {
    let me = bot.get_me().await.map_err(|e| NotifyError::Delivery {
        message: format!("telegram getMe failed: {e}"),
        source: Some(Box::new(e)),
    })?;
    info!(username = %me.username(), "telegram bot authenticated");
    Ok(me)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_bot_requires_token() {
        let config = TelegramConfig::default();
        assert!(matches!(build_bot(&config), Err(NotifyError::Config(_))));
    }

    #[test]
    fn build_bot_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
            api_url: None,
        };
        assert!(build_bot(&config).is_err());
    }

    #[test]
    fn build_bot_rejects_bad_api_url() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF".into()),
            api_url: Some("not a url".into()),
        };
        assert!(matches!(build_bot(&config), Err(NotifyError::Config(_))));
    }

    #[test]
    fn build_bot_with_custom_api_url() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF".into()),
            api_url: Some("http://127.0.0.1:8081/".into()),
        };
        let bot = build_bot(&config).unwrap();
        assert_eq!(bot.api_url().as_str(), "http://127.0.0.1:8081/");
    }
}

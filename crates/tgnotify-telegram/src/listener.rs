// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling command listener.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::commands::{Command, CommandService, Reply};

/// Receives bot commands and answers them through [`CommandService`].
pub struct TelegramListener {
    bot: Bot,
    service: Arc<CommandService>,
}

impl TelegramListener {
    pub fn new(bot: Bot, service: Arc<CommandService>) -> Self {
        Self { bot, service }
    }

    /// Polls until `cancel` fires. Pending updates are dropped on shutdown.
    pub async fn run(self, cancel: CancellationToken) {
        let handler = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handle_command);

        let mut dispatcher = Dispatcher::builder(self.bot, handler)
            .dependencies(teloxide::dptree::deps![self.service])
            .default_handler(|_| async {})
            .build();

        info!("starting Telegram long polling");
        tokio::select! {
            _ = dispatcher.dispatch() => warn!("telegram dispatcher stopped"),
            _ = cancel.cancelled() => info!("telegram listener shutting down"),
        }
    }
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    command: Command,
    service: Arc<CommandService>,
) -> ResponseResult<()> {
    let chat_id = tgnotify_core::ChatId(msg.chat.id.0);
    let reply = match service.handle(chat_id, &command).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(chat_id = chat_id.0, command = ?command, error = %e, "command failed");
            Reply {
                text: "服务暂时不可用，请稍后再试".into(),
                button: None,
            }
        }
    };

    let mut request = bot.send_message(msg.chat.id, reply.text);
    if let Some(button) = reply.button {
        match reqwest::Url::parse(&button.url) {
            Ok(url) => {
                request = request.reply_markup(InlineKeyboardMarkup::new([[
                    InlineKeyboardButton::url(button.label, url),
                ]]));
            }
            Err(e) => error!(url = %button.url, error = %e, "invalid login url"),
        }
    }
    request.await?;
    Ok(())
}

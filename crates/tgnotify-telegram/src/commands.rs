// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot commands for linking a chat to a site account.
//!
//! [`CommandService`] holds the command semantics and works on the core
//! traits only; the teloxide plumbing lives in [`crate::listener`].

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use teloxide::utils::command::BotCommands;
use tracing::info;

use tgnotify_core::{ChatDirectory, ChatId, NotifyError, OAuthStateStore};

/// Commands understood by the bot.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "支持的命令:")]
pub enum Command {
    #[command(description = "关联 bangumi 账号")]
    Start,
    #[command(description = "显示帮助")]
    Help,
    #[command(description = "取消关联")]
    Logout,
    #[command(description = "显示 chat id")]
    Debug,
}

/// Inline URL button attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginButton {
    pub label: String,
    pub url: String,
}

/// Text to send back to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub button: Option<LoginButton>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            button: None,
        }
    }
}

/// 32 random bytes, URL-safe base64 without padding.
pub fn mint_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub struct CommandService {
    directory: Arc<dyn ChatDirectory>,
    states: Arc<dyn OAuthStateStore>,
    external_base: String,
    state_ttl: Duration,
}

impl CommandService {
    /// `external_base` is the public gateway root without a trailing slash.
    pub fn new(
        directory: Arc<dyn ChatDirectory>,
        states: Arc<dyn OAuthStateStore>,
        external_base: impl Into<String>,
        state_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            states,
            external_base: external_base.into(),
            state_ttl,
        }
    }

    pub async fn handle(&self, chat_id: ChatId, command: &Command) -> Result<Reply, NotifyError> {
        match command {
            Command::Start | Command::Help => self.start(chat_id).await,
            Command::Logout => self.logout(chat_id).await,
            Command::Debug => Ok(Reply::text(format!("chat_id: {chat_id}"))),
        }
    }

    async fn start(&self, chat_id: ChatId) -> Result<Reply, NotifyError> {
        if let Some(link) = self.directory.find_link(chat_id).await? {
            return Ok(Reply::text(format!(
                "你已经作为用户 {} 成功进行认证",
                link.user_id
            )));
        }

        let state = mint_state();
        self.states.put(&state, chat_id, self.state_ttl).await?;
        info!(chat_id = chat_id.0, "issued oauth state");

        Ok(Reply {
            text: format!("请在{}s内进行认证", self.state_ttl.as_secs()),
            button: Some(LoginButton {
                label: "认证 bangumi 账号".into(),
                url: format!("{}/redirect?state={state}", self.external_base),
            }),
        })
    }

    async fn logout(&self, chat_id: ChatId) -> Result<Reply, NotifyError> {
        let removed = self.directory.unlink_chat(chat_id).await?;
        info!(chat_id = chat_id.0, removed, "chat logged out");
        Ok(Reply::text("成功登出"))
    }
}

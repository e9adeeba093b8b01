// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization code exchange against the site's token endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use tgnotify_core::UserId;

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("token endpoint returned status {status}")]
    Rejected { status: u16 },

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed token response: {0}")]
    Malformed(String),
}

/// Exchanges an authorization code for the site user id it belongs to.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<UserId, ExchangeError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Int(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    user_id: RawUserId,
}

fn parse_user_id(body: &str) -> Result<UserId, ExchangeError> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| ExchangeError::Malformed(e.to_string()))?;
    match response.user_id {
        RawUserId::Int(id) => Ok(UserId(id)),
        RawUserId::Text(s) => s
            .trim()
            .parse()
            .map(UserId)
            .map_err(|_| ExchangeError::Malformed(format!("user_id {s:?} is not a number"))),
    }
}

/// Form-encoded `authorization_code` grant over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTokenExchange {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl HttpTokenExchange {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self, code: &str) -> Result<UserId, ExchangeError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(status = status.as_u16(), "token endpoint answered");
        parse_user_id(&body)
    }
}

// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the OAuth gateway.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use tgnotify_core::{DeliveryOutcome, HealthStatus};

use crate::server::GatewayState;

const INVALID_REDIRECT: &str = "请求无效，请在 telegram 中重新认证";
const INVALID_CALLBACK: &str = "非法请求，请使用telegram重新获取认证链接";
const EXCHANGE_FAILED: &str = "请尝试重新认证";
const LINK_FAILED: &str = "服务暂时不可用，请稍后重试";
const LINKED: &str = "你已经成功认证，请关闭页面返回 telegram";

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub adapters: BTreeMap<String, String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// GET /
pub async fn index() -> &'static str {
    "index page"
}

/// GET /redirect?state=...
///
/// Sends the browser to the authorize page with our `redirect_uri`.
pub async fn redirect(
    State(state): State<GatewayState>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let Some(oauth_state) = non_empty(query.state) else {
        return (StatusCode::BAD_REQUEST, INVALID_REDIRECT).into_response();
    };

    let links = &state.links;
    let url = reqwest::Url::parse_with_params(
        &links.authorize_url,
        &[
            ("client_id", links.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", links.callback_url.as_str()),
            ("state", oauth_state.as_str()),
        ],
    );
    match url {
        Ok(url) => (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response(),
        Err(e) => {
            error!(error = %e, "invalid authorize url");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /callback?code=...&state=...
///
/// The state is consumed before the code exchange, so it cannot be replayed.
pub async fn callback(
    State(state): State<GatewayState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let (Some(code), Some(oauth_state)) = (non_empty(query.code), non_empty(query.state)) else {
        return (StatusCode::BAD_REQUEST, INVALID_CALLBACK).into_response();
    };

    let chat_id = match state.states.take(&oauth_state).await {
        Ok(Some(chat_id)) => chat_id,
        Ok(None) => return (StatusCode::BAD_REQUEST, INVALID_CALLBACK).into_response(),
        Err(e) => {
            error!(error = %e, "failed to read oauth state");
            return (StatusCode::INTERNAL_SERVER_ERROR, LINK_FAILED).into_response();
        }
    };

    let user_id = match state.exchange.exchange(&code).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!(chat_id = chat_id.0, error = %e, "oauth code exchange failed");
            return (StatusCode::BAD_GATEWAY, EXCHANGE_FAILED).into_response();
        }
    };

    if let Err(e) = state.directory.link_chat(chat_id, user_id).await {
        error!(chat_id = chat_id.0, user_id = user_id.0, error = %e, "failed to link chat");
        return (StatusCode::INTERNAL_SERVER_ERROR, LINK_FAILED).into_response();
    }
    tgnotify_prometheus::record_oauth_link();
    info!(chat_id = chat_id.0, user_id = user_id.0, "chat linked");

    let notice = format!("已经成功关联用户 {user_id}");
    let outcome = state.sink.deliver_plain(chat_id, &notice).await;
    if outcome != DeliveryOutcome::Sent {
        warn!(chat_id = chat_id.0, outcome = outcome.label(), "link notice not delivered");
    }

    (StatusCode::OK, LINKED).into_response()
}

/// GET /health
pub async fn health(State(state): State<GatewayState>) -> Response {
    let mut adapters = BTreeMap::new();
    let mut healthy = true;
    for adapter in &state.health_checks {
        let status = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => "healthy".to_string(),
            Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
            Ok(HealthStatus::Unhealthy(reason)) => {
                healthy = false;
                format!("unhealthy: {reason}")
            }
            Err(e) => {
                healthy = false;
                format!("error: {e}")
            }
        };
        adapters.insert(adapter.name().to_string(), status);
    }

    let (code, status) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };
    (code, Json(HealthResponse { status, adapters })).into_response()
}

/// GET /metrics
pub async fn metrics(State(state): State<GatewayState>) -> Response {
    match &state.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

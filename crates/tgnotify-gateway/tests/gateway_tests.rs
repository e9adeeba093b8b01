// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route tests for the OAuth gateway, driven through `tower::ServiceExt`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;

use tgnotify_core::{ChatDirectory, ChatId, OAuthStateStore, UserId};
use tgnotify_gateway::{ExchangeError, GatewayState, OAuthLinks, TokenExchange, build_router};
use tgnotify_test_utils::{Delivery, MockDirectory, MockSink, MockStateStore};

struct FixedExchange(Option<i64>);

#[async_trait]
impl TokenExchange for FixedExchange {
    async fn exchange(&self, _code: &str) -> Result<UserId, ExchangeError> {
        self.0
            .map(UserId)
            .ok_or(ExchangeError::Rejected { status: 401 })
    }
}

struct Harness {
    directory: MockDirectory,
    states: MockStateStore,
    sink: MockSink,
    state: GatewayState,
}

fn harness(exchange: FixedExchange) -> Harness {
    let directory = MockDirectory::new();
    let states = MockStateStore::new();
    let sink = MockSink::new();
    let state = GatewayState {
        links: OAuthLinks {
            client_id: "bgm123".into(),
            authorize_url: "https://bgm.tv/oauth/authorize".into(),
            callback_url: "https://tg.example.org/callback".into(),
        },
        directory: Arc::new(directory.clone()),
        states: Arc::new(states.clone()),
        sink: Arc::new(sink.clone()),
        exchange: Arc::new(exchange),
        health_checks: vec![Arc::new(directory.clone()), Arc::new(states.clone())],
        prometheus_render: None,
    };
    Harness {
        directory,
        states,
        sink,
        state,
    }
}

async fn get(state: GatewayState, uri: &str) -> Response {
    build_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_page() {
    let h = harness(FixedExchange(None));
    let response = get(h.state, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "index page");
}

#[tokio::test]
async fn redirect_without_state_is_rejected() {
    let h = harness(FixedExchange(None));
    let response = get(h.state, "/redirect").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "请求无效，请在 telegram 中重新认证");
}

#[tokio::test]
async fn redirect_points_at_authorize_page() {
    let h = harness(FixedExchange(None));
    let response = get(h.state, "/redirect?state=abc_-123").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(
        location,
        "https://bgm.tv/oauth/authorize?client_id=bgm123&response_type=code\
         &redirect_uri=https%3A%2F%2Ftg.example.org%2Fcallback&state=abc_-123"
    );
}

#[tokio::test]
async fn callback_without_params_is_rejected() {
    let h = harness(FixedExchange(Some(1001)));
    for uri in ["/callback", "/callback?code=c", "/callback?state=s", "/callback?code=&state=s"] {
        let response = get(h.state.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body_text(response).await,
            "非法请求，请使用telegram重新获取认证链接"
        );
    }
}

#[tokio::test]
async fn callback_with_unknown_state_is_rejected() {
    let h = harness(FixedExchange(Some(1001)));
    let response = get(h.state, "/callback?code=c&state=nope").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(h.directory.links().await.is_empty());
}

#[tokio::test]
async fn callback_links_chat_and_notifies_it() {
    let h = harness(FixedExchange(Some(1001)));
    h.states
        .put("st", ChatId(42), Duration::from_secs(60))
        .await
        .unwrap();

    let response = get(h.state.clone(), "/callback?code=c&state=st").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "你已经成功认证，请关闭页面返回 telegram"
    );

    assert_eq!(
        h.directory.linked_chats(UserId(1001)).await.unwrap(),
        vec![ChatId(42)]
    );
    assert_eq!(
        h.sink.attempts().await,
        vec![Delivery {
            chat_id: ChatId(42),
            text: "已经成功关联用户 1001".into(),
            html: false,
        }]
    );

    // single use
    let replay = get(h.state, "/callback?code=c&state=st").await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn callback_reenables_existing_link() {
    let h = harness(FixedExchange(Some(1001)));
    h.directory.link_chat(ChatId(42), UserId(1001)).await.unwrap();
    h.directory.disable_chat(ChatId(42)).await.unwrap();
    h.states
        .put("st", ChatId(42), Duration::from_secs(60))
        .await
        .unwrap();

    let response = get(h.state, "/callback?code=c&state=st").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.directory.links().await.len(), 1);
    assert!(h.directory.find_link(ChatId(42)).await.unwrap().is_some());
}

#[tokio::test]
async fn failed_exchange_is_bad_gateway() {
    let h = harness(FixedExchange(None));
    h.states
        .put("st", ChatId(42), Duration::from_secs(60))
        .await
        .unwrap();

    let response = get(h.state, "/callback?code=c&state=st").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_text(response).await, "请尝试重新认证");
    assert!(h.directory.links().await.is_empty());
    assert_eq!(h.sink.attempt_count().await, 0);
}

#[tokio::test]
async fn health_lists_adapters() {
    let h = harness(FixedExchange(None));
    let response = get(h.state, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["adapters"]["mock-directory"], "healthy");
    assert_eq!(json["adapters"]["mock-state"], "healthy");
}

#[tokio::test]
async fn metrics_requires_exporter() {
    let h = harness(FixedExchange(None));
    let response = get(h.state.clone(), "/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut state = h.state;
    state.prometheus_render = Some(Arc::new(|| "tgnotify_events_total 3\n".to_string()));
    let response = get(state, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "tgnotify_events_total 3\n");
}

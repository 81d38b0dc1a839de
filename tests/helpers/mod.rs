//! Shared setup for router tests: a stand-in Telegram Bot API and config.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::post,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use yurline::config::{
    Config, MapsConfig, ObservabilityConfig, RelayConfig, ServerConfig, SiteConfig,
    TelegramConfig,
};

pub const BOT_TOKEN: &str = "42:secret";
pub const CHAT_ID: &str = "-1001";

#[derive(Clone, Default)]
pub struct MockTelegram {
    pub calls: Arc<AtomicUsize>,
    pub last: Arc<Mutex<Option<Value>>>,
}

impl MockTelegram {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Value> {
        self.last.lock().unwrap().clone()
    }
}

async fn send_message(
    State(mock): State<MockTelegram>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    *mock.last.lock().unwrap() = Some(body.clone());

    if body["chat_id"] != CHAT_ID {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({"ok": true, "result": {"message_id": 7, "date": 1591002300}})),
    )
}

/// Serves `/bot{token}/sendMessage` on an ephemeral port; returns its base URL.
pub async fn spawn_telegram() -> anyhow::Result<(String, MockTelegram)> {
    let mock = MockTelegram::default();
    let app = Router::new()
        .route("/{bot}/sendMessage", post(send_message))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });

    Ok((format!("http://{addr}"), mock))
}

pub fn config(api_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        telegram: TelegramConfig {
            bot_token: BOT_TOKEN.to_string(),
            chat_id: CHAT_ID.to_string(),
            api_url: api_url.to_string(),
            ..TelegramConfig::default()
        },
        site: SiteConfig::default(),
        relay: RelayConfig::default(),
        maps: MapsConfig {
            address: "г. Алматы, ул. Абая 10".to_string(),
            ..MapsConfig::default()
        },
        observability: ObservabilityConfig::default(),
    }
}

pub async fn call(app: Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };

    Ok((status, json))
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

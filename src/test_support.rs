//! In-process stand-ins for the backend, email provider and payment processor.

use axum::{
    body::Bytes,
    extract::Path,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderName, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::{Config, MalformedBodyPolicy};
use crate::AppState;

pub const TEST_EMAIL_KEY: &str = "re_test_key";
pub const TEST_PAYMENTS_KEY: &str = "sk_test_123";

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Reflects the received request back as JSON.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "authorization": header(AUTHORIZATION),
        "content_type": header(CONTENT_TYPE),
        "body": body,
    }))
}

async fn published_posts(uri: Uri, headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "query": uri.query(),
        "authorization": headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
        "posts": [
            {
                "slug": "encryption-at-rest",
                "title": "Encryption at Rest",
                "excerpt": "Addressable, not optional",
                "publishedAt": "2026-02-10T08:00:00Z"
            },
            {
                "slug": "breach-notification",
                "title": "Breach Notification Timelines",
                "published_at": "2026-01-20T08:00:00"
            },
            {
                "slug": "untitled-draft"
            }
        ]
    }))
}

async fn join_waitlist(headers: HeaderMap) -> Response {
    if headers.contains_key(AUTHORIZATION) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unexpected credentials"})),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({"id": 1}))).into_response()
}

async fn fixed_status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": format!("status {code}")}))).into_response()
}

async fn plain_text() -> &'static str {
    "plain backend text"
}

async fn broken_json() -> Response {
    ([(CONTENT_TYPE, "application/json")], "{\"truncated\":").into_response()
}

async fn send_email(headers: HeaderMap, Json(email): Json<Value>) -> Response {
    if bearer(&headers) != Some(TEST_EMAIL_KEY) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "API key is invalid"})),
        )
            .into_response();
    }
    if email["to"].as_array().map_or(true, |to| to.is_empty()) {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "missing to"}))).into_response();
    }
    Json(json!({"id": "email_1"})).into_response()
}

async fn checkout_session(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if bearer(&headers) != Some(TEST_PAYMENTS_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API Key provided"}})),
        )
            .into_response();
    }
    if id == "cs_test_garbled" {
        return ([(CONTENT_TYPE, "application/json")], "{\"status\":").into_response();
    }
    if id == "cs_test_missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"message": format!("No such checkout session: '{id}'")}})),
        )
            .into_response();
    }
    Json(json!({
        "id": id,
        "object": "checkout.session",
        "status": "complete",
        "payment_status": "paid",
        "customer_details": {"email": "billing@clinic.test"}
    }))
    .into_response()
}

/// Start the stand-in upstream on an ephemeral port and return its origin.
pub async fn spawn_echo_backend() -> String {
    crate::logging::init_test();

    let app = Router::new()
        .route("/blog", get(published_posts))
        .route("/waitlist/join", post(join_waitlist))
        .route("/status/:code", get(fixed_status))
        .route("/text", get(plain_text))
        .route("/broken-json", get(broken_json))
        .route("/emails", post(send_email))
        .route("/checkout/sessions/:id", get(checkout_session))
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// An origin nothing listens on.
pub async fn unreachable_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Application state wired to the stand-in upstream at `base_url`.
pub fn test_state(base_url: &str, policy: MalformedBodyPolicy) -> AppState {
    let mut config = Config::default();
    config.backend.base_url = base_url.to_string();
    config.backend.malformed_body = policy;
    config.site.url = "https://compliance.test".to_string();
    config.email.api_key = TEST_EMAIL_KEY.to_string();
    config.email.api_url = format!("{base_url}/emails");
    config.payments.secret_key = TEST_PAYMENTS_KEY.to_string();
    config.payments.api_base = base_url.to_string();

    AppState::from_config(&config, Client::new())
}

//! HTTP request handlers.

use axum::{
    body::Bytes,
    extract::{OriginalUri, Query, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, Uri},
    response::IntoResponse,
    Json,
};

use crate::api::types::*;
use crate::auth::ForwardedAuthorization;
use crate::domain::{ContactMessage, SessionStatus};
use crate::error::{GatewayError, GatewayResult};
use crate::feeds;
use crate::relay::{upstream_path, RelayRequest, RelayResponse};
use crate::AppState;

/// Replay the inbound request against the backend under the same path,
/// minus the `/api` mount.
async fn relay(
    state: &AppState,
    method: Method,
    uri: &Uri,
    authorization: Option<HeaderValue>,
    body: &[u8],
) -> GatewayResult<RelayResponse> {
    let request = RelayRequest::new(method, upstream_path(uri.path()))
        .with_query(uri.query())
        .with_authorization(authorization)
        .with_json_body(body, state.relay.malformed_body_policy())?;

    state.relay.forward(request).await
}

// ==================== Relays ====================

/// Relay any auth/user-management call to the backend.
///
/// /api/auth/*
#[utoipa::path(
    method(get, post, put, delete),
    path = "/api/auth/{path}",
    request_body(content = Object, description = "JSON body relayed to the backend"),
    params(("path" = String, Path, description = "Backend path below /auth")),
    responses(
        (status = 200, description = "Backend response, relayed as-is"),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Backend unreachable")
    ),
    tag = "relay"
)]
pub async fn auth_relay(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    ForwardedAuthorization(authorization): ForwardedAuthorization,
    body: Bytes,
) -> GatewayResult<RelayResponse> {
    relay(&state, method, &uri, authorization, &body).await
}

/// List published blog posts.
///
/// GET /api/blog
#[utoipa::path(
    get,
    path = "/api/blog",
    responses(
        (status = 200, description = "Published posts", body = [crate::domain::BlogPost]),
        (status = 500, description = "Backend unreachable")
    ),
    tag = "blog"
)]
pub async fn list_published_posts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> GatewayResult<RelayResponse> {
    relay(&state, Method::GET, &uri, None, &[]).await
}

/// List or create posts in the blog admin.
///
/// /api/blog/admin
#[utoipa::path(
    method(get, post),
    path = "/api/blog/admin",
    request_body(content = Object, description = "JSON body relayed to the backend"),
    responses(
        (status = 200, description = "Backend response, relayed as-is"),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Backend unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "blog"
)]
pub async fn admin_posts(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    ForwardedAuthorization(authorization): ForwardedAuthorization,
    body: Bytes,
) -> GatewayResult<RelayResponse> {
    relay(&state, method, &uri, authorization, &body).await
}

/// Read, update or delete one post in the blog admin.
///
/// /api/blog/admin/{id}
#[utoipa::path(
    method(get, put, delete),
    path = "/api/blog/admin/{id}",
    request_body(content = Object, description = "JSON body relayed to the backend"),
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Backend response, relayed as-is"),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Backend unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "blog"
)]
pub async fn admin_post(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    ForwardedAuthorization(authorization): ForwardedAuthorization,
    body: Bytes,
) -> GatewayResult<RelayResponse> {
    relay(&state, method, &uri, authorization, &body).await
}

/// Subscribe an address to the newsletter.
///
/// POST /api/newsletter/subscribe
#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    request_body(content = Object, description = "JSON body relayed to the backend"),
    responses(
        (status = 200, description = "Backend response, relayed as-is"),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Backend unreachable")
    ),
    tag = "marketing"
)]
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> GatewayResult<RelayResponse> {
    relay(&state, Method::POST, &uri, None, &body).await
}

/// Join the product waitlist.
///
/// POST /api/waitlist/join
#[utoipa::path(
    post,
    path = "/api/waitlist/join",
    request_body(content = Object, description = "JSON body relayed to the backend"),
    responses(
        (status = 201, description = "Backend response, relayed as-is"),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Backend unreachable")
    ),
    tag = "marketing"
)]
pub async fn join_waitlist(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> GatewayResult<RelayResponse> {
    relay(&state, Method::POST, &uri, None, &body).await
}

/// Persist a completed subscription for the signed-in organization.
///
/// POST /api/subscriptions/save
#[utoipa::path(
    post,
    path = "/api/subscriptions/save",
    request_body(content = Object, description = "JSON body relayed to the backend"),
    responses(
        (status = 200, description = "Backend response, relayed as-is"),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Backend unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "billing"
)]
pub async fn save_subscription(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ForwardedAuthorization(authorization): ForwardedAuthorization,
    body: Bytes,
) -> GatewayResult<RelayResponse> {
    relay(&state, Method::POST, &uri, authorization, &body).await
}

// ==================== Third-party APIs ====================

/// Look up a checkout session after the processor redirects back.
///
/// GET /api/stripe/session-status
#[utoipa::path(
    get,
    path = "/api/stripe/session-status",
    params(SessionStatusQuery),
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
        (status = 400, description = "Missing or malformed session_id"),
        (status = 500, description = "Payments not configured or processor unreachable")
    ),
    tag = "billing"
)]
pub async fn session_status(
    State(state): State<AppState>,
    Query(query): Query<SessionStatusQuery>,
) -> GatewayResult<Json<SessionStatus>> {
    let session_id = query.session_id.unwrap_or_default();
    let status = state.payments.session_status(session_id.trim()).await?;
    Ok(Json(status))
}

/// Send a contact form message to the support inbox.
///
/// POST /api/contact
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactMessage,
    responses(
        (status = 200, description = "Message sent", body = ContactResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Email delivery failed")
    ),
    tag = "marketing"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> GatewayResult<Json<ContactResponse>> {
    let message: ContactMessage =
        serde_json::from_slice(&body).map_err(GatewayError::MalformedBody)?;

    state.mailer.send_contact(&message).await?;

    Ok(Json(ContactResponse { success: true }))
}

// ==================== Feeds ====================

pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        feeds::render_robots(&state.site),
    )
}

pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let posts = feeds::published_posts(&state.relay).await;
    (
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        feeds::render_sitemap(&state.site, &posts),
    )
}

pub async fn rss_xml(State(state): State<AppState>) -> impl IntoResponse {
    let posts = feeds::published_posts(&state.relay).await;
    (
        [(CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        feeds::render_rss(&state.site, &posts),
    )
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.relay.base_url().to_string(),
        email_configured: state.mailer.is_configured(),
        payments_configured: state.payments.is_configured(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

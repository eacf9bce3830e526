//! Route definitions for the API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth_relay,
        handlers::list_published_posts,
        handlers::admin_posts,
        handlers::admin_post,
        handlers::subscribe_newsletter,
        handlers::join_waitlist,
        handlers::save_subscription,
        handlers::session_status,
        handlers::submit_contact,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::ContactResponse,
        crate::api::types::HealthResponse,
        crate::domain::BlogPost,
        crate::domain::ContactMessage,
        crate::domain::SessionStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "relay", description = "Requests relayed to the backend service"),
        (name = "blog", description = "Blog listing and administration"),
        (name = "marketing", description = "Newsletter, waitlist and contact"),
        (name = "billing", description = "Checkout and subscriptions"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Compliance Gateway API",
        version = "0.1.0",
        description = "Server-side relay for the HIPAA compliance tracking front-end",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Backend relays
        .route(
            "/api/auth/*path",
            get(handlers::auth_relay)
                .post(handlers::auth_relay)
                .put(handlers::auth_relay)
                .delete(handlers::auth_relay),
        )
        .route("/api/blog", get(handlers::list_published_posts))
        .route(
            "/api/blog/admin",
            get(handlers::admin_posts).post(handlers::admin_posts),
        )
        .route(
            "/api/blog/admin/:id",
            get(handlers::admin_post)
                .put(handlers::admin_post)
                .delete(handlers::admin_post),
        )
        .route(
            "/api/newsletter/subscribe",
            post(handlers::subscribe_newsletter),
        )
        .route("/api/waitlist/join", post(handlers::join_waitlist))
        .route("/api/subscriptions/save", post(handlers::save_subscription))
        // Third-party APIs
        .route("/api/stripe/session-status", get(handlers::session_status))
        .route("/api/contact", post(handlers::submit_contact))
        // Health
        .route("/api/health", get(handlers::health_check))
        // Feeds
        .route("/robots.txt", get(handlers::robots_txt))
        .route("/sitemap.xml", get(handlers::sitemap_xml))
        .route("/rss.xml", get(handlers::rss_xml))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

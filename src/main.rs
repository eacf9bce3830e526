//! Compliance Gateway - server-side relay for the HIPAA compliance front-end
//!
//! This service forwards the front-end's API calls to the backend service,
//! sends contact form email, looks up checkout sessions, and renders the
//! public robots/sitemap/rss feeds.

use std::sync::Arc;

use reqwest::Client;
use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod feeds;
mod logging;
mod mailer;
mod markup;
mod payments;
mod relay;
#[cfg(test)]
mod test_support;

use crate::api::build_router;
use crate::config::{Config, SiteConfig};
use crate::mailer::Mailer;
use crate::payments::PaymentsClient;
use crate::relay::Relay;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relay to the backend service.
    pub relay: Relay,
    /// Contact form delivery.
    pub mailer: Mailer,
    /// Checkout session lookups.
    pub payments: PaymentsClient,
    /// Public site metadata for the feeds.
    pub site: Arc<SiteConfig>,
}

impl AppState {
    /// Wire every outbound collaborator to one shared HTTP client.
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self {
            relay: Relay::new(client.clone(), &config.backend),
            mailer: Mailer::new(client.clone(), config.email.clone()),
            payments: PaymentsClient::new(client, &config.payments),
            site: Arc::new(config.site.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    logging::init(&config.logging);

    tracing::info!("Starting Compliance Gateway v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        backend = %config.backend.base_url,
        malformed_body = ?config.backend.malformed_body,
        "Configuration loaded"
    );

    let client = Client::builder()
        .user_agent(concat!("compliance-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow::anyhow!("HTTP client error: {}", e))?;

    let state = AppState::from_config(&config, client);

    if !state.mailer.is_configured() {
        tracing::warn!("Email API key not set - /api/contact will fail");
    }
    if !state.payments.is_configured() {
        tracing::warn!("Payments secret key not set - /api/stripe/session-status will fail");
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! Forwarding client for the backend service.

use std::time::Instant;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use uuid::Uuid;

use crate::config::{BackendConfig, MalformedBodyPolicy};
use crate::error::GatewayResult;
use crate::relay::{target_url, RelayRequest, RelayResponse};

/// Stateless relay to one backend origin.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Relay {
    client: Client,
    base_url: String,
    malformed_body: MalformedBodyPolicy,
}

impl Relay {
    pub fn new(client: Client, config: &BackendConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            malformed_body: config.malformed_body,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Policy applied to write requests with a malformed body.
    pub fn malformed_body_policy(&self) -> MalformedBodyPolicy {
        self.malformed_body
    }

    /// Replay `request` against the backend and return its answer.
    ///
    /// The upstream status is returned as-is. Only a network failure or an
    /// unreadable upstream body produce an error.
    pub async fn forward(&self, request: RelayRequest) -> GatewayResult<RelayResponse> {
        let relay_id = Uuid::new_v4();
        let url = target_url(&self.base_url, &request.path, request.query.as_deref());
        let started = Instant::now();

        tracing::debug!(
            relay_id = %relay_id,
            method = %request.method,
            url = %url,
            has_auth = request.authorization.is_some(),
            "Forwarding request to backend"
        );

        let mut outbound = self
            .client
            .request(request.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(authorization) = request.authorization {
            outbound = outbound.header(AUTHORIZATION, authorization);
        }

        if let Some(body) = &request.body {
            outbound = outbound.body(serde_json::to_vec(body)?);
        }

        let result = match outbound.send().await {
            Ok(response) => RelayResponse::from_upstream(response).await,
            Err(e) => Err(e.into()),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(relayed) if relayed.status.is_success() => tracing::info!(
                relay_id = %relay_id,
                method = %request.method,
                path = %request.path,
                status = relayed.status.as_u16(),
                elapsed_ms,
                "Relayed request"
            ),
            Ok(relayed) => tracing::warn!(
                relay_id = %relay_id,
                method = %request.method,
                path = %request.path,
                status = relayed.status.as_u16(),
                elapsed_ms,
                "Backend returned non-success status"
            ),
            Err(e) => tracing::error!(
                relay_id = %relay_id,
                method = %request.method,
                path = %request.path,
                error = %e,
                elapsed_ms,
                "Relay failed"
            ),
        }

        result
    }
}

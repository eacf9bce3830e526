//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ==================== Payments ====================

/// Query parameters for the checkout session lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionStatusQuery {
    /// Checkout session id returned by the processor.
    #[serde(default)]
    pub session_id: Option<String>,
}

// ==================== Contact ====================

/// Response after a contact message was accepted.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Backend origin requests are relayed to.
    pub backend: String,
    /// Whether contact form delivery is configured.
    pub email_configured: bool,
    /// Whether checkout session lookups are configured.
    pub payments_configured: bool,
    /// Timestamp.
    pub timestamp: String,
}

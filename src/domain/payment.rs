//! Checkout session shapes from the payment processor.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The subset of a processor checkout session the gateway reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

/// Session status returned to the checkout return page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SessionStatus {
    /// `open`, `complete` or `expired`.
    pub status: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: Option<String>,
    pub customer_email: Option<String>,
}

impl From<CheckoutSession> for SessionStatus {
    fn from(session: CheckoutSession) -> Self {
        let customer_email = session
            .customer_details
            .and_then(|d| d.email)
            .or(session.customer_email);

        Self {
            status: session.status,
            payment_status: session.payment_status,
            customer_email,
        }
    }
}

/// Whether `id` looks like a processor object id.
///
/// Ids are interpolated into a URL path, so only ASCII alphanumerics and `_`
/// are accepted.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 255 && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

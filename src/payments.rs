//! Checkout session lookups against the payment processor.

use reqwest::Client;
use serde::Deserialize;

use crate::config::PaymentsConfig;
use crate::domain::{is_valid_session_id, CheckoutSession, SessionStatus};
use crate::error::{GatewayError, GatewayResult};

#[derive(Debug, Deserialize)]
struct ProcessorErrorBody {
    error: ProcessorError,
}

#[derive(Debug, Deserialize)]
struct ProcessorError {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the processor's checkout session API.
#[derive(Clone)]
pub struct PaymentsClient {
    client: Client,
    secret_key: String,
    api_base: String,
}

impl PaymentsClient {
    pub fn new(client: Client, config: &PaymentsConfig) -> Self {
        Self {
            client,
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// Fetch the status of a checkout session.
    ///
    /// A processor error keeps the processor's status code and message.
    pub async fn session_status(&self, session_id: &str) -> GatewayResult<SessionStatus> {
        if !is_valid_session_id(session_id) {
            return Err(GatewayError::BadRequest(
                "session_id is missing or malformed".to_string(),
            ));
        }

        if !self.is_configured() {
            return Err(GatewayError::Config(
                "payments.secret_key is not set".to_string(),
            ));
        }

        let url = format!("{}/checkout/sessions/{}", self.api_base, session_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProcessorErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "Payment processor error".to_string());

            return Err(GatewayError::UpstreamStatus { status, message });
        }

        let body = response.bytes().await?;
        let session: CheckoutSession = serde_json::from_slice(&body)?;
        let session_status = SessionStatus::from(session);

        tracing::info!(
            session_id = %session_id,
            status = ?session_status.status,
            payment_status = ?session_status.payment_status,
            "Checkout session retrieved"
        );

        Ok(session_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_echo_backend, TEST_PAYMENTS_KEY};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn payments(api_base: String, secret_key: &str) -> PaymentsClient {
        PaymentsClient::new(
            Client::new(),
            &PaymentsConfig {
                secret_key: secret_key.to_string(),
                api_base,
            },
        )
    }

    #[tokio::test]
    async fn test_complete_session() {
        let base = spawn_echo_backend().await;
        let client = payments(format!("{base}/"), TEST_PAYMENTS_KEY);

        let status = client.session_status("cs_test_paid").await.unwrap();
        assert_eq!(status.status.as_deref(), Some("complete"));
        assert_eq!(status.payment_status.as_deref(), Some("paid"));
        assert_eq!(status.customer_email.as_deref(), Some("billing@clinic.test"));
    }

    #[tokio::test]
    async fn test_processor_error_keeps_status_and_message() {
        let base = spawn_echo_backend().await;
        let client = payments(base, TEST_PAYMENTS_KEY);

        let err = client.session_status("cs_test_missing").await.unwrap_err();
        match err {
            GatewayError::UpstreamStatus { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(message.contains("cs_test_missing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_key_is_unauthorized() {
        let base = spawn_echo_backend().await;
        let client = payments(base, "sk_test_wrong");

        let err = client.session_status("cs_test_paid").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UpstreamStatus { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
    }

    #[tokio::test]
    async fn test_unparseable_session_is_invalid_upstream() {
        let base = spawn_echo_backend().await;
        let client = payments(base, TEST_PAYMENTS_KEY);

        let err = client.session_status("cs_test_garbled").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUpstreamBody(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_malformed_id_rejected_before_network() {
        let client = payments("http://127.0.0.1:9".to_string(), TEST_PAYMENTS_KEY);
        let err = client.session_status("../customers").await.unwrap_err();
        assert!(matches!(err, GatewayError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_secret_is_config_error() {
        let client = payments("http://127.0.0.1:9".to_string(), "");
        let err = client.session_status("cs_test_paid").await.unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }
}

//! Contact form submission.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{GatewayError, GatewayResult};

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    /// Check required fields before anything leaves the gateway.
    pub fn validate(&self) -> GatewayResult<()> {
        let mut invalid = Vec::new();

        if self.name.trim().is_empty() {
            invalid.push("name");
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            invalid.push("email");
        }
        if self.message.trim().is_empty() {
            invalid.push("message");
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::BadRequest(format!(
                "Missing or invalid fields: {}",
                invalid.join(", ")
            )))
        }
    }

    /// Subject line for the outgoing email, free of header-breaking characters.
    pub fn email_subject(&self) -> String {
        let topic = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("New message");
        format!("Contact form: {} ({})", topic, self.name.trim())
            .replace(['\r', '\n'], " ")
    }
}

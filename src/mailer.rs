//! Contact form delivery through a transactional email API.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;
use crate::domain::ContactMessage;
use crate::error::{GatewayError, GatewayResult};
use crate::markup;

/// Body of the provider's send-email call.
#[derive(Debug, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// What the provider returns for an accepted message.
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

/// Sends contact form submissions to the support inbox.
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    config: Arc<EmailConfig>,
}

impl Mailer {
    pub fn new(client: Client, config: EmailConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Render the email for a validated contact message.
    pub fn compose(&self, message: &ContactMessage) -> OutboundEmail {
        let subject = message.subject.as_deref().unwrap_or("");
        let html = format!(
            "<h2>New contact form submission</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Subject:</strong> {}</p>\
             <p><strong>Message:</strong></p><p>{}</p>",
            markup::escape(message.name.trim()),
            markup::escape(message.email.trim()),
            markup::escape(subject),
            markup::escape(message.message.trim()).replace('\n', "<br>"),
        );
        let text = format!(
            "Name: {}\nEmail: {}\nSubject: {}\n\n{}",
            message.name.trim(),
            message.email.trim(),
            subject,
            message.message.trim()
        );

        OutboundEmail {
            from: self.config.from.clone(),
            to: vec![self.config.to.clone()],
            reply_to: message.email.trim().to_string(),
            subject: message.email_subject(),
            html,
            text,
        }
    }

    /// Validate and deliver a contact message.
    pub async fn send_contact(&self, message: &ContactMessage) -> GatewayResult<DeliveryReceipt> {
        message.validate()?;

        if !self.is_configured() {
            return Err(GatewayError::Config(
                "email.api_key is not set; contact form delivery is disabled".to_string(),
            ));
        }

        let email = self.compose(message);
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Internal(format!(
                "email provider responded {status}: {body}"
            )));
        }

        let receipt = response.json::<DeliveryReceipt>().await.unwrap_or_default();
        tracing::info!(
            message_id = ?receipt.id,
            reply_to = %email.reply_to,
            "Contact message delivered"
        );

        Ok(receipt)
    }
}

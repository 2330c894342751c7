// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound delivery of contact messages.
//!
//! Integrates with the Resend HTTP API: one bearer-authenticated JSON POST
//! per accepted submission, no retries.

use crate::validator::Submission;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Message payload sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

impl OutboundEmail {
    /// Build the message for a validated submission.
    pub fn compose(from: &str, to: &str, submission: &Submission) -> Self {
        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            reply_to: submission.email.clone(),
            subject: format!("Portfolio Contact: {}", submission.name),
            text: format!(
                "Name: {}\nEmail: {}\n\nMessage:\n{}",
                submission.name, submission.email, submission.message
            ),
        }
    }
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

/// Delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Provider answered with a non-success status
    #[error("provider rejected message with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// No answer within the configured timeout
    #[error("provider did not respond in time")]
    Timeout,

    /// Connection or decoding failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Something that can deliver a composed message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, api_key: &str, email: &OutboundEmail) -> Result<DeliveryReceipt, DeliveryError>;
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
}

/// Resend API client
pub struct ResendMailer {
    endpoint: Url,
    client: reqwest::Client,
}

impl ResendMailer {
    /// Create a client posting to `endpoint`, giving up after `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, api_key: &str, email: &OutboundEmail) -> Result<DeliveryReceipt, DeliveryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status.is_success() {
            let receipt: DeliveryReceipt = response.json().await.map_err(classify)?;
            debug!(id = ?receipt.id, "Provider accepted message");
            Ok(receipt)
        } else {
            // Error bodies are best-effort; an unreadable one still counts as a rejection.
            let message = response
                .json::<ProviderError>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.trim().is_empty());
            warn!(status = status.as_u16(), message = ?message, "Provider rejected message");
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn classify(err: reqwest::Error) -> DeliveryError {
    if err.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            message: "Found a moth in relay 70.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_compose() {
        let email = OutboundEmail::compose(
            "Portfolio Contact <onboarding@resend.dev>",
            "me@example.org",
            &submission(),
        );

        assert_eq!(email.to, vec!["me@example.org".to_string()]);
        assert_eq!(email.reply_to, "grace@example.com");
        assert_eq!(email.subject, "Portfolio Contact: Grace Hopper");
        assert_eq!(
            email.text,
            "Name: Grace Hopper\nEmail: grace@example.com\n\nMessage:\nFound a moth in relay 70."
        );
    }

    #[test]
    fn test_wire_format() {
        let email = OutboundEmail::compose("from@example.com", "to@example.com", &submission());
        let json = serde_json::to_value(&email).expect("email should serialize");
        assert_eq!(json["to"], serde_json::json!(["to@example.com"]));
        assert_eq!(json["reply_to"], "grace@example.com");
        assert!(json.get("from").is_some());
    }

    #[test]
    fn test_receipt_without_id() {
        let receipt: DeliveryReceipt = serde_json::from_str("{}").expect("empty receipt");
        assert_eq!(receipt.id, None);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(ResendMailer::new("not a url", Duration::from_secs(1)).is_err());
        let mailer = ResendMailer::new("https://api.resend.com/emails", Duration::from_secs(1))
            .expect("valid endpoint");
        assert_eq!(mailer.endpoint().path(), "/emails");
    }
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The submission pipeline.
//!
//! Stages run in this order and the first failure ends the request:
//! method, rate limit, body validation, email configuration, delivery.
//! The rate limit is counted before the body is looked at, so malformed
//! bodies still use up the client's allowance.

use crate::config::EmailConfig;
use crate::error::GateError;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::{DeliveryError, DeliveryReceipt, Mailer, OutboundEmail};
use crate::validator::{Submission, SubmissionValidator, ValidationResult};
use axum::http::Method;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct ContactGate {
    limiter: RateLimiter,
    validator: SubmissionValidator,
    mailer: Arc<dyn Mailer>,
    email: EmailConfig,
}

impl ContactGate {
    pub fn new(
        limiter: RateLimiter,
        validator: SubmissionValidator,
        mailer: Arc<dyn Mailer>,
        email: EmailConfig,
    ) -> Self {
        Self {
            limiter,
            validator,
            mailer,
            email,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run one request from `client` through every stage.
    pub async fn submit(
        &self,
        method: &Method,
        client: &str,
        body: &[u8],
        now_ms: i64,
    ) -> Result<DeliveryReceipt, GateError> {
        if *method != Method::POST {
            return Err(GateError::MethodNotAllowed);
        }

        if let RateLimitResult::Limited { retry_after } = self.limiter.check(client, now_ms).await {
            info!(
                client = %client,
                retry_after_secs = retry_after.as_secs(),
                "Submission rate limited"
            );
            return Err(GateError::RateLimited {
                retry_after_secs: retry_after.as_secs(),
            });
        }

        let submission = Submission::from_body(body);
        if let ValidationResult::Invalid(err) = self.validator.validate(&submission, now_ms) {
            info!(client = %client, reason = err.code(), "Submission rejected");
            return Err(err.into());
        }

        let Some((api_key, to)) = self.email.credentials() else {
            error!("RESEND_API_KEY or CONTACT_TO_EMAIL is not set");
            return Err(GateError::NotConfigured);
        };

        let email = OutboundEmail::compose(&self.email.from_address, to, &submission);
        match self.mailer.send(api_key, &email).await {
            Ok(receipt) => {
                info!(client = %client, id = ?receipt.id, "Contact message delivered");
                Ok(receipt)
            }
            Err(err) => {
                match &err {
                    DeliveryError::Transport(e) => error!(client = %client, error = %e, "Delivery failed"),
                    other => warn!(client = %client, error = %other, "Delivery failed"),
                }
                Err(err.into())
            }
        }
    }
}

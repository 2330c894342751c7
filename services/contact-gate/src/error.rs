// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact gate.
//!
//! Every failure ends up as `{"success": false, "message": ...}` with a
//! status code for its category. Provider and transport details stay in the
//! logs.

use crate::mailer::DeliveryError;
use crate::validator::ValidationError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error("Too many requests. Please wait before trying again.")]
    RateLimited { retry_after_secs: u64 },

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("Server email environment is not configured.")]
    NotConfigured,

    #[error("{}", .0.as_deref().unwrap_or("Failed to deliver email."))]
    Upstream(Option<String>),

    #[error("Unable to process contact request.")]
    Internal,
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<DeliveryError> for GateError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::Rejected { message, .. } => Self::Upstream(message),
            DeliveryError::Timeout => Self::Upstream(None),
            DeliveryError::Transport(_) => Self::Internal,
        }
    }
}

/// Body returned for every contact request.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Provider message id; present (possibly null) only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<String>>,
}

impl ContactResponse {
    pub fn delivered(id: Option<String>) -> Self {
        Self {
            success: true,
            message: None,
            id: Some(id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            id: None,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(ContactResponse::failed(self.to_string()))).into_response();

        match self {
            Self::MethodNotAllowed => {
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static("POST"));
            }
            Self::RateLimited { retry_after_secs } => {
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            }
            _ => {}
        }
        response
    }
}

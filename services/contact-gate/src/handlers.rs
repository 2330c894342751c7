// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact gate service.

use crate::config::{normalize_route, Config};
use crate::error::ContactResponse;
use crate::gate::ContactGate;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

/// Shared application state.
pub struct AppState {
    pub gate: ContactGate,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route(&normalize_route(&state.config.route_path), any(contact))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Contact form submission.
///
/// Routed for every method so that non-POST requests get the same JSON
/// failure body as every other rejection. A body that cannot be buffered
/// (too large, aborted) is treated as empty, so the request is still counted
/// against the client and fails validation.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let client = client_key(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let now_ms = chrono::Utc::now().timestamp_millis();
    let body = body.unwrap_or_else(|rejection| {
        debug!(client = %client, error = %rejection, "Unreadable request body");
        Bytes::new()
    });
    debug!(client = %client, method = %method, bytes = body.len(), "Processing contact submission");

    match state.gate.submit(&method, &client, &body, now_ms).await {
        Ok(receipt) => (StatusCode::OK, Json(ContactResponse::delivered(receipt.id))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Identify the client for rate limiting: first `X-Forwarded-For` entry,
/// then `X-Real-IP`, then the peer address, then `"unknown"`.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };

    if let Some(forwarded) = header_value("x-forwarded-for") {
        return forwarded.split(',').next().unwrap_or_default().trim().to_string();
    }
    if let Some(real_ip) = header_value("x-real-ip") {
        return real_ip.trim().to_string();
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

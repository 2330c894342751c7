// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate Service
//!
//! Accepts the portfolio contact form and forwards accepted messages to
//! Resend.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! read first if present):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT_ROUTE`: Submission path (default: /api/contact)
//! - `ALLOWED_ORIGINS`: Comma separated CORS origins
//! - `RATE_LIMIT_MAX_REQUESTS`: Submissions per client per window (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 600)
//! - `RESEND_API_KEY`, `CONTACT_TO_EMAIL`: required for delivery
//! - `CONTACT_FROM_EMAIL`: Sender override

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gate::{
    config::Config,
    gate::ContactGate,
    handlers::{router, AppState},
    limiter::RateLimiter,
    mailer::ResendMailer,
    validator::SubmissionValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        route = %config.route_path,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "Starting contact gate"
    );
    if config.email.credentials().is_none() {
        warn!("Email provider is not configured; submissions will be rejected");
    }

    let mailer = ResendMailer::new(&config.email.api_url, config.email.timeout())?;
    let gate = ContactGate::new(
        RateLimiter::new(config.rate_limit.clone()),
        SubmissionValidator::new(config.validation.clone()),
        Arc::new(mailer),
        config.email.clone(),
    );

    let state = Arc::new(AppState {
        gate,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.rate_limit.sweep_interval());
        loop {
            interval.tick().await;
            let now_ms = chrono::Utc::now().timestamp_millis();
            cleanup_state.gate.limiter().cleanup(now_ms).await;
        }
    });

    let app = router(state.clone());

    let addr: SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gate.
//!
//! Defaults match the portfolio contact form: 5 submissions per client per
//! 10 minutes, a 4 second minimum fill time, a 2 hour maximum form age and
//! Resend as the delivery provider.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the contact gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path the contact form posts to (default: /api/contact)
    #[serde(default = "default_route_path")]
    pub route_path: String,

    /// Origins allowed to call the endpoint from a browser
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Submission validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Email provider configuration
    #[serde(default)]
    pub email: EmailConfig,
}

/// Per-client fixed window limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per client per window (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often expired entries are swept in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Anti-spam heuristics applied to every submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Expected answer to the human challenge (default: "7")
    #[serde(default = "default_challenge_answer")]
    pub challenge_answer: String,

    /// Minimum time between form render and submit in ms (default: 4000)
    #[serde(default = "default_min_fill_ms")]
    pub min_fill_ms: u64,

    /// Maximum age of a form before it is considered stale in ms (default: 2h)
    #[serde(default = "default_max_form_age_ms")]
    pub max_form_age_ms: u64,

    /// Minimum trimmed message length in characters (default: 10)
    #[serde(default = "default_min_message_chars")]
    pub min_message_chars: usize,
}

/// Transactional email provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Provider message-send endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token for the provider
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Where contact messages are delivered
    #[serde(default)]
    pub to_address: Option<String>,

    /// Sender identity used on outbound messages
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Upper bound on a single delivery attempt in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_route_path() -> String {
    "/api/contact".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["https://localhost".to_string()]
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    10 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_challenge_answer() -> String {
    "7".to_string()
}

fn default_min_fill_ms() -> u64 {
    4_000
}

fn default_max_form_age_ms() -> u64 {
    2 * 60 * 60 * 1000
}

fn default_min_message_chars() -> usize {
    10
}

fn default_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from_address() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            route_path: default_route_path(),
            allowed_origins: default_allowed_origins(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            challenge_answer: default_challenge_answer(),
            min_fill_ms: default_min_fill_ms(),
            max_form_age_ms: default_max_form_age_ms(),
            min_message_chars: default_min_message_chars(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            to_address: None,
            from_address: default_from_address(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Window length in milliseconds, the unit the limiter counts in.
    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window_duration().as_millis()).unwrap_or(i64::MAX)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl EmailConfig {
    /// API key and destination, or `None` when either is missing or blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let to = self.to_address.as_deref().filter(|t| !t.trim().is_empty())?;
        Some((key, to))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables, keeping defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let origins = env_string("ALLOWED_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_origins);

        Config {
            bind_addr: env_string("BIND_ADDR").unwrap_or(defaults.bind_addr),
            route_path: env_string("CONTACT_ROUTE")
                .map(|route| normalize_route(&route))
                .unwrap_or(defaults.route_path),
            allowed_origins: origins,
            rate_limit: RateLimitConfig {
                max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", default_max_requests()),
                window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", default_window_secs()),
                sweep_interval_secs: env_parse(
                    "RATE_LIMIT_SWEEP_SECS",
                    default_sweep_interval_secs(),
                ),
            },
            validation: ValidationConfig {
                challenge_answer: env_string("HUMAN_CHALLENGE_ANSWER")
                    .unwrap_or_else(default_challenge_answer),
                ..Default::default()
            },
            email: EmailConfig {
                api_url: env_string("RESEND_API_URL").unwrap_or_else(default_api_url),
                api_key: env_string("RESEND_API_KEY"),
                to_address: env_string("CONTACT_TO_EMAIL"),
                from_address: env_string("CONTACT_FROM_EMAIL")
                    .unwrap_or_else(default_from_address),
                timeout_secs: env_parse("EMAIL_TIMEOUT_SECS", default_timeout_secs()),
            },
        }
    }
}

/// Route path with the leading `/` the router requires.
pub fn normalize_route(route: &str) -> String {
    let route = route.trim();
    if route.starts_with('/') {
        return route.to_string();
    }
    if route.is_empty() {
        warn!("Empty contact route, using {}", default_route_path());
        return default_route_path();
    }
    warn!(route = %route, "Contact route has no leading '/', prepending one");
    format!("/{route}")
}

/// Non-blank environment variable.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env_string(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, %default, "Invalid value, using default");
            default
        }),
        None => {
            debug!(key, %default, "Not set, using default");
            default
        }
    }
}

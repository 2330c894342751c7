// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate
//!
//! Relays portfolio contact form submissions to a transactional email
//! provider after screening them:
//!
//! - Per-client rate limiting (5 submissions per 10 minutes default)
//! - Required fields
//! - Honeypot field
//! - Static human challenge
//! - Form fill timing window
//! - Email syntax and message length

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod validator;

pub use config::Config;
pub use error::GateError;
pub use gate::ContactGate;
pub use limiter::{MemoryStore, RateLimitResult, RateLimitStore, RateLimiter};
pub use mailer::{Mailer, ResendMailer};
pub use validator::{SubmissionValidator, ValidationResult};

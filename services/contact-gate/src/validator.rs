// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission validator.
//!
//! Runs the body checks in a fixed order and stops at the first failure:
//! - Required fields (name, email, message)
//! - Honeypot field left empty
//! - Human challenge answer
//! - Form fill timing window
//! - Email syntax
//! - Minimum message length
//!
//! The timing window relies on `formStartedAt`, which the client supplies.
//! It filters naive bots; anyone willing to forge the timestamp gets past it.

use crate::config::ValidationConfig;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// One contact form submission, with every text field already trimmed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Submission {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    /// Honeypot, hidden from humans
    #[serde(deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(deserialize_with = "lenient_string")]
    pub human_check: String,
    /// Epoch milliseconds when the form was rendered
    #[serde(deserialize_with = "lenient_number")]
    pub form_started_at: Option<f64>,
}

impl Submission {
    /// Parse a request body. Anything that is not a JSON object yields an
    /// empty submission, which then fails the required-field check. A key
    /// that appears more than once keeps its last value.
    pub fn from_body(body: &[u8]) -> Self {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                debug!("Submission body is not a JSON object");
                return Submission::default();
            }
            Err(e) => {
                debug!(error = %e, "Unparseable submission body");
                return Submission::default();
            }
        };
        Submission::deserialize(value).unwrap_or_else(|e| {
            debug!(error = %e, "Unusable submission body");
            Submission::default()
        })
    }
}

/// Non-string values become an empty string; strings are trimmed.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.trim().to_string(),
        _ => String::new(),
    })
}

/// Numbers and numeric strings are accepted; `None` means "not a finite number".
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields.")]
    MissingFields,

    #[error("Spam check failed.")]
    HoneypotFilled,

    #[error("Human challenge failed.")]
    ChallengeFailed,

    #[error("Form validation failed. Please try again.")]
    TimingWindow,

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Message must be at least {min} characters.")]
    MessageTooShort { min: usize },
}

impl ValidationError {
    /// Short machine-readable tag for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::HoneypotFilled => "honeypot",
            Self::ChallengeFailed => "challenge",
            Self::TimingWindow => "timing",
            Self::InvalidEmail => "invalid_email",
            Self::MessageTooShort { .. } => "message_too_short",
        }
    }
}

/// Result of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Submission passed this check
    Valid,
    /// Submission is rejected
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

type Check = fn(&SubmissionValidator, &Submission, i64) -> ValidationResult;

/// Body checks in the order they run.
const CHECKS: [(&str, Check); 6] = [
    ("required_fields", |v, s, _| v.validate_required(s)),
    ("honeypot", |v, s, _| v.validate_honeypot(s)),
    ("human_challenge", |v, s, _| v.validate_challenge(s)),
    ("timing_window", |v, s, now| v.validate_timing(s, now)),
    ("email_syntax", |v, s, _| v.validate_email(s)),
    ("message_length", |v, s, _| v.validate_message(s)),
];

/// Contact submission validator.
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Name, email and message must all be non-empty.
    pub fn validate_required(&self, submission: &Submission) -> ValidationResult {
        if submission.name.is_empty() || submission.email.is_empty() || submission.message.is_empty() {
            return ValidationResult::Invalid(ValidationError::MissingFields);
        }
        ValidationResult::Valid
    }

    pub fn validate_honeypot(&self, submission: &Submission) -> ValidationResult {
        if submission.website.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::HoneypotFilled)
        }
    }

    pub fn validate_challenge(&self, submission: &Submission) -> ValidationResult {
        if submission.human_check == self.config.challenge_answer.trim() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::ChallengeFailed)
        }
    }

    /// The form must have been open for at least `min_fill_ms` and at most
    /// `max_form_age_ms` (both bounds inclusive).
    pub fn validate_timing(&self, submission: &Submission, now_ms: i64) -> ValidationResult {
        let Some(started_at) = submission.form_started_at else {
            return ValidationResult::Invalid(ValidationError::TimingWindow);
        };

        let elapsed = now_ms as f64 - started_at;
        if elapsed < self.config.min_fill_ms as f64 || elapsed > self.config.max_form_age_ms as f64 {
            debug!(elapsed_ms = elapsed, "Form timing outside window");
            return ValidationResult::Invalid(ValidationError::TimingWindow);
        }
        ValidationResult::Valid
    }

    pub fn validate_email(&self, submission: &Submission) -> ValidationResult {
        if is_email(&submission.email) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::InvalidEmail)
        }
    }

    /// The trimmed message must have at least `min_message_chars` characters.
    ///
    /// Length is counted in Unicode scalar values, so an emoji outside the
    /// Basic Multilingual Plane counts once. A browser's UTF-16 `length`
    /// counts it twice, which means a message of five such emoji passes a
    /// client-side check but is rejected here.
    pub fn validate_message(&self, submission: &Submission) -> ValidationResult {
        let min = self.config.min_message_chars;
        if submission.message.chars().count() < min {
            return ValidationResult::Invalid(ValidationError::MessageTooShort { min });
        }
        ValidationResult::Valid
    }

    /// Validate a complete submission at time `now_ms`.
    pub fn validate(&self, submission: &Submission, now_ms: i64) -> ValidationResult {
        for (name, check) in CHECKS {
            let result = check(self, submission, now_ms);
            if !result.is_valid() {
                debug!(check = name, "Submission rejected");
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Some dot must have text on both sides.
    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

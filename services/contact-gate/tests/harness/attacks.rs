// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack simulation patterns for security testing.

use super::generators::Filler;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated milliseconds between submissions
    pub spacing_ms: i64,
    /// Number of unique clients to simulate
    pub unique_clients: usize,
    /// How each submission is filled in
    pub filler: Filler,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            spacing_ms: 100,
            unique_clients: 1,
            filler: Filler::Human,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood with otherwise valid submissions.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            spacing_ms: 10,
            ..Default::default()
        }
    }

    /// Many clients, a handful of submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            spacing_ms: 5,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Bots that fill the hidden field.
    pub fn honeypot_bots() -> Self {
        Self {
            total_requests: 60,
            unique_clients: 60,
            filler: Filler::HoneypotBot,
            ..Default::default()
        }
    }

    /// Bots that submit the instant the page loads.
    pub fn speed_bots() -> Self {
        Self {
            total_requests: 60,
            unique_clients: 60,
            filler: Filler::SpeedBot,
            ..Default::default()
        }
    }

    /// Replaying an old captured form.
    pub fn replay() -> Self {
        Self {
            total_requests: 40,
            unique_clients: 40,
            filler: Filler::Replay,
            ..Default::default()
        }
    }

    /// Guessing the challenge from many addresses.
    pub fn challenge_guessing() -> Self {
        Self {
            total_requests: 90,
            unique_clients: 30,
            filler: Filler::Guesser,
            ..Default::default()
        }
    }

    /// One visitor every few minutes, never tripping the limiter.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 20,
            spacing_ms: 3 * 60 * 1000,
            ..Default::default()
        }
    }
}

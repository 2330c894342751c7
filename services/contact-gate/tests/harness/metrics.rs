// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for attack simulation results.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Delivered,
    RateLimited,
    MissingFields,
    Honeypot,
    Challenge,
    Timing,
    InvalidEmail,
    MessageTooShort,
    ServerError,
}

/// Collects metrics during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Outcome, usize>,
    requests_per_client: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
    /// Messages handed to the mailer
    pub deliveries: usize,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_client.entry(client.to_string()).or_insert(0) += 1;
        self.latencies.push(latency.as_micros() as u64);
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn report(&self) -> AttackReport {
        let total = self.total_requests();
        let delivered = self.count(Outcome::Delivered);
        let mut latencies = self.latencies.clone();
        latencies.sort_unstable();

        AttackReport {
            total_requests: total,
            delivered,
            rate_limited: self.count(Outcome::RateLimited),
            rejected_as_spam: self.count(Outcome::Honeypot)
                + self.count(Outcome::Challenge)
                + self.count(Outcome::Timing),
            invalid_input: self.count(Outcome::MissingFields)
                + self.count(Outcome::InvalidEmail)
                + self.count(Outcome::MessageTooShort),
            unique_clients: self.requests_per_client.len(),
            block_rate: if total == 0 {
                0.0
            } else {
                (total - delivered) as f64 / total as f64
            },
            median_latency_us: latencies.get(latencies.len() / 2).copied().unwrap_or(0),
            deliveries: self.deliveries,
        }
    }
}

/// Summary of one simulated attack.
#[derive(Debug, Clone)]
pub struct AttackReport {
    pub total_requests: usize,
    pub delivered: usize,
    pub rate_limited: usize,
    pub rejected_as_spam: usize,
    pub invalid_input: usize,
    pub unique_clients: usize,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub deliveries: usize,
}

impl fmt::Display for AttackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Attack Report ===")?;
        writeln!(f, "Total requests:   {}", self.total_requests)?;
        writeln!(f, "Delivered:        {}", self.delivered)?;
        writeln!(f, "Rate limited:     {}", self.rate_limited)?;
        writeln!(f, "Spam rejected:    {}", self.rejected_as_spam)?;
        writeln!(f, "Invalid input:    {}", self.invalid_input)?;
        writeln!(f, "Unique clients:   {}", self.unique_clients)?;
        writeln!(f, "Block rate:       {:.1}%", self.block_rate * 100.0)?;
        write!(f, "Median latency:   {}us", self.median_latency_us)
    }
}

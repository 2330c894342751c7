// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// How a simulated submission is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filler {
    /// A person who took their time and answered correctly
    Human,
    /// Fills every field it finds, including the honeypot
    HoneypotBot,
    /// Submits faster than anyone can type
    SpeedBot,
    /// Replays a form rendered hours ago
    Replay,
    /// Guesses the challenge answer
    Guesser,
}

/// Generate a pool of client addresses for testing.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// Build a JSON body as `filler` would submit it at `now_ms`.
pub fn generate_submission(filler: Filler, index: usize, now_ms: i64) -> Vec<u8> {
    let mut body = json!({
        "name": format!("Visitor {index}"),
        "email": format!("visitor{index}@example.com"),
        "message": "Hi, I'd love to collaborate on a project.",
        "website": "",
        "humanCheck": "7",
        "formStartedAt": now_ms - 20_000,
    });

    match filler {
        Filler::Human => {}
        Filler::HoneypotBot => body["website"] = json!(format!("https://cheap-pills-{index}.example")),
        Filler::SpeedBot => body["formStartedAt"] = json!(now_ms - 150),
        Filler::Replay => body["formStartedAt"] = json!(now_ms - 5 * 60 * 60 * 1000),
        Filler::Guesser => body["humanCheck"] = json!(((index % 9) + 8).to_string()),
    }

    body.to_string().into_bytes()
}

/// Bodies that should never get past the required-field check.
pub fn generate_malformed_bodies() -> Vec<&'static str> {
    vec![
        "",
        "{",
        "null",
        "[]",
        "\"name\"",
        r#"{"name": 1, "email": true, "message": null}"#,
        r#"{"name": "   ", "email": "a@b.com", "message": "long enough message"}"#,
    ]
}

/// Email addresses the syntax check must reject.
pub fn generate_invalid_emails() -> Vec<Value> {
    vec![
        json!("plainaddress"),
        json!("@no-local.com"),
        json!("no-domain@"),
        json!("no-dot@localhost"),
        json!("two@@example.com"),
        json!("spa ce@example.com"),
        json!("trailing@example."),
        json!("leading@.example"),
    ]
}

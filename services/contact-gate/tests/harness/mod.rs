// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for contact gate abuse simulation.
//!
//! Simulates bot and flood patterns against the gate to check that the
//! rate limiter and spam heuristics stop them before anything is sent.

pub mod attacks;
pub mod generators;
pub mod metrics;

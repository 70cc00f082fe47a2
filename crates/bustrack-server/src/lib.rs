//! JSON-over-HTTP surface for the bustrack core.
//!
//! This crate is deliberately thin: handlers resolve each role action
//! (mark attendance, assign a driver, flip a bus status) into core
//! operations and serialize the result. All mutation and idempotence
//! rules live in `bustrack-core`.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

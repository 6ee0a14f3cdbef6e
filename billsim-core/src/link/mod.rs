//! Link-level reliability
//!
//! Alternating-bit acknowledgement between host and acceptor.

pub mod ack;

pub use ack::{AckDecision, AckTracker};

//! Safety monitoring
//!
//! Detects a silent host and fail-safes the acceptor.

pub mod watchdog;

pub use watchdog::{Watchdog, WatchdogStatus};

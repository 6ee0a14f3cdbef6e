//! Board-agnostic protocol engine for the bill acceptor simulator
//!
//! This crate contains all acceptor logic that does not depend on a
//! particular serial line or runtime:
//!
//! - Note-handling state machine (Idle → Accepting → Escrow → Stacking/Returning)
//! - One-shot ("ephemeral") status bits
//! - Acknowledgement / retry tracking
//! - Communication watchdog
//! - Operator command surface
//! - Configuration type definitions
//!
//! Time never advances on its own here: every time-dependent operation
//! takes the current time in milliseconds, and the runtime decides how
//! often to tick.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod acceptor;
pub mod command;
pub mod config;
pub mod link;
pub mod safety;
pub mod state;

pub use acceptor::Acceptor;
pub use command::{Command, CommandError, InsertOutcome, OneShot, RejectReason, Reply, Toggle};
pub use config::AcceptorConfig;

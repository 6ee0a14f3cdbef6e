//! Billsim Hardware Abstraction Layer
//!
//! Traits the acceptor engine uses to talk to its serial line, so the same
//! transmit loop can drive a host serial port, a loopback used in tests, or
//! a chip UART.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (billsim-host, etc.)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  billsim-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-io Read + Write + ReadReady   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::Transport`] - receive-available / transmit-frame contract

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, Parity, StopBits, Transport, UartConfig};

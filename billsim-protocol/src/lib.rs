//! Bill Acceptor Poll/Response Protocol
//!
//! This crate defines the serial protocol between a host controller (the
//! master) and a bill acceptor (the slave). The host polls, the acceptor
//! answers every poll with exactly one status frame.
//!
//! # Protocol Overview
//!
//! Frames are fixed length:
//! ```text
//! ┌─────┬─────┬─────────┬───────┬───────┬────────────┬──────┬───────┬─────┬─────┬──────────┐
//! │ STX │ LEN │ ACK/TYP │ STATE │ EVENT │ EXT|VALUE  │ RESD │ MODEL │ REV │ ETX │ CHECKSUM │
//! │ 02  │ 0B  │ 1B      │ 1B    │ 1B    │ 1B         │ 00   │ 1B    │ 1B  │ 03  │ 1B       │
//! └─────┴─────┴─────────┴───────┴───────┴────────────┴──────┴───────┴─────┴─────┴──────────┘
//! ```
//!
//! The checksum is the XOR of bytes 1 through 8. Bit 0 of byte 2 carries the
//! alternating acknowledgement sequence used to detect lost frames.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod flags;
pub mod frame;
pub mod messages;

pub use flags::{EventBits, ExtBits, StateBits};
pub use frame::{checksum, verify_checksum, FrameError, ETX, FRAME_LEN, LEN_BYTE, STX};
pub use messages::{HostPoll, StatusFrame, StatusMessage};

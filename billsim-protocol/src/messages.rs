//! Message types for the acceptor protocol
//!
//! - Host → Acceptor: [`HostPoll`], carrying the ack bit, note enables and
//!   stack/return requests
//! - Acceptor → Host: [`StatusMessage`], carrying state, events, extended
//!   status and the escrowed note value

use crate::flags::{EventBits, ExtBits, StateBits, EXT_MASK, VALUE_SHIFT};
use crate::frame::{
    checksum, FrameError, CHECKSUM_INDEX, ETX, ETX_INDEX, FRAME_LEN, LEN_BYTE, MIN_POLL_LEN, STX,
};

/// Message type nibble for host → acceptor polls
pub const MSG_TYPE_POLL: u8 = 0x10;

/// Message type nibble for acceptor → host responses
pub const MSG_TYPE_STATUS: u8 = 0x20;

/// Ack sequence bit inside byte 2
pub const ACK_BIT: u8 = 0x01;

/// Host control bit: stack the escrowed note
pub const CTRL_STACK: u8 = 0x20;

/// Host control bit: return the escrowed note
pub const CTRL_RETURN: u8 = 0x40;

/// Note enable bits 0–6 map to notes 1–7
pub const ENABLE_MASK_ALL: u8 = 0x7F;

/// Encoded status frame as sent on the wire
pub type StatusFrame = [u8; FRAME_LEN];

/// Acceptor → host status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessage {
    /// Ack sequence bit echoed from the poll being answered (0 or 1)
    pub ack: u8,
    /// Device state, possibly with a one-shot bit merged in
    pub state: StateBits,
    /// Event and condition bits
    pub event: EventBits,
    /// Extended status bits
    pub ext: ExtBits,
    /// Note value (0–7), 0 when no note is held
    pub value: u8,
    /// Model identifier (0x00–0x7F)
    pub model: u8,
    /// Software revision (0x00–0x7F)
    pub revision: u8,
}

impl StatusMessage {
    /// Encode this message into a complete frame, checksum included
    pub fn encode(&self) -> StatusFrame {
        let mut frame = [
            STX,
            LEN_BYTE,
            MSG_TYPE_STATUS | (self.ack & ACK_BIT),
            self.state.bits(),
            self.event.bits(),
            (self.ext.bits() & EXT_MASK) | ((self.value & 0x07) << VALUE_SHIFT),
            0x00,
            self.model,
            self.revision,
            ETX,
            0x00,
        ];
        frame[CHECKSUM_INDEX] = checksum(&frame);
        frame
    }

    /// Decode the fields of an acceptor frame (host-side helper)
    pub fn decode(frame: &StatusFrame) -> Result<Self, FrameError> {
        if frame[0] != STX {
            return Err(FrameError::InvalidStart);
        }
        Ok(Self {
            ack: frame[2] & ACK_BIT,
            state: StateBits::from_bits_retain(frame[3]),
            event: EventBits::from_bits_retain(frame[4]),
            ext: ExtBits::from_bits_retain(frame[5] & EXT_MASK),
            value: frame[5] >> VALUE_SHIFT,
            model: frame[7],
            revision: frame[8],
        })
    }
}

/// Host → acceptor poll
///
/// Only the fields the acceptor acts on are kept; everything else in the
/// inbound frame, including its checksum, is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostPoll {
    /// Ack sequence bit (0 or 1)
    pub ack: u8,
    /// Note enable register, bit n-1 enables note n
    pub enable_mask: u8,
    /// Host asks to stack the escrowed note
    pub stack: bool,
    /// Host asks to return the escrowed note
    pub return_note: bool,
}

impl HostPoll {
    /// Read the poll fields from raw inbound bytes
    ///
    /// Fails only if fewer than five bytes were received.
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < MIN_POLL_LEN {
            return Err(FrameError::Incomplete);
        }
        Ok(Self {
            ack: bytes[2] & ACK_BIT,
            enable_mask: bytes[3] & ENABLE_MASK_ALL,
            stack: bytes[4] & CTRL_STACK != 0,
            return_note: bytes[4] & CTRL_RETURN != 0,
        })
    }

    /// Like [`HostPoll::parse`], but also requires the STX start byte
    pub fn parse_strict(bytes: &[u8]) -> Result<Self, FrameError> {
        let poll = Self::parse(bytes)?;
        if bytes[0] != STX {
            return Err(FrameError::InvalidStart);
        }
        Ok(poll)
    }

    /// Encode a poll the way a host controller would send it
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut ctrl = 0;
        if self.stack {
            ctrl |= CTRL_STACK;
        }
        if self.return_note {
            ctrl |= CTRL_RETURN;
        }
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = STX;
        frame[1] = LEN_BYTE;
        frame[2] = MSG_TYPE_POLL | (self.ack & ACK_BIT);
        frame[3] = self.enable_mask & ENABLE_MASK_ALL;
        frame[4] = ctrl;
        frame[ETX_INDEX] = ETX;
        frame[CHECKSUM_INDEX] = checksum(&frame);
        frame
    }
}

//! Raw framing for the acceptor protocol.
//!
//! Frame format (11 bytes, both directions):
//! - STX (1 byte): 0x02 synchronization byte
//! - LEN (1 byte): total frame length, always 0x0B
//! - bytes 2..=8: message body (see [`crate::messages`])
//! - ETX (1 byte): 0x03
//! - CHECKSUM (1 byte): XOR of bytes 1 through 8 (STX and ETX excluded)

/// Frame start byte
pub const STX: u8 = 0x02;

/// Frame end byte
pub const ETX: u8 = 0x03;

/// Length byte carried at offset 1
pub const LEN_BYTE: u8 = 0x0B;

/// Complete frame size in bytes
pub const FRAME_LEN: usize = LEN_BYTE as usize;

/// Offset of the ETX byte
pub const ETX_INDEX: usize = 9;

/// Offset of the checksum byte
pub const CHECKSUM_INDEX: usize = 10;

/// Fewest bytes a host poll must carry for its fields to be read
pub const MIN_POLL_LEN: usize = 5;

/// Errors that can occur while reading a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Not enough bytes to read the required fields
    Incomplete,
    /// First byte is not STX
    InvalidStart,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::Incomplete => write!(f, "frame too short"),
            FrameError::InvalidStart => write!(f, "frame does not start with STX"),
        }
    }
}

/// Calculate the checksum of a frame
///
/// XORs bytes 1 through 8 inclusive. Bytes beyond the end of a short
/// slice are treated as absent.
pub fn checksum(frame: &[u8]) -> u8 {
    frame
        .iter()
        .skip(1)
        .take(ETX_INDEX - 1)
        .fold(0u8, |acc, &byte| acc ^ byte)
}

/// Check that a complete frame carries a matching checksum
pub fn verify_checksum(frame: &[u8; FRAME_LEN]) -> bool {
    checksum(frame) == frame[CHECKSUM_INDEX]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_excludes_stx_and_etx() {
        let frame = [STX, 0x0B, 0x20, 0x01, 0x10, 0x01, 0x00, 0x01, 0x01, ETX, 0x00];
        // 0x0B ^ 0x20 ^ 0x01 ^ 0x10 ^ 0x01 ^ 0x00 ^ 0x01 ^ 0x01
        assert_eq!(checksum(&frame), 0x3B);
    }

    #[test]
    fn test_checksum_includes_revision_byte() {
        let mut a = [0u8; FRAME_LEN];
        let mut b = [0u8; FRAME_LEN];
        a[8] = 0x01;
        b[8] = 0x02;
        assert_ne!(checksum(&a), checksum(&b));
    }

    #[test]
    fn test_checksum_ignores_trailing_bytes() {
        let mut frame = [0u8; FRAME_LEN];
        frame[1] = 0x0B;
        let before = checksum(&frame);
        frame[ETX_INDEX] = 0xFF;
        frame[CHECKSUM_INDEX] = 0xEE;
        assert_eq!(checksum(&frame), before);
    }

    #[test]
    fn test_verify_checksum() {
        let mut frame = [STX, 0x0B, 0x21, 0x04, 0x10, 0x18, 0x00, 0x01, 0x01, ETX, 0x00];
        frame[CHECKSUM_INDEX] = checksum(&frame);
        assert!(verify_checksum(&frame));

        frame[4] ^= 0x02;
        assert!(!verify_checksum(&frame));
    }

    #[test]
    fn test_checksum_short_slice() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[STX]), 0);
        assert_eq!(checksum(&[STX, 0x0B, 0x10]), 0x1B);
    }
}

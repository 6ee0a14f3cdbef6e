//! Acknowledgement / retry tracking
//!
//! The host toggles bit 0 of every poll it sends after receiving a good
//! response. A poll that repeats the previous bit means our last response
//! was lost, so it is sent again unchanged.

/// What to answer a poll with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckDecision {
    /// Build and send a new frame stamped with `ack`
    Fresh { ack: u8 },
    /// Send the previous frame again, byte for byte
    Resend,
}

/// Tracks the ack bit expected in the next poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AckTracker {
    /// None until the first poll establishes the baseline
    expected: Option<u8>,
}

impl AckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide how to answer a poll carrying ack bit `ack`
    pub fn on_poll(&mut self, ack: u8) -> AckDecision {
        let ack = ack & 0x01;
        let expected = *self.expected.get_or_insert(ack);

        if ack != expected {
            return AckDecision::Resend;
        }

        self.expected = Some(expected ^ 0x01);
        AckDecision::Fresh { ack }
    }

    /// Ack bit expected in the next poll, if a baseline exists
    pub fn expected(&self) -> Option<u8> {
        self.expected
    }
}

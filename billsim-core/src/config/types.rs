//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of note denominations the acceptor recognises
pub const MAX_NOTE: u8 = 7;

/// Default cashbox capacity in notes
pub const DEFAULT_CASHBOX_CAPACITY: u32 = 250;

/// Acceptor behaviour settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct AcceptorConfig {
    /// Model identifier reported in byte 7 (0x00–0x7F)
    pub model: u8,
    /// Software revision reported in byte 8 (0x00–0x7F)
    pub revision: u8,
    /// Notes the cashbox holds before reporting stacker full
    pub cashbox_capacity: u32,
    /// Time a note spends moving between states (ms)
    pub transition_ms: u32,
    /// Time after start-up before the powering-up bit clears (ms)
    pub power_up_ms: u32,
    /// Chance (0–100) that a note is rejected as a cheat while cheat mode is on
    pub cheat_rate_percent: u8,
    /// Poll silence after which all notes are disabled (ms)
    pub watchdog_ms: u32,
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        Self {
            model: 0x01,
            revision: 0x01,
            cashbox_capacity: DEFAULT_CASHBOX_CAPACITY,
            transition_ms: 900,
            power_up_ms: 400,
            cheat_rate_percent: 50,
            watchdog_ms: 5000,
        }
    }
}

impl AcceptorConfig {
    /// Clamp out-of-range values into what the wire format can express
    pub fn sanitized(mut self) -> Self {
        self.model &= 0x7F;
        self.revision &= 0x7F;
        self.cheat_rate_percent = self.cheat_rate_percent.min(100);
        self
    }
}

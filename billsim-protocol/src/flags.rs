//! Bit registers carried in the status frame
//!
//! The state byte holds exactly one state bit (plus a one-shot Stacked or
//! Returned bit for a single frame). The event and extended bytes are
//! independent flag sets; several bits may be active at once.

use core::ops::{BitOr, BitOrAssign};

macro_rules! bit_register {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $flag:ident = $value:expr,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
        pub struct $name(u8);

        impl $name {
            $($(#[$fmeta])* pub const $flag: Self = Self($value);)*

            /// Register with no bits set
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Wrap a raw byte, keeping unknown bits
            pub const fn from_bits_retain(bits: u8) -> Self {
                Self(bits)
            }

            /// Raw byte value
            pub const fn bits(self) -> u8 {
                self.0
            }

            /// True when no bit is set
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// True when every bit of `other` is set
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Set the bits of `other`
            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Clear the bits of `other`
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Flip the bits of `other`
            pub fn toggle(&mut self, other: Self) {
                self.0 ^= other.0;
            }

            /// Set or clear the bits of `other`
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

bit_register! {
    /// Byte 3 of the status frame: device state
    StateBits {
        IDLE = 0x01,
        ACCEPTING = 0x02,
        ESCROW = 0x04,
        STACKING = 0x08,
        /// One-shot: note reached the cashbox
        STACKED = 0x10,
        RETURNING = 0x20,
        /// One-shot: note handed back to the customer
        RETURNED = 0x40,
    }
}

bit_register! {
    /// Byte 4 of the status frame: events and conditions
    EventBits {
        CHEATED = 0x01,
        REJECTED = 0x02,
        JAMMED = 0x04,
        STACKER_FULL = 0x08,
        /// Cashbox present
        LRC_OK = 0x10,
    }
}

bit_register! {
    /// Low three bits of byte 5 of the status frame
    ExtBits {
        POWERING_UP = 0x01,
        INVALID_COMMAND = 0x02,
        UNIT_FAILURE = 0x04,
    }
}

/// Mask of the extended bits inside byte 5 (the note value sits above)
pub const EXT_MASK: u8 = 0x07;

/// Shift of the note value inside byte 5
pub const VALUE_SHIFT: u8 = 3;

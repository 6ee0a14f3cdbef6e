//! One-shot status bits
//!
//! A value pushed here is OR'd into exactly one outgoing frame and then
//! discarded. Each frame byte that can carry one-shot bits has its own
//! queue.

use core::ops::BitOrAssign;

use billsim_protocol::{EventBits, ExtBits, StateBits};
use heapless::Deque;

/// Queue depth per byte; further pushes are folded into the newest entry
pub const EPHEMERAL_DEPTH: usize = 8;

/// One-shot bits taken from the queues for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drained {
    pub state: StateBits,
    pub event: EventBits,
    pub ext: ExtBits,
}

/// The three one-shot queues (state, event, extended)
#[derive(Debug, Clone, Default)]
pub struct EphemeralQueues {
    state: Deque<StateBits, EPHEMERAL_DEPTH>,
    event: Deque<EventBits, EPHEMERAL_DEPTH>,
    ext: Deque<ExtBits, EPHEMERAL_DEPTH>,
}

impl EphemeralQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot state bit (Stacked, Returned)
    pub fn push_state(&mut self, bits: StateBits) {
        push(&mut self.state, bits);
    }

    /// Queue a one-shot event bit (Rejected, Cheated)
    pub fn push_event(&mut self, bits: EventBits) {
        push(&mut self.event, bits);
    }

    /// Queue a one-shot extended bit (InvalidCommand, UnitFailure)
    pub fn push_ext(&mut self, bits: ExtBits) {
        push(&mut self.ext, bits);
    }

    /// Take everything queued, OR'd together per byte, and clear the queues
    pub fn drain(&mut self) -> Drained {
        Drained {
            state: take_all(&mut self.state),
            event: take_all(&mut self.event),
            ext: take_all(&mut self.ext),
        }
    }

    /// Discard everything queued without sending it
    pub fn flush(&mut self) {
        self.state.clear();
        self.event.clear();
        self.ext.clear();
    }

    /// Check if nothing is waiting to be sent
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.event.is_empty() && self.ext.is_empty()
    }
}

fn push<T: BitOrAssign + Copy>(queue: &mut Deque<T, EPHEMERAL_DEPTH>, bits: T) {
    if let Err(bits) = queue.push_back(bits) {
        // Full: the bits still go out with the same frame
        if let Some(newest) = queue.back_mut() {
            *newest |= bits;
        }
    }
}

fn take_all<T: BitOrAssign + Copy + Default>(queue: &mut Deque<T, EPHEMERAL_DEPTH>) -> T {
    let mut merged = T::default();
    while let Some(bits) = queue.pop_front() {
        merged |= bits;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_merges_and_clears() {
        let mut queues = EphemeralQueues::new();
        queues.push_event(EventBits::CHEATED);
        queues.push_event(EventBits::REJECTED);
        queues.push_ext(ExtBits::UNIT_FAILURE);

        let drained = queues.drain();
        assert_eq!(drained.event, EventBits::CHEATED | EventBits::REJECTED);
        assert_eq!(drained.ext, ExtBits::UNIT_FAILURE);
        assert!(drained.state.is_empty());
        assert!(queues.is_empty());

        assert_eq!(queues.drain(), Drained::default());
    }

    #[test]
    fn test_flush_discards() {
        let mut queues = EphemeralQueues::new();
        queues.push_state(StateBits::STACKED);
        queues.push_event(EventBits::REJECTED);
        queues.flush();
        assert!(queues.is_empty());
        assert_eq!(queues.drain(), Drained::default());
    }

    #[test]
    fn test_overflow_folds_into_newest() {
        let mut queues = EphemeralQueues::new();
        for _ in 0..EPHEMERAL_DEPTH {
            queues.push_ext(ExtBits::INVALID_COMMAND);
        }
        queues.push_ext(ExtBits::UNIT_FAILURE);

        let drained = queues.drain();
        assert_eq!(drained.ext, ExtBits::INVALID_COMMAND | ExtBits::UNIT_FAILURE);
    }
}

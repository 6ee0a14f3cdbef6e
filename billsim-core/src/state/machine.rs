//! State machine definition

use billsim_protocol::StateBits;

use super::events::NoteEvent;

/// Note-handling states
///
/// Exactly one is active at a time. The one-shot Stacked and Returned
/// conditions are not states: they ride along in a single frame through
/// the ephemeral state queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteState {
    /// Waiting for a note
    #[default]
    Idle,
    /// Note is being drawn in and validated
    Accepting,
    /// Note held; host decides to stack or return it
    Escrow,
    /// Note moving to the cashbox
    Stacking,
    /// Note moving back to the customer
    Returning,
}

impl NoteState {
    /// State byte value for this state
    pub fn bits(self) -> StateBits {
        match self {
            NoteState::Idle => StateBits::IDLE,
            NoteState::Accepting => StateBits::ACCEPTING,
            NoteState::Escrow => StateBits::ESCROW,
            NoteState::Stacking => StateBits::STACKING,
            NoteState::Returning => StateBits::RETURNING,
        }
    }

    /// Check if a new note may be inserted
    pub fn is_idle(&self) -> bool {
        matches!(self, NoteState::Idle)
    }

    /// Check if a validated note is inside the acceptor
    pub fn holds_note(&self) -> bool {
        matches!(
            self,
            NoteState::Escrow | NoteState::Stacking | NoteState::Returning
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: NoteEvent) -> Self {
        use NoteEvent::*;
        use NoteState::*;

        match (self, event) {
            (Idle, NoteInserted) => Accepting,

            (Accepting, NoteValidated) => Escrow,
            (Accepting, ValidationFailed) => Idle,

            // Host decisions only count while a note is in escrow
            (Escrow, StackRequested) => Stacking,
            (Escrow, ReturnRequested) => Returning,

            (Stacking, StackComplete) => Idle,
            (Returning, ReturnComplete) => Idle,

            (_, DoubleFeed) => Idle,

            _ => self,
        }
    }
}

/// Timed transition in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellKind {
    /// Accepting → Escrow (or back to Idle when the note was flagged as a cheat)
    Accept { note: u8, cheated: bool },
    /// Stacking → Idle + Stacked
    Stack,
    /// Returning → Idle + Returned
    Return,
}

impl DwellKind {
    /// State the acceptor must still be in for the dwell to commit
    pub fn origin(&self) -> NoteState {
        match self {
            DwellKind::Accept { .. } => NoteState::Accepting,
            DwellKind::Stack => NoteState::Stacking,
            DwellKind::Return => NoteState::Returning,
        }
    }
}

/// A timed transition and its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dwell {
    pub kind: DwellKind,
    pub due_ms: u64,
}

impl Dwell {
    pub fn new(kind: DwellKind, now_ms: u64, duration_ms: u32) -> Self {
        Self {
            kind,
            due_ms: now_ms.saturating_add(u64::from(duration_ms)),
        }
    }

    /// Check if the deadline has passed
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.due_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_flow() {
        let state = NoteState::Idle.transition(NoteEvent::NoteInserted);
        assert_eq!(state, NoteState::Accepting);

        let state = state.transition(NoteEvent::NoteValidated);
        assert_eq!(state, NoteState::Escrow);

        let state = state.transition(NoteEvent::StackRequested);
        assert_eq!(state, NoteState::Stacking);

        let state = state.transition(NoteEvent::StackComplete);
        assert_eq!(state, NoteState::Idle);
    }

    #[test]
    fn test_return_flow() {
        let state = NoteState::Escrow.transition(NoteEvent::ReturnRequested);
        assert_eq!(state, NoteState::Returning);
        assert_eq!(state.transition(NoteEvent::ReturnComplete), NoteState::Idle);
    }

    #[test]
    fn test_cheat_returns_to_idle() {
        let state = NoteState::Accepting.transition(NoteEvent::ValidationFailed);
        assert_eq!(state, NoteState::Idle);
    }

    #[test]
    fn test_host_requests_ignored_outside_escrow() {
        for state in [
            NoteState::Idle,
            NoteState::Accepting,
            NoteState::Stacking,
            NoteState::Returning,
        ] {
            assert_eq!(state.transition(NoteEvent::StackRequested), state);
            assert_eq!(state.transition(NoteEvent::ReturnRequested), state);
        }
    }

    #[test]
    fn test_double_feed_from_any_state() {
        for state in [
            NoteState::Accepting,
            NoteState::Escrow,
            NoteState::Stacking,
            NoteState::Returning,
        ] {
            assert_eq!(state.transition(NoteEvent::DoubleFeed), NoteState::Idle);
        }
    }

    #[test]
    fn test_insert_ignored_when_busy() {
        assert_eq!(
            NoteState::Escrow.transition(NoteEvent::NoteInserted),
            NoteState::Escrow
        );
    }

    #[test]
    fn test_state_bits() {
        assert_eq!(NoteState::Idle.bits().bits(), 0x01);
        assert_eq!(NoteState::Accepting.bits().bits(), 0x02);
        assert_eq!(NoteState::Escrow.bits().bits(), 0x04);
        assert_eq!(NoteState::Stacking.bits().bits(), 0x08);
        assert_eq!(NoteState::Returning.bits().bits(), 0x20);
    }

    #[test]
    fn test_dwell_deadline() {
        let dwell = Dwell::new(DwellKind::Stack, 1_000, 900);
        assert!(!dwell.is_due(1_899));
        assert!(dwell.is_due(1_900));
        assert_eq!(dwell.kind.origin(), NoteState::Stacking);
    }
}

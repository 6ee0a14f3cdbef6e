//! Events that trigger note state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    // Customer side
    /// A valid, enabled note was fed while idle
    NoteInserted,
    /// A second note was fed while one was still in flight
    DoubleFeed,

    // Validation
    /// Validation dwell finished, note accepted into escrow
    NoteValidated,
    /// Validation dwell finished, note flagged as a cheat
    ValidationFailed,

    // Host requests
    /// Host asked to stack the escrowed note
    StackRequested,
    /// Host asked to return the escrowed note
    ReturnRequested,

    // Transport completion
    /// Note reached the cashbox
    StackComplete,
    /// Note handed back to the customer
    ReturnComplete,
}

impl NoteEvent {
    /// Check if this event ends a timed dwell
    pub fn is_dwell_completion(&self) -> bool {
        matches!(
            self,
            NoteEvent::NoteValidated
                | NoteEvent::ValidationFailed
                | NoteEvent::StackComplete
                | NoteEvent::ReturnComplete
        )
    }
}

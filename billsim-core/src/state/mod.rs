//! Note-handling state machine
//!
//! The state machine is explicit and finite. Timed transitions (a note
//! moving through the acceptor) are recorded as a [`Dwell`] and committed
//! by the engine once their deadline passes.

pub mod ephemeral;
pub mod events;
pub mod machine;

pub use ephemeral::{Drained, EphemeralQueues};
pub use events::NoteEvent;
pub use machine::{Dwell, DwellKind, NoteState};

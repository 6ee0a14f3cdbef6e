//! Operator command surface
//!
//! Commands come from whatever drives the simulator (a console, a test,
//! a scripted driver). Each one either mutates persistent acceptor state
//! or queues a one-shot status bit.

use core::fmt;

/// Persistent conditions the operator can flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Event bit: note path jammed
    Jammed,
    /// Event bit: cashbox full
    StackerFull,
    /// Extended bit: acceptor still powering up
    PoweringUp,
    /// Cashbox present (drives the LRC event bit)
    LrcPresent,
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Toggle::Jammed => "Jammed",
            Toggle::StackerFull => "Stacker full",
            Toggle::PoweringUp => "Powering up",
            Toggle::LrcPresent => "Cashbox present",
        };
        f.write_str(name)
    }
}

/// One-shot bits the operator can queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShot {
    Rejected,
    InvalidCommand,
    UnitFailure,
}

/// Operator commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Feed note `n` (1–7)
    Insert(u8),
    /// Set the enable bit of note `n`
    Enable(u8),
    /// Clear the enable bit of note `n`
    Disable(u8),
    /// Flip a persistent condition
    Toggle(Toggle),
    /// Queue a one-shot Rejected event
    Reject,
    /// Queue a one-shot InvalidCommand bit
    SetInvalidCommand,
    /// Queue a one-shot UnitFailure bit
    SetUnitFailure,
    /// Empty the cashbox counter
    ResetNoteCount,
    /// Switch randomized cheat rejection on or off
    ToggleCheatMode,
    /// Report the note enable register
    QueryEnableMask,
}

/// Command parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing to parse
    Empty,
    /// Note index is not a number
    InvalidNote,
    /// Not a known command
    Unknown,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::InvalidNote => write!(f, "invalid note number"),
            CommandError::Unknown => write!(f, "unknown command"),
        }
    }
}

impl Command {
    /// Parse a console keystroke command
    ///
    /// `1`–`7` insert, `E<n>`/`D<n>` enable/disable, `C` cheat mode,
    /// `R` reject, `J` jammed, `F` stacker full, `P` cashbox present,
    /// `W` powering up, `I` invalid command, `X` unit failure,
    /// `Y` reset note count, `L` list enables. Letters are case-insensitive.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut chars = input.chars();
        let first = chars.next().ok_or(CommandError::Empty)?.to_ascii_uppercase();

        if input.bytes().all(|b| b.is_ascii_digit()) {
            return parse_note(input).map(Command::Insert);
        }

        match (first, chars.as_str()) {
            ('E', note) if !note.is_empty() => parse_note(note).map(Command::Enable),
            ('D', note) if !note.is_empty() => parse_note(note).map(Command::Disable),
            ('C', "") => Ok(Command::ToggleCheatMode),
            ('R', "") => Ok(Command::Reject),
            ('J', "") => Ok(Command::Toggle(Toggle::Jammed)),
            ('F', "") => Ok(Command::Toggle(Toggle::StackerFull)),
            ('P', "") => Ok(Command::Toggle(Toggle::LrcPresent)),
            ('W', "") => Ok(Command::Toggle(Toggle::PoweringUp)),
            ('I', "") => Ok(Command::SetInvalidCommand),
            ('X', "") => Ok(Command::SetUnitFailure),
            ('Y', "") => Ok(Command::ResetNoteCount),
            ('L', "") => Ok(Command::QueryEnableMask),
            _ => Err(CommandError::Unknown),
        }
    }
}

fn parse_note(digits: &str) -> Result<u8, CommandError> {
    digits.trim().parse().map_err(|_| CommandError::InvalidNote)
}

/// Why an inserted note was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Note index outside 1–7
    InvalidNote(u8),
    /// Note's enable bit is clear
    NoteDisabled(u8),
    /// Cashbox at capacity
    CashboxFull,
}

/// Result of feeding a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Note is being drawn in
    Accepting(u8),
    /// Note refused; a one-shot Rejected event was queued
    Rejected(RejectReason),
    /// Note fed while another was in flight; everything was flushed
    DoubleFeed,
}

/// What a dispatched command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Inserted(InsertOutcome),
    NoteEnabled(u8),
    NoteDisabled(u8),
    /// Enable/disable index outside 1–7; nothing changed
    InvalidNote(u8),
    Toggled { toggle: Toggle, active: bool },
    Queued(OneShot),
    NoteCountReset,
    CheatMode { enabled: bool, rate_percent: u8 },
    EnableMask(u8),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Inserted(InsertOutcome::Accepting(note)) => write!(f, "Accepting note {}", note),
            Reply::Inserted(InsertOutcome::Rejected(RejectReason::InvalidNote(note))) => {
                write!(f, "Invalid Bill Number {}", note)
            }
            Reply::Inserted(InsertOutcome::Rejected(RejectReason::NoteDisabled(note))) => {
                write!(f, "Note {} disabled", note)
            }
            Reply::Inserted(InsertOutcome::Rejected(RejectReason::CashboxFull)) => {
                write!(f, "Cashbox full, note rejected")
            }
            Reply::Inserted(InsertOutcome::DoubleFeed) => write!(f, "Double feed, note rejected"),
            Reply::NoteEnabled(note) => write!(f, "Enabled note {}", note),
            Reply::NoteDisabled(note) => write!(f, "Disabled note {}", note),
            Reply::InvalidNote(note) => write!(f, "Invalid note {}", note),
            Reply::Toggled { toggle, active } => {
                write!(f, "{} {}", toggle, if *active { "on" } else { "off" })
            }
            Reply::Queued(OneShot::Rejected) => write!(f, "Rejected queued"),
            Reply::Queued(OneShot::InvalidCommand) => write!(f, "Invalid command queued"),
            Reply::Queued(OneShot::UnitFailure) => write!(f, "Unit failure queued"),
            Reply::NoteCountReset => write!(f, "Note count reset"),
            Reply::CheatMode {
                enabled: true,
                rate_percent,
            } => write!(f, "Cheat Mode Enabled: {}% Chance of Cheat", rate_percent),
            Reply::CheatMode { enabled: false, .. } => write!(f, "Cheat Mode Disabled"),
            Reply::EnableMask(mask) => write!(f, "Enable mask {:#010b}", mask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insert() {
        assert_eq!(Command::parse("3"), Ok(Command::Insert(3)));
        assert_eq!(Command::parse(" 7\n"), Ok(Command::Insert(7)));
        assert_eq!(Command::parse("0"), Ok(Command::Insert(0)));
        assert_eq!(Command::parse("12"), Ok(Command::Insert(12)));
        assert_eq!(Command::parse("999"), Err(CommandError::InvalidNote));
    }

    #[test]
    fn test_parse_enable_disable() {
        assert_eq!(Command::parse("E4"), Ok(Command::Enable(4)));
        assert_eq!(Command::parse("d2"), Ok(Command::Disable(2)));
        assert_eq!(Command::parse("Ex"), Err(CommandError::InvalidNote));
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!(Command::parse("C"), Ok(Command::ToggleCheatMode));
        assert_eq!(Command::parse("r"), Ok(Command::Reject));
        assert_eq!(Command::parse("J"), Ok(Command::Toggle(Toggle::Jammed)));
        assert_eq!(Command::parse("F"), Ok(Command::Toggle(Toggle::StackerFull)));
        assert_eq!(Command::parse("P"), Ok(Command::Toggle(Toggle::LrcPresent)));
        assert_eq!(Command::parse("W"), Ok(Command::Toggle(Toggle::PoweringUp)));
        assert_eq!(Command::parse("I"), Ok(Command::SetInvalidCommand));
        assert_eq!(Command::parse("X"), Ok(Command::SetUnitFailure));
        assert_eq!(Command::parse("Y"), Ok(Command::ResetNoteCount));
        assert_eq!(Command::parse("L"), Ok(Command::QueryEnableMask));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(Command::parse("Z"), Err(CommandError::Unknown));
        assert_eq!(Command::parse("JJ"), Err(CommandError::Unknown));
        assert_eq!(Command::parse("E"), Err(CommandError::Unknown));
    }

    #[test]
    fn test_reply_text() {
        let text = std::format!("{}", Reply::EnableMask(0x7F));
        assert_eq!(text, "Enable mask 0b01111111");

        let text = std::format!(
            "{}",
            Reply::CheatMode {
                enabled: true,
                rate_percent: 50
            }
        );
        assert_eq!(text, "Cheat Mode Enabled: 50% Chance of Cheat");
    }
}

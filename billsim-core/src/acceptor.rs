//! Acceptor protocol engine
//!
//! Owns every piece of acceptor state: the note state machine, the
//! persistent status registers, the one-shot queues, the ack tracker and
//! the watchdog. The runtime wraps one `Acceptor` in a mutex and drives it
//! from three places:
//!
//! - the transmit loop, with each host poll ([`Acceptor::handle_poll`])
//! - a periodic tick that commits timed transitions ([`Acceptor::tick`],
//!   [`Acceptor::check_watchdog`])
//! - the operator, through [`Acceptor::dispatch`]

use billsim_protocol::messages::ENABLE_MASK_ALL;
use billsim_protocol::{
    EventBits, ExtBits, FrameError, HostPoll, StateBits, StatusFrame, StatusMessage,
};
use log::{debug, info, warn};
use rand_core::RngCore;

use crate::command::{Command, InsertOutcome, OneShot, RejectReason, Reply, Toggle};
use crate::config::{AcceptorConfig, MAX_NOTE};
use crate::link::{AckDecision, AckTracker};
use crate::safety::{Watchdog, WatchdogStatus};
use crate::state::{Dwell, DwellKind, EphemeralQueues, NoteEvent, NoteState};

/// Enable bit for note `note` (1–7)
fn note_flag(note: u8) -> u8 {
    1 << (note - 1)
}

/// Bill acceptor protocol engine
pub struct Acceptor<R> {
    config: AcceptorConfig,
    /// Current note state
    state: NoteState,
    /// Persistent event bits (Jammed, StackerFull, LrcOk)
    events: EventBits,
    /// Persistent extended bits (PoweringUp)
    ext: ExtBits,
    /// Cashbox present
    lrc_present: bool,
    /// Value of the note in escrow (0 when none)
    note_value: u8,
    /// Note enable register, bit n-1 enables note n
    enable_mask: u8,
    /// Notes stacked since the last reset
    note_count: u32,
    /// Randomized cheat rejection
    cheat_mode: bool,
    ephemeral: EphemeralQueues,
    ack: AckTracker,
    /// Last frame sent, kept for resends
    last_frame: Option<StatusFrame>,
    /// Timed transition in progress
    dwell: Option<Dwell>,
    /// When the powering-up bit clears
    power_up_due_ms: Option<u64>,
    watchdog: Watchdog,
    rng: R,
}

impl<R: RngCore> Acceptor<R> {
    /// Power up a new acceptor at `now_ms`
    pub fn new(config: AcceptorConfig, rng: R, now_ms: u64) -> Self {
        let config = config.sanitized();
        Self {
            state: NoteState::Idle,
            events: EventBits::LRC_OK,
            ext: ExtBits::POWERING_UP,
            lrc_present: true,
            note_value: 0,
            enable_mask: ENABLE_MASK_ALL,
            note_count: 0,
            cheat_mode: false,
            ephemeral: EphemeralQueues::new(),
            ack: AckTracker::new(),
            last_frame: None,
            dwell: None,
            power_up_due_ms: Some(now_ms.saturating_add(u64::from(config.power_up_ms))),
            watchdog: Watchdog::new(config.watchdog_ms, now_ms),
            rng,
            config,
        }
    }

    /// Apply an operator command
    pub fn dispatch(&mut self, command: Command, now_ms: u64) -> Reply {
        match command {
            Command::Insert(note) => Reply::Inserted(self.insert(note, now_ms)),
            Command::Enable(note) => self.enable_note(note),
            Command::Disable(note) => self.disable_note(note),
            Command::Toggle(toggle) => self.toggle(toggle),
            Command::Reject => {
                self.ephemeral.push_event(EventBits::REJECTED);
                Reply::Queued(OneShot::Rejected)
            }
            Command::SetInvalidCommand => {
                self.ephemeral.push_ext(ExtBits::INVALID_COMMAND);
                Reply::Queued(OneShot::InvalidCommand)
            }
            Command::SetUnitFailure => {
                self.ephemeral.push_ext(ExtBits::UNIT_FAILURE);
                Reply::Queued(OneShot::UnitFailure)
            }
            Command::ResetNoteCount => {
                self.note_count = 0;
                Reply::NoteCountReset
            }
            Command::ToggleCheatMode => {
                self.cheat_mode = !self.cheat_mode;
                Reply::CheatMode {
                    enabled: self.cheat_mode,
                    rate_percent: self.config.cheat_rate_percent,
                }
            }
            Command::QueryEnableMask => Reply::EnableMask(self.enable_mask),
        }
    }

    /// Feed a note into the acceptor
    ///
    /// Checks run in order: note index, cashbox capacity, enable bit, then
    /// the double-feed guard. Every refusal queues a one-shot Rejected event.
    pub fn insert(&mut self, note: u8, now_ms: u64) -> InsertOutcome {
        if note == 0 || note > MAX_NOTE {
            warn!("Invalid Bill Number {}", note);
            return self.reject(RejectReason::InvalidNote(note));
        }

        if self.note_count >= self.config.cashbox_capacity {
            warn!("Cashbox full ({} notes), rejecting note {}", self.note_count, note);
            self.events.insert(EventBits::STACKER_FULL);
            return self.reject(RejectReason::CashboxFull);
        }

        if self.enable_mask & note_flag(note) == 0 {
            info!("Note {} disabled", note);
            return self.reject(RejectReason::NoteDisabled(note));
        }

        if !self.state.is_idle() {
            warn!("Double feed while {:?}, flushing", self.state);
            if self.state.holds_note() {
                info!("Dropping note {}", self.note_value);
            }
            self.ephemeral.flush();
            self.apply(NoteEvent::DoubleFeed);
            self.dwell = None;
            self.note_value = 0;
            self.ephemeral.push_event(EventBits::REJECTED);
            return InsertOutcome::DoubleFeed;
        }

        let cheated = self.cheat_mode && self.draw_cheat();
        if cheated {
            debug!("Cheat draw hit for note {}", note);
            self.ephemeral.push_event(EventBits::CHEATED);
        }

        self.apply(NoteEvent::NoteInserted);
        self.start_dwell(DwellKind::Accept { note, cheated }, now_ms);
        InsertOutcome::Accepting(note)
    }

    /// Set the enable bit of note `note`
    pub fn enable_note(&mut self, note: u8) -> Reply {
        if note == 0 || note > MAX_NOTE {
            return Reply::InvalidNote(note);
        }
        self.enable_mask |= note_flag(note);
        Reply::NoteEnabled(note)
    }

    /// Clear the enable bit of note `note`
    pub fn disable_note(&mut self, note: u8) -> Reply {
        if note == 0 || note > MAX_NOTE {
            return Reply::InvalidNote(note);
        }
        self.enable_mask &= !note_flag(note);
        Reply::NoteDisabled(note)
    }

    /// Flip a persistent condition
    pub fn toggle(&mut self, toggle: Toggle) -> Reply {
        let active = match toggle {
            Toggle::Jammed => {
                self.events.toggle(EventBits::JAMMED);
                self.events.contains(EventBits::JAMMED)
            }
            Toggle::StackerFull => {
                self.events.toggle(EventBits::STACKER_FULL);
                self.events.contains(EventBits::STACKER_FULL)
            }
            Toggle::PoweringUp => {
                self.ext.toggle(ExtBits::POWERING_UP);
                self.power_up_due_ms = None;
                self.ext.contains(ExtBits::POWERING_UP)
            }
            Toggle::LrcPresent => {
                self.lrc_present = !self.lrc_present;
                self.lrc_present
            }
        };
        Reply::Toggled { toggle, active }
    }

    /// Answer one host poll
    ///
    /// Resets the watchdog and takes the host's enable register. A poll that
    /// repeats the previous ack bit gets the last frame back unchanged;
    /// otherwise a new frame is built (consuming one-shot bits) and the
    /// host's stack/return request is applied.
    pub fn handle_poll(&mut self, inbound: &[u8], now_ms: u64) -> Result<StatusFrame, FrameError> {
        let poll = HostPoll::parse(inbound)?;

        self.watchdog.reset(now_ms);
        self.enable_mask = poll.enable_mask;

        let ack = match self.ack.on_poll(poll.ack) {
            AckDecision::Fresh { ack } => ack,
            AckDecision::Resend => match self.last_frame {
                Some(frame) => {
                    debug!("Bad ACK, resending last frame");
                    return Ok(frame);
                }
                None => poll.ack,
            },
        };

        let frame = self.build_frame(ack);
        self.apply_host_request(&poll, now_ms);
        self.last_frame = Some(frame);
        Ok(frame)
    }

    /// Commit timed transitions whose deadline has passed
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(due) = self.power_up_due_ms {
            if now_ms >= due {
                self.ext.remove(ExtBits::POWERING_UP);
                self.power_up_due_ms = None;
                info!("Power up complete");
            }
        }

        if let Some(dwell) = self.dwell {
            if dwell.is_due(now_ms) {
                self.dwell = None;
                self.complete_dwell(dwell.kind);
            }
        }
    }

    /// Advance the watchdog; disables all notes when it fires
    ///
    /// Returns true on the call that fired it.
    pub fn check_watchdog(&mut self, now_ms: u64) -> bool {
        if self.watchdog.poll(now_ms) {
            self.comm_timeout();
            return true;
        }
        false
    }

    /// Fail-safe for a silent host: stop accepting every note
    pub fn comm_timeout(&mut self) {
        warn!("Comm timeout");
        self.enable_mask = 0;
    }

    /// Disarm the watchdog for shutdown
    pub fn stop_watchdog(&mut self) {
        self.watchdog.stop();
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn note_value(&self) -> u8 {
        self.note_value
    }

    pub fn note_count(&self) -> u32 {
        self.note_count
    }

    pub fn enable_mask(&self) -> u8 {
        self.enable_mask
    }

    pub fn events(&self) -> EventBits {
        self.events
    }

    pub fn ext(&self) -> ExtBits {
        self.ext
    }

    pub fn cheat_mode(&self) -> bool {
        self.cheat_mode
    }

    pub fn last_frame(&self) -> Option<&StatusFrame> {
        self.last_frame.as_ref()
    }

    pub fn watchdog_status(&self) -> WatchdogStatus {
        self.watchdog.status()
    }

    pub fn config(&self) -> &AcceptorConfig {
        &self.config
    }

    /// Check if a timed transition is still running
    pub fn is_moving(&self) -> bool {
        self.dwell.is_some()
    }

    fn apply(&mut self, event: NoteEvent) {
        let next = self.state.transition(event);
        if event.is_dwell_completion() {
            debug!("Dwell done: {:?} -> {:?}", self.state, next);
        } else if next != self.state {
            debug!("{:?} --{:?}--> {:?}", self.state, event, next);
        }
        self.state = next;
    }

    fn reject(&mut self, reason: RejectReason) -> InsertOutcome {
        self.ephemeral.push_event(EventBits::REJECTED);
        InsertOutcome::Rejected(reason)
    }

    fn draw_cheat(&mut self) -> bool {
        self.rng.next_u32() % 100 < u32::from(self.config.cheat_rate_percent)
    }

    fn start_dwell(&mut self, kind: DwellKind, now_ms: u64) {
        self.dwell = Some(Dwell::new(kind, now_ms, self.config.transition_ms));
    }

    fn complete_dwell(&mut self, kind: DwellKind) {
        // A double feed may have forced the state elsewhere meanwhile
        if self.state != kind.origin() {
            debug!("Dropping superseded {:?}", kind);
            return;
        }

        match kind {
            DwellKind::Accept { note, cheated: false } => {
                self.apply(NoteEvent::NoteValidated);
                self.note_value = note;
                info!("Note {} in escrow", note);
            }
            DwellKind::Accept { note, cheated: true } => {
                self.apply(NoteEvent::ValidationFailed);
                self.ephemeral.push_event(EventBits::REJECTED);
                info!("Note {} rejected as cheat", note);
            }
            DwellKind::Stack => {
                self.apply(NoteEvent::StackComplete);
                self.ephemeral.push_state(StateBits::STACKED);
                self.note_count = self.note_count.saturating_add(1);
                info!("Note stacked ({} in cashbox)", self.note_count);
            }
            DwellKind::Return => {
                self.apply(NoteEvent::ReturnComplete);
                self.ephemeral.push_state(StateBits::RETURNED);
                info!("Note returned");
            }
        }
    }

    /// Stack or return the escrowed note if the host asked for it
    fn apply_host_request(&mut self, poll: &HostPoll, now_ms: u64) {
        if self.state != NoteState::Escrow {
            return;
        }

        let (event, kind) = if poll.stack {
            (NoteEvent::StackRequested, DwellKind::Stack)
        } else if poll.return_note {
            (NoteEvent::ReturnRequested, DwellKind::Return)
        } else {
            return;
        };

        self.apply(event);
        self.start_dwell(kind, now_ms);
    }

    /// Refresh derived conditions, merge one-shot bits and encode
    fn build_frame(&mut self, ack: u8) -> StatusFrame {
        self.events.set(EventBits::LRC_OK, self.lrc_present);
        if self.note_count >= self.config.cashbox_capacity {
            self.events.insert(EventBits::STACKER_FULL);
        }

        let drained = self.ephemeral.drain();
        let message = StatusMessage {
            ack,
            state: self.state.bits() | drained.state,
            event: self.events | drained.event,
            ext: self.ext | drained.ext,
            value: self.note_value,
            model: self.config.model,
            revision: self.config.revision,
        };

        // The value has gone out with the Stacked/Returned frame
        if self.state.is_idle() {
            self.note_value = 0;
        }

        message.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rng returning a fixed value, to force cheat draws either way
    struct FixedRng(u32);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.0
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.0)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            rand_core::impls::fill_bytes_via_next(self, dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn acceptor() -> Acceptor<FixedRng> {
        Acceptor::new(AcceptorConfig::default(), FixedRng(99), 0)
    }

    fn poll(ack: u8) -> [u8; 11] {
        HostPoll {
            ack,
            enable_mask: 0x7F,
            ..Default::default()
        }
        .encode()
    }

    #[test]
    fn test_power_up_defaults() {
        let mut acceptor = acceptor();
        assert_eq!(acceptor.state(), NoteState::Idle);
        assert_eq!(acceptor.enable_mask(), 0x7F);
        assert!(acceptor.ext().contains(ExtBits::POWERING_UP));
        assert!(acceptor.events().contains(EventBits::LRC_OK));

        acceptor.tick(399);
        assert!(acceptor.ext().contains(ExtBits::POWERING_UP));
        acceptor.tick(400);
        assert!(!acceptor.ext().contains(ExtBits::POWERING_UP));
    }

    #[test]
    fn test_insert_moves_to_escrow_after_dwell() {
        let mut acceptor = acceptor();
        assert_eq!(acceptor.insert(4, 1000), InsertOutcome::Accepting(4));
        assert_eq!(acceptor.state(), NoteState::Accepting);

        acceptor.tick(1899);
        assert_eq!(acceptor.state(), NoteState::Accepting);

        acceptor.tick(1900);
        assert_eq!(acceptor.state(), NoteState::Escrow);
        assert_eq!(acceptor.note_value(), 4);
        assert!(!acceptor.is_moving());
    }

    #[test]
    fn test_invalid_note_rejected() {
        let mut acceptor = acceptor();
        assert_eq!(
            acceptor.insert(0, 0),
            InsertOutcome::Rejected(RejectReason::InvalidNote(0))
        );
        assert_eq!(
            acceptor.insert(8, 0),
            InsertOutcome::Rejected(RejectReason::InvalidNote(8))
        );
        assert_eq!(acceptor.state(), NoteState::Idle);
    }

    #[test]
    fn test_enable_disable_register() {
        let mut acceptor = acceptor();
        assert_eq!(acceptor.disable_note(3), Reply::NoteDisabled(3));
        assert_eq!(acceptor.enable_mask(), 0x7B);
        assert_eq!(acceptor.enable_note(3), Reply::NoteEnabled(3));
        assert_eq!(acceptor.enable_mask(), 0x7F);
        assert_eq!(acceptor.disable_note(9), Reply::InvalidNote(9));
        assert_eq!(acceptor.enable_mask(), 0x7F);
    }

    #[test]
    fn test_disable_does_not_affect_note_in_flight() {
        let mut acceptor = acceptor();
        acceptor.insert(2, 0);
        acceptor.disable_note(2);
        acceptor.tick(900);
        assert_eq!(acceptor.state(), NoteState::Escrow);
        assert_eq!(acceptor.note_value(), 2);
    }

    #[test]
    fn test_toggles() {
        let mut acceptor = acceptor();
        assert_eq!(
            acceptor.toggle(Toggle::Jammed),
            Reply::Toggled {
                toggle: Toggle::Jammed,
                active: true
            }
        );
        assert!(acceptor.events().contains(EventBits::JAMMED));

        acceptor.toggle(Toggle::LrcPresent);
        let frame = acceptor.handle_poll(&poll(0), 0).unwrap();
        assert_eq!(frame[4] & EventBits::LRC_OK.bits(), 0);
        assert_ne!(frame[4] & EventBits::JAMMED.bits(), 0);
    }

    #[test]
    fn test_cheat_mode_rejects_after_dwell() {
        let mut acceptor = Acceptor::new(AcceptorConfig::default(), FixedRng(10), 0);
        acceptor.dispatch(Command::ToggleCheatMode, 0);
        assert!(acceptor.cheat_mode());

        assert_eq!(acceptor.insert(1, 0), InsertOutcome::Accepting(1));
        acceptor.tick(900);
        assert_eq!(acceptor.state(), NoteState::Idle);
        assert_eq!(acceptor.note_value(), 0);

        let frame = acceptor.handle_poll(&poll(0), 1000).unwrap();
        assert_ne!(frame[4] & EventBits::CHEATED.bits(), 0);
        assert_ne!(frame[4] & EventBits::REJECTED.bits(), 0);
    }

    #[test]
    fn test_cheat_mode_miss_goes_to_escrow() {
        let mut acceptor = Acceptor::new(AcceptorConfig::default(), FixedRng(50), 0);
        acceptor.dispatch(Command::ToggleCheatMode, 0);
        acceptor.insert(1, 0);
        acceptor.tick(900);
        assert_eq!(acceptor.state(), NoteState::Escrow);
    }

    #[test]
    fn test_stack_request_only_in_escrow() {
        let mut acceptor = acceptor();
        let stack = HostPoll {
            ack: 0,
            enable_mask: 0x7F,
            stack: true,
            return_note: false,
        };
        acceptor.handle_poll(&stack.encode(), 0).unwrap();
        assert_eq!(acceptor.state(), NoteState::Idle);
        assert!(!acceptor.is_moving());
    }

    #[test]
    fn test_return_flow_sends_returned_once() {
        let mut acceptor = acceptor();
        acceptor.insert(6, 0);
        acceptor.tick(900);

        let ret = HostPoll {
            ack: 0,
            enable_mask: 0x7F,
            stack: false,
            return_note: true,
        };
        acceptor.handle_poll(&ret.encode(), 1000).unwrap();
        assert_eq!(acceptor.state(), NoteState::Returning);

        acceptor.tick(1900);
        assert_eq!(acceptor.state(), NoteState::Idle);

        let frame = acceptor.handle_poll(&poll(1), 2000).unwrap();
        assert_eq!(frame[3], (StateBits::IDLE | StateBits::RETURNED).bits());
        assert_eq!(frame[5] >> 3, 6);

        let frame = acceptor.handle_poll(&poll(0), 2200).unwrap();
        assert_eq!(frame[3], StateBits::IDLE.bits());
        assert_eq!(frame[5] >> 3, 0);
        assert_eq!(acceptor.note_count(), 0);
    }

    #[test]
    fn test_operator_one_shots() {
        let mut acceptor = acceptor();
        acceptor.tick(400);
        acceptor.dispatch(Command::SetInvalidCommand, 400);
        acceptor.dispatch(Command::SetUnitFailure, 400);
        acceptor.dispatch(Command::Reject, 400);

        let frame = acceptor.handle_poll(&poll(0), 500).unwrap();
        assert_eq!(frame[5] & 0x07, 0x06);
        assert_ne!(frame[4] & EventBits::REJECTED.bits(), 0);

        let frame = acceptor.handle_poll(&poll(1), 700).unwrap();
        assert_eq!(frame[5] & 0x07, 0x00);
        assert_eq!(frame[4] & EventBits::REJECTED.bits(), 0);
    }

    #[test]
    fn test_query_enable_mask_tracks_host() {
        let mut acceptor = acceptor();
        let mut host = HostPoll {
            ack: 0,
            enable_mask: 0x05,
            ..Default::default()
        };
        acceptor.handle_poll(&host.encode(), 0).unwrap();
        assert_eq!(acceptor.dispatch(Command::QueryEnableMask, 0), Reply::EnableMask(0x05));

        host.ack = 1;
        host.enable_mask = 0x7F;
        acceptor.handle_poll(&host.encode(), 200).unwrap();
        assert_eq!(acceptor.enable_mask(), 0x7F);
    }

    #[test]
    fn test_short_poll_rejected() {
        let mut acceptor = acceptor();
        assert_eq!(
            acceptor.handle_poll(&[0x02, 0x0B, 0x10], 0),
            Err(FrameError::Incomplete)
        );
        assert!(acceptor.last_frame().is_none());
    }

    #[test]
    fn test_stop_watchdog() {
        let mut acceptor = acceptor();
        acceptor.stop_watchdog();
        assert!(!acceptor.check_watchdog(60_000));
        assert_eq!(acceptor.enable_mask(), 0x7F);
        assert_eq!(acceptor.watchdog_status(), WatchdogStatus::Stopped);
    }
}

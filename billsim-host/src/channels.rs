//! Inter-task communication channels
//!
//! Defines the static channels used between the embassy tasks and the
//! console thread. Uses embassy-sync primitives, which are safe to signal
//! from a plain OS thread.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use billsim_core::Command;

/// Channel capacity for operator commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Cleared once shutdown starts; loops check it at the top of each cycle
pub static RUNNING: AtomicBool = AtomicBool::new(true);

/// Operator commands from the console
pub static COMMANDS: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Operator asked to quit
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Transmit loop has exited and released the serial line
pub static POLL_STOPPED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Watchdog task has exited
pub static WATCHDOG_STOPPED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

pub fn is_running() -> bool {
    RUNNING.load(Ordering::Acquire)
}

/// Stop every loop at its next cycle
pub fn stop_running() {
    RUNNING.store(false, Ordering::Release);
}

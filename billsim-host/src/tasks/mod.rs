//! Embassy async tasks
//!
//! Each task runs independently and reaches the acceptor through one
//! shared mutex. The console reader is a plain thread, since stdin has no
//! async interface on the std executor.

pub mod commands;
pub mod console;
pub mod poll;
pub mod tick;
pub mod watchdog;

use billsim_core::Acceptor;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;
use rand_wyrand::WyRand;

pub use commands::command_task;
pub use console::spawn_console;
pub use poll::poll_task;
pub use tick::tick_task;
pub use watchdog::watchdog_task;

/// The acceptor shared between tasks
pub type SharedAcceptor = Mutex<CriticalSectionRawMutex, Acceptor<WyRand>>;

/// Milliseconds since start-up, the time base of the acceptor
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

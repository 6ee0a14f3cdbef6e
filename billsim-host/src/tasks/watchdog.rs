//! Communication watchdog task
//!
//! Checks the acceptor's watchdog a few times per interval so a silent
//! host is noticed promptly.

use embassy_time::{Duration, Ticker};
use log::{info, warn};

use super::{now_ms, SharedAcceptor};
use crate::channels::{is_running, WATCHDOG_STOPPED};

/// Checks per watchdog interval
const CHECKS_PER_INTERVAL: u64 = 10;

#[embassy_executor::task]
pub async fn watchdog_task(acceptor: &'static SharedAcceptor) {
    let interval_ms = u64::from(acceptor.lock().await.config().watchdog_ms);
    let period = (interval_ms / CHECKS_PER_INTERVAL).max(1);
    info!("Watchdog started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period));

    while is_running() {
        ticker.next().await;
        if acceptor.lock().await.check_watchdog(now_ms()) {
            warn!("Host silent for {} ms, all notes disabled", interval_ms);
        }
    }

    info!("Watchdog stopped");
    WATCHDOG_STOPPED.signal(());
}

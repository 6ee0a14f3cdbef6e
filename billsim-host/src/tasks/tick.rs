//! Tick task
//!
//! Commits timed transitions: the power-up delay and notes moving through
//! the acceptor.

use embassy_time::{Duration, Ticker};
use log::info;

use super::{now_ms, SharedAcceptor};
use crate::channels::is_running;

#[embassy_executor::task]
pub async fn tick_task(acceptor: &'static SharedAcceptor, tick_ms: u64) {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(tick_ms));

    while is_running() {
        ticker.next().await;
        acceptor.lock().await.tick(now_ms());
    }
}

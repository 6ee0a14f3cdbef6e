//! Transmit loop
//!
//! Answers host polls at a fixed cadence. Each cycle takes whatever bytes
//! the host has sent; if there are any, the acceptor builds (or resends)
//! a frame under the lock, and the frame is written after the lock is
//! released. A line error ends the loop but not the process.
//!
//! Every cycle treats the bytes waiting on the line as one poll. A poll
//! that straddles two cycles is therefore read as two: the head answers
//! normally and the tail (5 bytes or more) is taken as a poll of its own,
//! with its enable and control bytes read from the wrong offsets. Hosts
//! must leave the full cadence between polls.

use billsim_core::Acceptor;
use billsim_hal::Transport;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;
use log::{debug, error, info, trace};
use rand_core::RngCore;

use super::{now_ms, SharedAcceptor};
use crate::channels::{is_running, POLL_STOPPED};
use crate::serial::SerialLine;

/// Receive buffer; a poll is 11 bytes
const RX_BUF_LEN: usize = 64;

#[embassy_executor::task]
pub async fn poll_task(acceptor: &'static SharedAcceptor, mut line: SerialLine, interval_ms: u64) {
    info!("Transmit loop started");

    let mut buf = [0u8; RX_BUF_LEN];

    while is_running() {
        if let Err(e) = serve_once(acceptor, &mut line, &mut buf, now_ms()).await {
            error!("Serial line failed: {}", e);
            break;
        }
        Timer::after_millis(interval_ms).await;
    }

    drop(line);
    info!("Transmit loop stopped");
    POLL_STOPPED.signal(());
}

/// Run one cycle of the transmit loop
///
/// Returns whether a frame was written. Bytes too short to be a poll are
/// dropped without a reply. Any line error is returned, and ends the loop.
pub async fn serve_once<M, R, T>(
    acceptor: &Mutex<M, Acceptor<R>>,
    line: &mut T,
    buf: &mut [u8],
    now_ms: u64,
) -> Result<bool, T::Error>
where
    M: RawMutex,
    R: RngCore,
    T: Transport,
{
    let received = line.receive_available(buf)?;
    if received == 0 {
        return Ok(false);
    }
    trace!("RX {:02X?}", &buf[..received]);

    let reply = acceptor.lock().await.handle_poll(&buf[..received], now_ms);
    match reply {
        Ok(frame) => {
            line.transmit(&frame)?;
            trace!("TX {:02X?}", frame);
            Ok(true)
        }
        Err(e) => {
            debug!("Ignoring {} inbound bytes: {}", received, e);
            Ok(false)
        }
    }
}

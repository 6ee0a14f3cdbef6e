//! Operator command task
//!
//! Applies commands queued by the console and prints the reply.

use log::debug;

use super::{now_ms, SharedAcceptor};
use crate::channels::COMMANDS;

#[embassy_executor::task]
pub async fn command_task(acceptor: &'static SharedAcceptor) {
    loop {
        let command = COMMANDS.receive().await;
        debug!("Operator: {:?}", command);
        let reply = acceptor.lock().await.dispatch(command, now_ms());
        println!("{reply}");
    }
}

//! Console reader
//!
//! Reads one command per line from stdin on its own thread and queues it
//! for the command task. `Q` quits.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use billsim_core::{Command, CommandError};
use log::{info, warn};

use crate::channels::{COMMANDS, SHUTDOWN};

/// Start the console thread
pub fn spawn_console() -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".into())
        .spawn(|| run(io::stdin().lock()))
}

fn run<R: BufRead>(input: R) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case("q") {
            SHUTDOWN.signal(());
            return;
        }

        match Command::parse(line) {
            Ok(command) => {
                if COMMANDS.try_send(command).is_err() {
                    warn!("Command queue full, dropped {:?}", command);
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => println!("{e}: {line}"),
        }
    }
    info!("Console closed");
}

//! Billsim - Bill Acceptor Simulator
//!
//! Presents a serial bill acceptor to a host controller so that it can be
//! exercised without hardware. The host polls over the serial port; an
//! operator inserts notes and flips fault conditions from the console.

use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_sync::mutex::Mutex;
use log::{error, info};
use rand_core::SeedableRng;
use rand_wyrand::WyRand;
use static_cell::StaticCell;

use billsim_core::Acceptor;

use crate::channels::{stop_running, POLL_STOPPED, SHUTDOWN, WATCHDOG_STOPPED};
use crate::config::{load_config, Args, USAGE};
use crate::serial::SerialLine;
use crate::tasks::SharedAcceptor;

mod channels;
mod config;
mod logger;
mod serial;
mod tasks;

/// Embedded default configuration (compiled into the binary)
/// Edit acceptor.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../acceptor.toml");

static ACCEPTOR: StaticCell<SharedAcceptor> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    if let Err(e) = logger::init() {
        eprintln!("Logger unavailable: {e}");
    }

    let Some(args) = Args::parse(std::env::args().skip(1)) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let config = match load_config(args.config.as_deref(), EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let Some(port) = args.port.or_else(|| config.serial.port.clone()) else {
        eprintln!("No serial port given\n{USAGE}");
        std::process::exit(2);
    };

    let line = match config
        .serial
        .uart_config()
        .map_err(|e| e.to_string())
        .and_then(|uart| SerialLine::open(&port, &uart).map_err(|e| e.to_string()))
    {
        Ok(line) => line,
        Err(e) => {
            error!("Failed to open {}: {}", port, e);
            std::process::exit(1);
        }
    };
    info!(
        "Opened {} at {} baud",
        line.name().unwrap_or(port),
        config.serial.baudrate
    );

    let seed = config.runtime.rng_seed.unwrap_or_else(clock_seed);
    let acceptor = Acceptor::new(config.acceptor, WyRand::seed_from_u64(seed), tasks::now_ms());
    let acceptor: &'static SharedAcceptor = ACCEPTOR.init(Mutex::new(acceptor));

    // Spawn tasks
    spawner
        .spawn(tasks::poll_task(acceptor, line, config.runtime.poll_interval_ms))
        .unwrap();
    spawner
        .spawn(tasks::tick_task(acceptor, config.runtime.tick_ms))
        .unwrap();
    spawner.spawn(tasks::watchdog_task(acceptor)).unwrap();
    spawner.spawn(tasks::command_task(acceptor)).unwrap();

    if let Err(e) = tasks::spawn_console() {
        error!("Console unavailable: {}", e);
    }

    info!("Acceptor running, enter Q to quit");

    SHUTDOWN.wait().await;

    info!("Shutting down");
    stop_running();
    acceptor.lock().await.stop_watchdog();
    join(POLL_STOPPED.wait(), WATCHDOG_STOPPED.wait()).await;
    info!("Port closed");
    log::logger().flush();

    std::process::exit(0);
}

/// Seed for cheat draws when the config does not fix one
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

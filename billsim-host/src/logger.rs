//! stderr logger
//!
//! Installs a `log` backend that writes every record to stderr and, when
//! `BILLSIM_LOG_PATH` names a file, appends it there too. The level comes
//! from `BILLSIM_LOG` (`error`, `warn`, `info`, `debug`, `trace`, `off`).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use static_cell::StaticCell;

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "BILLSIM_LOG";

/// Environment variable naming a file to append log lines to
pub const LOG_PATH_ENV: &str = "BILLSIM_LOG_PATH";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

static LOGGER: StaticCell<Logger> = StaticCell::new();

pub struct Logger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
    start: Instant,
}

impl Logger {
    /// Build a logger from `BILLSIM_LOG` and `BILLSIM_LOG_PATH`
    pub fn from_env() -> Self {
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|value| parse_level(&value))
            .unwrap_or(DEFAULT_LEVEL);
        let file = std::env::var(LOG_PATH_ENV).ok().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        Self::new(level, file)
    }

    pub fn new(level: LevelFilter, file: Option<File>) -> Self {
        Self {
            level,
            file: file.map(Mutex::new),
            start: Instant::now(),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    fn format(&self, record: &Record) -> String {
        let elapsed = self.start.elapsed();
        format!(
            "[{:>5}.{:03} {:<5} {}] {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        eprintln!("{line}");
        if let Some(file) = self.file.as_ref() {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{line}");
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.as_ref() {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Parse a level name, case-insensitively
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Install the logger for the rest of the process
///
/// Must be called once, before any task starts.
pub fn init() -> Result<(), SetLoggerError> {
    let logger: &'static Logger = LOGGER.init(Logger::from_env());
    log::set_logger(logger)?;
    log::set_max_level(logger.level());
    Ok(())
}

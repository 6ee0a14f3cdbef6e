//! TOML configuration loader

use std::fmt;
use std::path::Path;

use billsim_core::AcceptorConfig;
use billsim_hal::{DataBits, Parity, StopBits, UartConfig};
use serde::Deserialize;

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config file is not valid TOML for this schema
    Parse(toml::de::Error),
    /// A value is outside what the serial line supports
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config: {e}"),
            ConfigError::Invalid(what) => write!(f, "invalid config: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Complete host configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    pub serial: SerialConfig,
    pub acceptor: AcceptorConfig,
    pub runtime: RuntimeConfig,
}

/// `[serial]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    /// Port used when none is given on the command line
    pub port: Option<String>,
    pub baudrate: u32,
    /// 7 or 8
    pub data_bits: u8,
    /// "none", "even" or "odd"
    pub parity: String,
    /// 1 or 2
    pub stop_bits: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        let uart = UartConfig::default();
        Self {
            port: None,
            baudrate: uart.baudrate,
            data_bits: 7,
            parity: "even".into(),
            stop_bits: 1,
        }
    }
}

impl SerialConfig {
    /// Convert to line settings
    pub fn uart_config(&self) -> Result<UartConfig, ConfigError> {
        if self.baudrate == 0 {
            return Err(ConfigError::Invalid("serial.baudrate must be non-zero"));
        }
        let data_bits = match self.data_bits {
            7 => DataBits::Seven,
            8 => DataBits::Eight,
            _ => return Err(ConfigError::Invalid("serial.data_bits must be 7 or 8")),
        };
        let parity = match self.parity.to_ascii_lowercase().as_str() {
            "none" => Parity::None,
            "even" => Parity::Even,
            "odd" => Parity::Odd,
            _ => {
                return Err(ConfigError::Invalid(
                    "serial.parity must be none, even or odd",
                ))
            }
        };
        let stop_bits = match self.stop_bits {
            1 => StopBits::One,
            2 => StopBits::Two,
            _ => return Err(ConfigError::Invalid("serial.stop_bits must be 1 or 2")),
        };
        Ok(UartConfig {
            baudrate: self.baudrate,
            data_bits,
            parity,
            stop_bits,
        })
    }
}

/// `[runtime]` section, host scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Transmit loop cadence (ms)
    pub poll_interval_ms: u64,
    /// Dwell and power-up tick (ms)
    pub tick_ms: u64,
    /// Fixed seed for cheat draws; the clock seeds them otherwise
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            tick_ms: 50,
            rng_seed: None,
        }
    }
}

/// Parse and validate a configuration document
pub fn parse_config(text: &str) -> Result<HostConfig, ConfigError> {
    let config: HostConfig = toml::from_str(text)?;
    config.serial.uart_config()?;
    if config.runtime.poll_interval_ms == 0 || config.runtime.tick_ms == 0 {
        return Err(ConfigError::Invalid("runtime intervals must be non-zero"));
    }
    Ok(config)
}

/// Load the config file at `path`, or parse `embedded` when there is none
pub fn load_config(path: Option<&Path>, embedded: &str) -> Result<HostConfig, ConfigError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            log::info!("Loading configuration from {}", path.display());
            parse_config(&text)
        }
        None => {
            log::info!("Using embedded configuration");
            parse_config(embedded)
        }
    }
}

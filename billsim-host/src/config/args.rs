//! Command line
//!
//! `billsim-host [PORT] [CONFIG.toml]`, in either order. An argument
//! ending in `.toml` names the config file; the other one is the port.

use std::path::PathBuf;

pub const USAGE: &str = "usage: billsim-host [PORT] [CONFIG.toml]";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Serial port, overriding `serial.port`
    pub port: Option<String>,
    /// Config file replacing the embedded defaults
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse the arguments after the program name
    ///
    /// Returns `None` for anything but one optional port and one optional
    /// config file.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Option<Self> {
        let mut parsed = Args::default();
        for arg in args {
            if arg.ends_with(".toml") && parsed.config.is_none() {
                parsed.config = Some(PathBuf::from(arg));
            } else if !arg.starts_with('-') && parsed.port.is_none() {
                parsed.port = Some(arg);
            } else {
                return None;
            }
        }
        Some(parsed)
    }
}

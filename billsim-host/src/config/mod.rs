//! Configuration loading
//!
//! The acceptor settings come from a TOML file: the copy embedded in the
//! binary, or one named on the command line.

pub mod args;
pub mod loader;

pub use args::{Args, USAGE};
pub use loader::{load_config, parse_config, ConfigError, HostConfig};

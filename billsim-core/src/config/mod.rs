//! Configuration types
//!
//! Runtime-agnostic acceptor settings. Loading them from a file is the
//! application's job.

pub mod types;

pub use types::*;

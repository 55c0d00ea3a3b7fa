//! Command-line interface for music-export.
//!
//! Single-track lookups, full playlist syncs, and config housekeeping.

mod commands;

pub use commands::{Cli, Commands, run_command};

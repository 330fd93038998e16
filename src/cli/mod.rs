//! # Command Line Transport
//!
//! - [`args`]: argument definitions for the `steg` binary
//! - [`commands`]: file based hide / reveal / capacity operations

pub mod args;
pub mod commands;

pub use args::{Args, Command};
pub use commands::{capacity_of_file, default_output, hide_file, reveal_file};

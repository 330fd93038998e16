//! # Common Components
//!
//! Shared utilities used by both the HTTP server and the CLI.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration parsing
//! - [`logging`]: logger initialisation
//! - [`paths`]: image name resolution against the pictures directory

pub mod config;
pub mod logging;
pub mod paths;

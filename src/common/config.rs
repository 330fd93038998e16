//! # Configuration
//!
//! TOML configuration shared by the HTTP server and the CLI.
//!
//! ```toml
//! [server]
//! address = "127.0.0.1:4448"
//! max_upload_bytes = 20971520
//!
//! [images]
//! directory = "test_pictures"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every section is optional; missing values fall back to the defaults below.

use anyhow::Result;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: AppConfig = load_config("config/server.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub images: ImageSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind (e.g., "127.0.0.1:4448")
    pub address: String,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:4448".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Where bare image names are looked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub directory: PathBuf,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("test_pictures"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of "error", "warn", "info", "debug", "trace", "off"
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Parsed level, `Info` if the string is not recognised.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

impl AppConfig {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

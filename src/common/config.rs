//! # Configuration Utilities
//!
//! TOML configuration shared by the command-line tool and the web server.
//!
//! Every section has defaults, so an empty file (or no file at all) gives a
//! working configuration:
//!
//! ```toml
//! [runtime]
//! parallel = true
//!
//! [output]
//! result_prefix = "result"
//!
//! [server]
//! address = "127.0.0.1:3000"
//! max_upload_bytes = 52428800
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

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
/// let config: StegifyConfig = load_config("config/stegify.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegifyConfig {
    pub runtime: RuntimeConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

impl StegifyConfig {
    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

/// How per-carrier codec calls are scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Run each carrier's embed/extract on its own blocking task
    pub parallel: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Naming of result files when none are given explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Encode results are named `{result_prefix}{index}.png`
    pub result_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_prefix: "result".to_string(),
        }
    }
}

impl OutputConfig {
    /// Default result file names for `count` carriers.
    pub fn result_names(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|index| format!("{}{}.png", self.result_prefix, index))
            .collect()
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web server binds to (e.g., "127.0.0.1:3000")
    pub address: String,
    /// Maximum accepted multipart request body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

//! # Common Components
//!
//! Shared utilities used by both the command-line tool and the web server.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration loading and defaults
//! - [`logging`]: `env_logger` setup with the shared log format

pub mod config;
pub mod logging;

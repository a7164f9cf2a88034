//! Application configuration module.
//!
//! Manages the TOML config file: TMDB credentials and language, search
//! debounce and result limits, and notice timeouts.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, Credentials};
pub use paths::resolve_config_path;

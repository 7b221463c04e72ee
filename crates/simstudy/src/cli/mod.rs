//! Command handlers.

use std::path::Path;

use simstudy_core::Config;

pub mod check;
pub mod config;
pub mod dedup;
pub mod map_synsets;
pub mod questions;
pub mod sample;
pub mod stats;

/// Load the configuration for this invocation.
///
/// An explicitly given file must load. A broken file at the default
/// location falls back to built-in defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Config::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()));
    }

    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `simstudy config path`."
            );
            Ok(Config::default())
        }
    }
}

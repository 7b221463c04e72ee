//! Logging initialization.
//!
//! Logs always go to stderr; stdout carries command output (tables,
//! collision listings, config dumps).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global subscriber.
///
/// `level` is used unless RUST_LOG is set. `json_format` switches from
/// human-readable lines to one JSON object per event.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize from the `[logging]` section, with CLI overrides.
pub fn init_from_config(
    config: &simstudy_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let (level, json_format) = resolve(config, verbose_override, json_logs_override);
    init(level, json_format);
}

fn resolve(
    config: &simstudy_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) -> (&str, bool) {
    let level = if verbose_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs_override || config.logging.format == "json";
    (level, json_format)
}

//! Structured logging for voxlens.
//!
//! Console output with uptime timestamps and module paths, plus an optional
//! JSON log file. The level comes from `RUST_LOG`, then the config's
//! `debug.log_level`, then `info`. Records emitted through the `log` crate
//! are forwarded into the same subscriber.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use voxlens_config::Config;

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written into the log directory.
pub const LOG_FILE_NAME: &str = "voxlens.log";

/// Filter string chosen from the config, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Directory for the JSON log file
/// * `debug_build` - Enables the JSON file layer
/// * `config` - Supplies the log level when `RUST_LOG` is unset
///
/// Calling this more than once leaves the first subscriber in place.
///
/// ```no_run
/// use voxlens_log::init_logging;
///
/// init_logging(None, false, None);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return;
    }

    let _ = subscriber.try_init();
}

/// An `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

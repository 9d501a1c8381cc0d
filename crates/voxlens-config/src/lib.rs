//! Configuration for voxlens.
//!
//! Render defaults, the default shading stack, cache sizing and log level,
//! persisted to disk as RON and overridable from the command line.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, Command};
pub use config::{CacheConfig, Config, DebugConfig, RenderConfig, ShadingConfig};
pub use error::ConfigError;

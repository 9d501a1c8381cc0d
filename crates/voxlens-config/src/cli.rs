//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::Config;

/// voxlens command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "voxlens", about = "Software voxel renderer")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Default image width.
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Default image height.
    #[arg(long, global = true)]
    pub height: Option<u32>,

    /// Default pixels per voxel.
    #[arg(long, global = true)]
    pub scale: Option<f32>,

    /// Default field of view in degrees (0 = orthographic).
    #[arg(long, global = true)]
    pub fov: Option<f32>,

    /// Rotation template cache size (0 disables it).
    #[arg(long, global = true)]
    pub template_capacity: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Render a JSON request to an image file.
    Render {
        /// Request document: `{"variant", "voxels", "params"}`.
        request: PathBuf,

        /// Output image path.
        #[arg(short, long, default_value = "out.png")]
        output: PathBuf,
    },
    /// List the registered shader stages and their parameters.
    Stages,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.render.width = w;
        }
        if let Some(h) = args.height {
            self.render.height = h;
        }
        if let Some(scale) = args.scale {
            self.render.scale = scale;
        }
        if let Some(fov) = args.fov {
            self.render.fov_degrees = fov;
        }
        if let Some(capacity) = args.template_capacity {
            self.cache.template_capacity = capacity;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

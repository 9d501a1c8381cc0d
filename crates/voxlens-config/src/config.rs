//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use voxlens_render::template::DEFAULT_TEMPLATE_CAPACITY;
use voxlens_render::{
    DepthReference, ExecutionPath, RenderParams, Rgba, StageDescriptor, StageParams,
};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Viewport and camera defaults.
    pub render: RenderConfig,
    /// Lighting and effect defaults.
    pub shading: ShadingConfig,
    /// Cross-call cache sizing.
    pub cache: CacheConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Viewport and camera defaults applied to every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Pixels per voxel edge.
    pub scale: f32,
    /// Rotation about X, Y and Z in degrees.
    pub rotation: [f64; 3],
    /// Field of view in degrees; 0 keeps the orthographic camera.
    pub fov_degrees: f32,
    pub orthogonal: bool,
    pub perspective_reference: DepthReference,
    pub background_color: Rgba,
    pub mesh_mode: bool,
}

/// Shading defaults for each render variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShadingConfig {
    pub basic_light_intensity: f32,
    pub basic_shade_intensity: f32,
    /// Directional light parameters for the dynamic variant.
    pub dynamic_lighting: StageParams,
    /// Default lighting stack.
    pub lighting: Vec<StageDescriptor>,
    /// Default effect stack.
    pub fx: Vec<StageDescriptor>,
    /// Execution path for stack renders.
    pub execution: ExecutionPath,
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Rotation templates kept between calls (0 disables the cache).
    pub template_capacity: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for RenderConfig {
    fn default() -> Self {
        let params = RenderParams::default();
        Self {
            width: params.width,
            height: params.height,
            scale: params.scale,
            rotation: [30.0, -45.0, 0.0],
            fov_degrees: params.fov_degrees,
            orthogonal: params.orthogonal,
            perspective_reference: params.perspective_reference,
            background_color: params.background_color,
            mesh_mode: params.mesh_mode,
        }
    }
}

impl Default for ShadingConfig {
    fn default() -> Self {
        let params = RenderParams::default();
        Self {
            basic_light_intensity: params.basic_light_intensity,
            basic_shade_intensity: params.basic_shade_intensity,
            dynamic_lighting: StageParams::new(),
            lighting: vec![StageDescriptor::new("dynamic")],
            fx: Vec::new(),
            execution: ExecutionPath::Compiled,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            template_capacity: DEFAULT_TEMPLATE_CAPACITY,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Render parameters ---

impl Config {
    /// Per-call parameters seeded from this configuration.
    pub fn render_params(&self) -> RenderParams {
        let (render, shading) = (&self.render, &self.shading);
        RenderParams {
            width: render.width,
            height: render.height,
            scale: render.scale,
            rotation: render.rotation,
            fov_degrees: render.fov_degrees,
            orthogonal: render.orthogonal,
            perspective_reference: render.perspective_reference,
            background_color: render.background_color,
            mesh_mode: render.mesh_mode,
            basic_light_intensity: shading.basic_light_intensity,
            basic_shade_intensity: shading.basic_shade_intensity,
            dynamic_lighting: shading.dynamic_lighting.clone(),
            lighting: shading.lighting.clone(),
            fx: shading.fx.clone(),
        }
    }

    /// Platform config directory, `<config_dir>/voxlens`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("voxlens"))
            .ok_or(ConfigError::NoConfigDir)
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file: `Some(new_config)` if it changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

//! `voxlens` command-line renderer.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing::info;
use voxlens_config::{CliArgs, Command, Config};
use voxlens_render::{RenderError, RenderGate, RenderRequest, RenderedImage, Renderer};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("failed to encode parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| Config::default_dir().ok())
        .unwrap_or_else(|| PathBuf::from(".voxlens"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    let file_logging = cfg!(debug_assertions) || config.debug.log_to_file;
    voxlens_log::init_logging(Some(&log_dir), file_logging, Some(&config));

    let renderer = Renderer::new().with_template_capacity(config.cache.template_capacity);
    let result = match &args.command {
        Command::Render { request, output } => {
            render_to_file(&RenderGate::new(renderer), &config, request, output)
        }
        Command::Stages => {
            list_stages(&renderer);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn render_to_file(
    gate: &RenderGate,
    config: &Config,
    request_path: &Path,
    output: &Path,
) -> Result<(), CliError> {
    let text = std::fs::read_to_string(request_path).map_err(|source| CliError::Read {
        path: request_path.to_path_buf(),
        source,
    })?;
    let request = load_request(&text, config)?;
    info!(
        variant = ?request.variant,
        voxels = request.voxels.len(),
        "rendering {}",
        request_path.display()
    );

    let image = gate.try_render(|renderer| renderer.handle(&request))?;
    save_png(&image, output)?;
    info!(faces = image.face_count, "wrote {}", output.display());
    Ok(())
}

/// Parse a request, filling any parameter it leaves out from `config`.
fn load_request(text: &str, config: &Config) -> Result<RenderRequest, CliError> {
    let mut doc: Value =
        serde_json::from_str(text).map_err(|e| RenderError::InvalidRequest(e.to_string()))?;

    let mut params = serde_json::to_value(config.render_params())?;
    if let (Some(base), Some(overlay)) = (
        params.as_object_mut(),
        doc.get("params").and_then(Value::as_object),
    ) {
        for (key, value) in overlay {
            base.insert(key.clone(), value.clone());
        }
    }
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("params".to_string(), params);
        if !obj.contains_key("execution") {
            obj.insert(
                "execution".to_string(),
                serde_json::to_value(config.shading.execution)?,
            );
        }
    }
    Ok(RenderRequest::from_value(doc)?)
}

fn save_png(image: &RenderedImage, path: &Path) -> Result<(), CliError> {
    let (width, height) = (image.width, image.height);
    let buffer = image::RgbaImage::from_raw(width, height, image.pixels.clone())
        .ok_or(CliError::BufferSize { width, height })?;
    buffer.save(path).map_err(|source| CliError::Image {
        path: path.to_path_buf(),
        source,
    })
}

fn list_stages(renderer: &Renderer) {
    for stage in renderer.registry().infos() {
        println!("{} [{}] {}", stage.id, stage.kind, stage.display_name);
        for param in &stage.params {
            let default = serde_json::to_string(&param.default).unwrap_or_default();
            println!("    {} = {}", param.name, default);
        }
    }
}

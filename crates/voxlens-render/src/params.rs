//! Per-call render parameters.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use voxlens_math::EulerRotation;

use crate::camera::{CameraSettings, DepthReference};
use crate::color::Rgba;
use crate::error::RenderError;
use crate::shading::{CameraFacing, DirectionalLight, StageDescriptor, StageParams};

/// Largest pixel buffer a single call may allocate, in bytes.
pub const MAX_BUFFER_BYTES: usize = 1 << 30;

/// Everything a render call needs besides the voxels.
///
/// Field names serialize in camelCase (`fovDegrees`, `meshMode`, ...). Every
/// field is optional on the wire and falls back to [`RenderParams::default`].
/// Numeric fields that are null, non-numeric or out of range fall back too,
/// with a warning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRenderParams", rename_all = "camelCase")]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    /// Pixels per voxel edge. Non-positive values fall back to 1.
    pub scale: f32,
    /// Rotation about X, Y and Z in degrees.
    pub rotation: [f64; 3],
    /// Field of view in degrees; 0 keeps the orthographic camera.
    pub fov_degrees: f32,
    pub orthogonal: bool,
    pub perspective_reference: DepthReference,
    pub background_color: Rgba,
    /// Skip faces covered by an adjacent voxel.
    pub mesh_mode: bool,
    pub basic_light_intensity: f32,
    pub basic_shade_intensity: f32,
    /// Parameters of the directional light used by the dynamic variant.
    pub dynamic_lighting: StageParams,
    /// Lighting stages for the stack variant, in order.
    pub lighting: Vec<StageDescriptor>,
    /// Effect stages for the stack variant, run after lighting.
    pub fx: Vec<StageDescriptor>,
}

impl Default for RenderParams {
    fn default() -> Self {
        let basic = CameraFacing::default();
        Self {
            width: 200,
            height: 200,
            scale: 1.0,
            rotation: [0.0; 3],
            fov_degrees: 0.0,
            orthogonal: false,
            perspective_reference: DepthReference::Middle,
            background_color: Rgba::TRANSPARENT,
            mesh_mode: false,
            basic_light_intensity: basic.light,
            basic_shade_intensity: basic.shade,
            dynamic_lighting: StageParams::new(),
            lighting: Vec::new(),
            fx: Vec::new(),
        }
    }
}

/// Wire form of [`RenderParams`]. Numeric fields are kept as raw JSON until
/// they are validated.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRenderParams {
    #[serde(deserialize_with = "present")]
    width: Option<Value>,
    #[serde(deserialize_with = "present")]
    height: Option<Value>,
    #[serde(deserialize_with = "present")]
    scale: Option<Value>,
    #[serde(deserialize_with = "present")]
    rotation: Option<Value>,
    #[serde(deserialize_with = "present")]
    fov_degrees: Option<Value>,
    orthogonal: Option<bool>,
    perspective_reference: Option<DepthReference>,
    background_color: Option<Rgba>,
    mesh_mode: Option<bool>,
    #[serde(deserialize_with = "present")]
    basic_light_intensity: Option<Value>,
    #[serde(deserialize_with = "present")]
    basic_shade_intensity: Option<Value>,
    dynamic_lighting: StageParams,
    lighting: Vec<StageDescriptor>,
    fx: Vec<StageDescriptor>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A finite number accepted by `valid`, or `default` with a warning.
fn number_field(field: &str, raw: Option<&Value>, valid: fn(f64) -> bool, default: f64) -> f64 {
    let Some(value) = raw else {
        return default;
    };
    match value.as_f64() {
        Some(n) if n.is_finite() && valid(n) => n,
        _ => {
            warn!(field, %value, "invalid render parameter, using default");
            default
        }
    }
}

fn non_negative(n: f64) -> bool {
    n >= 0.0
}

fn pixel_count(n: f64) -> bool {
    (0.0..=u32::MAX as f64).contains(&n)
}

fn positive(n: f64) -> bool {
    n > 0.0
}

fn any(_: f64) -> bool {
    true
}

fn rotation_field(raw: Option<&Value>, default: [f64; 3]) -> [f64; 3] {
    let Some(value) = raw else {
        return default;
    };
    match value.as_array().map(Vec::as_slice) {
        Some([x, y, z]) => {
            let axis = |v: &Value, d: f64| number_field("rotation", Some(v), any, d);
            [axis(x, default[0]), axis(y, default[1]), axis(z, default[2])]
        }
        _ => {
            warn!(%value, "rotation must be three numbers, using default");
            default
        }
    }
}

impl From<RawRenderParams> for RenderParams {
    fn from(raw: RawRenderParams) -> Self {
        let d = Self::default();
        Self {
            width: number_field("width", raw.width.as_ref(), pixel_count, d.width as f64) as u32,
            height: number_field("height", raw.height.as_ref(), pixel_count, d.height as f64)
                as u32,
            scale: number_field("scale", raw.scale.as_ref(), positive, d.scale as f64) as f32,
            rotation: rotation_field(raw.rotation.as_ref(), d.rotation),
            fov_degrees: number_field(
                "fovDegrees",
                raw.fov_degrees.as_ref(),
                non_negative,
                d.fov_degrees as f64,
            ) as f32,
            orthogonal: raw.orthogonal.unwrap_or(d.orthogonal),
            perspective_reference: raw.perspective_reference.unwrap_or(d.perspective_reference),
            background_color: raw.background_color.unwrap_or(d.background_color),
            mesh_mode: raw.mesh_mode.unwrap_or(d.mesh_mode),
            basic_light_intensity: number_field(
                "basicLightIntensity",
                raw.basic_light_intensity.as_ref(),
                non_negative,
                d.basic_light_intensity as f64,
            ) as f32,
            basic_shade_intensity: number_field(
                "basicShadeIntensity",
                raw.basic_shade_intensity.as_ref(),
                non_negative,
                d.basic_shade_intensity as f64,
            ) as f32,
            dynamic_lighting: raw.dynamic_lighting,
            lighting: raw.lighting,
            fx: raw.fx,
        }
    }
}

impl RenderParams {
    pub fn rotation(&self) -> EulerRotation {
        let [x, y, z] = self.rotation;
        EulerRotation::from_degrees(x, y, z)
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            width: self.width,
            height: self.height,
            scale: self.scale,
            fov_degrees: self.fov_degrees,
            orthogonal: self.orthogonal,
            reference: self.perspective_reference,
        }
    }

    /// Camera-facing falloff used by the basic variant.
    pub fn camera_facing(&self) -> CameraFacing {
        CameraFacing::falloff(self.basic_light_intensity, self.basic_shade_intensity)
    }

    pub fn directional_light(&self) -> DirectionalLight {
        DirectionalLight::from_params(&self.dynamic_lighting)
    }

    /// Validated viewport size.
    ///
    /// Zero width or height is rejected, as is a buffer larger than
    /// [`MAX_BUFFER_BYTES`].
    pub fn dimensions(&self) -> Result<(u32, u32), RenderError> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        match bytes {
            Some(n) if n <= MAX_BUFFER_BYTES => Ok((width, height)),
            _ => Err(RenderError::BufferTooLarge {
                width,
                height,
                limit: MAX_BUFFER_BYTES,
            }),
        }
    }
}

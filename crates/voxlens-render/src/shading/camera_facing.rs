//! Lighting that brightens faces the more directly they face the eye.

use crate::color::{Rgba, quantize};
use crate::shading::context::FaceContext;
use crate::shading::params::{ParamSpec, StageParams};
use crate::shading::{CompiledStage, ShaderStage, StageInfo, StageKind};

const DEFAULT_LIGHT: f32 = 50.0;
const DEFAULT_SHADE: f32 = 50.0;

/// How the normal·view term maps onto a brightness percentage.
///
/// Both curves clamp the term to `[0, 1]`: a head-on face lands on the lit
/// endpoint and a face at or past grazing lands on the shaded endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacingCurve {
    /// Straight ramp from `shade` up to `light`.
    #[default]
    Linear,
    /// Contrast falloff used by the basic render. `light` raises the floor,
    /// `shade` flattens the curve; head-on faces keep their full colour.
    Falloff,
}

/// Camera-facing brightness between a shaded and a lit endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFacing {
    /// Light intensity percentage.
    pub light: f32,
    /// Shade intensity percentage.
    pub shade: f32,
    pub curve: FacingCurve,
}

impl CameraFacing {
    /// Linear ramp, as configured on the `basic` stage.
    pub fn new(light: f32, shade: f32) -> Self {
        Self {
            light: if light.is_finite() { light } else { DEFAULT_LIGHT },
            shade: if shade.is_finite() { shade } else { DEFAULT_SHADE },
            curve: FacingCurve::Linear,
        }
    }

    /// Contrast falloff with the same intensity inputs.
    pub fn falloff(light: f32, shade: f32) -> Self {
        Self {
            curve: FacingCurve::Falloff,
            ..Self::new(light, shade)
        }
    }

    pub fn from_params(params: &StageParams) -> Self {
        Self::new(
            params.number_or("lightIntensity", DEFAULT_LIGHT),
            params.number_or("shadeIntensity", DEFAULT_SHADE),
        )
    }

    /// Lowest falloff brightness, as a fraction.
    fn falloff_floor(&self) -> f32 {
        0.05 + 0.9 * self.light / 100.0
    }

    fn falloff_exponent(&self) -> f32 {
        let curve = 1.0 - self.shade / 100.0;
        1.0 + 6.0 * curve * curve
    }

    /// Brightness percentage for a normal·view value.
    pub fn brightness(&self, dot: f32) -> f32 {
        let dot = if dot.is_nan() { 0.0 } else { dot.clamp(0.0, 1.0) };
        match self.curve {
            FacingCurve::Linear => self.shade + (self.light - self.shade) * dot,
            FacingCurve::Falloff => {
                let floor = self.falloff_floor();
                let powered = if dot > 0.0 {
                    dot.powf(self.falloff_exponent())
                } else {
                    0.0
                };
                (floor + (1.0 - floor) * powered).clamp(0.0, 1.0) * 100.0
            }
        }
    }

    /// Brightness of a face seen head-on.
    pub fn lit_endpoint(&self) -> f32 {
        match self.curve {
            FacingCurve::Linear => self.light,
            FacingCurve::Falloff => 100.0,
        }
    }

    /// Brightness of a face at or beyond grazing.
    pub fn shaded_endpoint(&self) -> f32 {
        match self.curve {
            FacingCurve::Linear => self.shade,
            FacingCurve::Falloff => self.falloff_floor().clamp(0.0, 1.0) * 100.0,
        }
    }

    /// Scale RGB by the brightness for `dot`; alpha is kept.
    pub fn shade_color(&self, color: Rgba, dot: f32) -> Rgba {
        let factor = self.brightness(dot) / 100.0;
        color.with_rgb(
            quantize(color.r as f32 * factor),
            quantize(color.g as f32 * factor),
            quantize(color.b as f32 * factor),
        )
    }

    pub fn apply(&self, color: Rgba, face: &FaceContext<'_>) -> Rgba {
        self.shade_color(color, face.normal.dot(face.view))
    }
}

impl Default for CameraFacing {
    fn default() -> Self {
        Self::new(DEFAULT_LIGHT, DEFAULT_SHADE)
    }
}

/// Registry entry for [`CameraFacing`], id `basic`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraFacingStage;

impl ShaderStage for CameraFacingStage {
    fn id(&self) -> &str {
        "basic"
    }

    fn kind(&self) -> StageKind {
        StageKind::Lighting
    }

    fn info(&self) -> StageInfo {
        StageInfo {
            id: self.id().to_string(),
            display_name: "Basic Light".to_string(),
            kind: self.kind(),
            params: vec![
                ParamSpec::new("lightIntensity", DEFAULT_LIGHT as f64),
                ParamSpec::new("shadeIntensity", DEFAULT_SHADE as f64),
            ],
        }
    }

    fn shade(&self, color: Rgba, face: &FaceContext<'_>, params: &StageParams) -> Rgba {
        CameraFacing::from_params(params).apply(color, face)
    }

    fn compile(&self, params: &StageParams) -> Option<CompiledStage> {
        Some(CompiledStage::CameraFacing(CameraFacing::from_params(params)))
    }
}

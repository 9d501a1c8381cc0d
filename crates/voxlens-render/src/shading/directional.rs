//! Directional light with an ambient floor, a radial beam falloff around the
//! light axis, and an optional rim highlight.

use glam::Vec3;

use crate::color::{Rgba, quantize};
use crate::shading::context::FaceContext;
use crate::shading::params::{ParamSpec, StageParams};
use crate::shading::{CompiledStage, ShaderStage, StageInfo, StageKind};

const DEFAULT_PITCH: f32 = 25.0;
const DEFAULT_YAW: f32 = 25.0;
const DEFAULT_DIFFUSE: f32 = 60.0;
const DEFAULT_DIAMETER: f32 = 100.0;
const DEFAULT_AMBIENT: f32 = 30.0;

/// Grazing band, in `1 - normal·view`, over which the rim ramps in.
const RIM_BAND: (f32, f32) = (0.55, 0.95);
const RIM_STRENGTH: f32 = 0.6;

/// Hermite interpolation of `x` between two edges, clamped to `[0, 1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Resolved directional light settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector toward the light, in rotated (camera) space.
    pub direction: Vec3,
    /// Diffuse percentage as a fraction; higher widens the falloff.
    pub diffuse: f32,
    /// Beam diameter as a fraction of the model diagonal; 0 disables it.
    pub diameter: f32,
    /// Ambient percentage as a fraction.
    pub ambient: f32,
    pub rim: bool,
    /// Light colour as linear fractions.
    pub color: Vec3,
}

impl DirectionalLight {
    pub fn from_params(params: &StageParams) -> Self {
        let pitch = params.number_or("pitch", DEFAULT_PITCH).to_radians();
        let yaw = params.number_or("yaw", DEFAULT_YAW).to_radians();
        let color = params.color_or("lightColor", Rgba::WHITE);
        Self {
            direction: light_direction(pitch, yaw),
            diffuse: params.number_or("diffuse", DEFAULT_DIFFUSE) / 100.0,
            diameter: params.number_or("diameter", DEFAULT_DIAMETER) / 100.0,
            ambient: params.number_or("ambient", DEFAULT_AMBIENT) / 100.0,
            rim: params.flag_or("rimEnabled", false),
            color: Vec3::new(color.r as f32, color.g as f32, color.b as f32) / 255.0,
        }
    }

    /// Exponent on the Lambert term; low diffuse tightens the highlight.
    pub fn exponent(&self) -> f32 {
        (5.0 - 4.0 * self.diffuse).max(0.2)
    }

    /// Light that reaches every face regardless of orientation.
    pub fn ambient_floor(&self) -> f32 {
        (0.02 + 0.48 * self.ambient).clamp(0.0, 1.0)
    }

    /// Whether the beam falloff is active.
    pub fn has_beam(&self) -> bool {
        self.diameter > 0.0
    }

    /// Beam attenuation for a voxel offset from the pivot, in rotated space.
    ///
    /// Full strength inside the core radius, none past the outer radius,
    /// a smoothstep in between.
    pub fn radial_factor(&self, offset: Vec3, model_radius: f32) -> f32 {
        let outer = self.diameter.max(0.0) * model_radius;
        if outer <= 1e-6 {
            return 1.0;
        }
        let core = outer * (1.0 - 0.4 * self.diffuse).max(0.0);
        let along = offset.dot(self.direction);
        let perp = (offset - self.direction * along).length();
        if perp <= core {
            1.0
        } else if perp >= outer {
            0.0
        } else {
            1.0 - smoothstep(core, outer, perp)
        }
    }

    /// Rim highlight strength for a normal·view value.
    pub fn rim_factor(&self, ndotv: f32) -> f32 {
        if !self.rim || ndotv <= 0.0 {
            return 0.0;
        }
        RIM_STRENGTH * smoothstep(RIM_BAND.0, RIM_BAND.1, 1.0 - ndotv)
    }

    pub fn apply(&self, color: Rgba, face: &FaceContext<'_>) -> Rgba {
        let ndotl = face.normal.dot(self.direction).max(0.0);
        let radial = self.radial_factor(face.world - face.frame.pivot, face.frame.model_radius());
        let diffuse = ndotl.powf(self.exponent()) * radial;

        let base = Vec3::new(color.r as f32, color.g as f32, color.b as f32);
        let mut lit = base * (Vec3::splat(self.ambient_floor()) + self.color * diffuse);

        let rim = self.rim_factor(face.normal.dot(face.view));
        if rim > 0.0 {
            lit += self.color * (rim * 255.0);
        }

        color.with_rgb(quantize(lit.x), quantize(lit.y), quantize(lit.z))
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::from_params(&StageParams::new())
    }
}

/// Unit direction toward a light at the given pitch and yaw, in radians.
pub fn light_direction(pitch: f32, yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
        .try_normalize()
        .unwrap_or(Vec3::X)
}

/// Registry entry for [`DirectionalLight`], id `dynamic`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectionalStage;

impl ShaderStage for DirectionalStage {
    fn id(&self) -> &str {
        "dynamic"
    }

    fn kind(&self) -> StageKind {
        StageKind::Lighting
    }

    fn info(&self) -> StageInfo {
        StageInfo {
            id: self.id().to_string(),
            display_name: "Dynamic Light".to_string(),
            kind: self.kind(),
            params: vec![
                ParamSpec::new("pitch", DEFAULT_PITCH as f64),
                ParamSpec::new("yaw", DEFAULT_YAW as f64),
                ParamSpec::new("diffuse", DEFAULT_DIFFUSE as f64),
                ParamSpec::new("diameter", DEFAULT_DIAMETER as f64),
                ParamSpec::new("ambient", DEFAULT_AMBIENT as f64),
                ParamSpec::new("rimEnabled", false),
                ParamSpec::new("lightColor", Rgba::WHITE),
            ],
        }
    }

    fn shade(&self, color: Rgba, face: &FaceContext<'_>, params: &StageParams) -> Rgba {
        DirectionalLight::from_params(params).apply(color, face)
    }

    fn compile(&self, params: &StageParams) -> Option<CompiledStage> {
        Some(CompiledStage::Directional(DirectionalLight::from_params(params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::Face;
    use crate::shading::context::ModelFrame;
    use voxlens_math::{Bounds, EulerRotation};

    fn frame() -> ModelFrame {
        let normals = Face::ALL.map(Face::normal);
        ModelFrame::new(
            &Bounds::new(Vec3::ZERO, Vec3::ZERO),
            EulerRotation::IDENTITY,
            normals,
            Vec3::Z,
        )
    }

    fn ctx(frame: &ModelFrame, normal: Vec3, world: Vec3) -> FaceContext<'_> {
        FaceContext {
            face: Face::Front,
            normal,
            view: Vec3::Z,
            position: world,
            world,
            base_color: Rgba::WHITE,
            frame,
        }
    }

    fn light(params: StageParams) -> DirectionalLight {
        DirectionalLight::from_params(&params)
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }

    #[test]
    fn test_direction_from_angles() {
        let d = light_direction(0.0, 0.0);
        assert!((d - Vec3::X).length() < 1e-6);
        let up = light_direction(90f32.to_radians(), 0.0);
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_defaults() {
        let l = DirectionalLight::default();
        assert!((l.diffuse - 0.6).abs() < 1e-6);
        assert!((l.exponent() - 2.6).abs() < 1e-5);
        assert!((l.ambient_floor() - 0.164).abs() < 1e-5);
        assert!(!l.rim);
        assert_eq!(l.color, Vec3::ONE);
    }

    #[test]
    fn test_exponent_floor() {
        let l = light(StageParams::new().with("diffuse", 200.0));
        assert_eq!(l.exponent(), 0.2);
    }

    #[test]
    fn test_face_away_from_light_gets_ambient_only() {
        let f = frame();
        let l = light(
            StageParams::new()
                .with("pitch", 0.0)
                .with("yaw", 0.0)
                .with("diameter", 0.0)
                .with("ambient", 50.0),
        );
        let out = l.apply(Rgba::new(200, 100, 0, 255), &ctx(&f, Vec3::NEG_X, Vec3::ZERO));
        // 0.02 + 0.48 * 0.5 = 0.26
        assert_eq!(out, Rgba::new(52, 26, 0, 255));
    }

    #[test]
    fn test_face_toward_light_is_fully_lit() {
        let f = frame();
        let l = light(
            StageParams::new()
                .with("pitch", 0.0)
                .with("yaw", 0.0)
                .with("diameter", 0.0)
                .with("ambient", 0.0),
        );
        let out = l.apply(Rgba::new(100, 100, 100, 40), &ctx(&f, Vec3::X, Vec3::ZERO));
        // 100 * (0.02 + 1.0)
        assert_eq!(out, Rgba::new(102, 102, 102, 40));
    }

    #[test]
    fn test_radial_factor_regions() {
        let l = light(StageParams::new().with("pitch", 0.0).with("yaw", 0.0).with("diffuse", 50.0));
        // outer = 1.0 * 10, core = 10 * 0.8 = 8
        assert_eq!(l.radial_factor(Vec3::new(5.0, 3.0, 0.0), 10.0), 1.0);
        assert_eq!(l.radial_factor(Vec3::new(0.0, 0.0, 12.0), 10.0), 0.0);
        let mid = l.radial_factor(Vec3::new(0.0, 9.0, 0.0), 10.0);
        assert!(mid > 0.0 && mid < 1.0);
        // Distance along the axis does not attenuate.
        assert_eq!(l.radial_factor(Vec3::new(100.0, 0.0, 0.0), 10.0), 1.0);
    }

    #[test]
    fn test_radial_disabled_by_zero_diameter() {
        let l = light(StageParams::new().with("diameter", 0.0));
        assert!(!l.has_beam());
        assert_eq!(l.radial_factor(Vec3::new(0.0, 50.0, 0.0), 1.0), 1.0);
    }

    #[test]
    fn test_rim_band() {
        let l = light(StageParams::new().with("rimEnabled", true));
        assert_eq!(l.rim_factor(1.0), 0.0);
        assert_eq!(l.rim_factor(-0.5), 0.0);
        assert!((l.rim_factor(0.05) - RIM_STRENGTH).abs() < 1e-6);
        let partial = l.rim_factor(0.25);
        assert!(partial > 0.0 && partial < RIM_STRENGTH);
        assert_eq!(DirectionalLight::default().rim_factor(0.05), 0.0);
    }

    #[test]
    fn test_light_color_tints() {
        let f = frame();
        let l = light(
            StageParams::new()
                .with("pitch", 0.0)
                .with("yaw", 0.0)
                .with("diameter", 0.0)
                .with("ambient", 0.0)
                .with("lightColor", Rgba::new(255, 0, 0, 255)),
        );
        let out = l.apply(Rgba::new(100, 100, 100, 255), &ctx(&f, Vec3::X, Vec3::ZERO));
        assert_eq!(out, Rgba::new(102, 2, 2, 255));
    }
}

//! Role-based recolour: every face role gets its own colour rule.

use crate::color::Rgba;
use crate::shading::context::FaceContext;
use crate::shading::params::{ParamSpec, StageParams};
use crate::shading::role::{FaceRole, RoleStyle};
use crate::shading::{CompiledStage, ShaderStage, StageInfo, StageKind};

/// Where a face's role comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoleSource {
    /// The face's own model-space name; six roles.
    #[default]
    Model,
    /// The dominant axis of the rotated normal; never yields `Back`.
    Camera,
}

impl RoleSource {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("camera") {
            Self::Camera
        } else {
            Self::Model
        }
    }
}

/// Resolved role-recolour settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceShade {
    pub style: RoleStyle,
    pub source: RoleSource,
    /// Colour per role, indexed by [`FaceRole::index`].
    pub colors: [Rgba; 6],
}

impl FaceShade {
    pub fn from_params(params: &StageParams) -> Self {
        Self {
            style: RoleStyle::from_params(params),
            source: params
                .text("roleSource")
                .map(RoleSource::parse)
                .unwrap_or_default(),
            colors: FaceRole::ALL.map(|role| params.color_or(role.color_key(), Rgba::WHITE)),
        }
    }

    pub fn role(&self, face: &FaceContext<'_>) -> FaceRole {
        match self.source {
            RoleSource::Model => FaceRole::from(face.face),
            RoleSource::Camera => FaceRole::dominant(face.normal),
        }
    }

    pub fn apply(&self, color: Rgba, face: &FaceContext<'_>) -> Rgba {
        if self.style.exempts(face.base_color) {
            return color;
        }
        self.style.apply(color, self.colors[self.role(face).index()])
    }
}

/// Registry entry for [`FaceShade`], id `faceshade`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceShadeStage;

impl ShaderStage for FaceShadeStage {
    fn id(&self) -> &str {
        "faceshade"
    }

    fn kind(&self) -> StageKind {
        StageKind::Effect
    }

    fn info(&self) -> StageInfo {
        let mut params = vec![
            ParamSpec::new("shadingMode", "alpha"),
            ParamSpec::new("materialMode", false),
            ParamSpec::new("enableTint", false),
            ParamSpec::new("roleSource", "model"),
        ];
        params.extend(
            FaceRole::ALL
                .iter()
                .map(|role| ParamSpec::new(role.color_key(), Rgba::WHITE)),
        );
        StageInfo {
            id: self.id().to_string(),
            display_name: "Face Shade".to_string(),
            kind: self.kind(),
            params,
        }
    }

    fn shade(&self, color: Rgba, face: &FaceContext<'_>, params: &StageParams) -> Rgba {
        FaceShade::from_params(params).apply(color, face)
    }

    fn compile(&self, params: &StageParams) -> Option<CompiledStage> {
        Some(CompiledStage::FaceShade(FaceShade::from_params(params)))
    }
}

//! Shader stages: the per-face colour transforms applied after projection.
//!
//! A stage is looked up by id in a [`StageRegistry`] and configured with a
//! [`StageParams`] map. Every built-in stage can also be compiled once per
//! call into a [`CompiledStage`], which skips the per-face parameter
//! lookups. Both paths produce identical colours.

mod camera_facing;
mod context;
mod directional;
mod faceshade;
mod iso;
mod params;
mod pipeline;
mod registry;
mod role;

use std::fmt;

pub use camera_facing::{CameraFacing, CameraFacingStage, FacingCurve};
pub use context::{FaceContext, ModelFrame};
pub use directional::{DirectionalLight, DirectionalStage, light_direction, smoothstep};
pub use faceshade::{FaceShade, FaceShadeStage, RoleSource};
pub use iso::{IsoRoles, IsoShade, IsoStage};
pub use params::{ParamSpec, ParamValue, StageDescriptor, StageParams};
pub use pipeline::{ExecutionPath, FaceColorCache, ShadingPipeline};
pub use registry::StageRegistry;
pub use role::{FaceRole, RoleStyle, ShadingMode};

use crate::color::Rgba;

// ---------------------------------------------------------------------------
// Stage metadata
// ---------------------------------------------------------------------------

/// Which list a stage may appear in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    Lighting,
    Effect,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lighting => write!(f, "lighting"),
            Self::Effect => write!(f, "effect"),
        }
    }
}

/// Static description of a stage, for listings and UIs.
#[derive(Clone, Debug, PartialEq)]
pub struct StageInfo {
    pub id: String,
    pub display_name: String,
    pub kind: StageKind,
    /// Parameters the stage reads, with their defaults.
    pub params: Vec<ParamSpec>,
}

// ---------------------------------------------------------------------------
// ShaderStage
// ---------------------------------------------------------------------------

/// A colour transform applied to each visible face.
///
/// `shade` must be pure: the same colour, context and parameters always give
/// the same result.
pub trait ShaderStage: Send + Sync {
    /// Registry key, e.g. `"dynamic"`.
    fn id(&self) -> &str;

    fn kind(&self) -> StageKind;

    fn info(&self) -> StageInfo;

    /// Transform `color` for one face.
    fn shade(&self, color: Rgba, face: &FaceContext<'_>, params: &StageParams) -> Rgba;

    /// Resolve `params` once for a whole call. Stages that return `None`
    /// are always run through [`ShaderStage::shade`].
    fn compile(&self, _params: &StageParams) -> Option<CompiledStage> {
        None
    }
}

// ---------------------------------------------------------------------------
// CompiledStage
// ---------------------------------------------------------------------------

/// A built-in stage with its parameters already resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompiledStage {
    CameraFacing(CameraFacing),
    Directional(DirectionalLight),
    FaceShade(FaceShade),
    Iso(IsoShade),
}

impl CompiledStage {
    pub fn apply(&self, color: Rgba, face: &FaceContext<'_>) -> Rgba {
        match self {
            Self::CameraFacing(stage) => stage.apply(color, face),
            Self::Directional(stage) => stage.apply(color, face),
            Self::FaceShade(stage) => stage.apply(color, face),
            Self::Iso(stage) => stage.apply(color, face),
        }
    }

    /// Whether the output depends only on the input colour and the face
    /// direction, so one result per (base colour, face) can be reused.
    pub fn is_face_invariant(&self, view_varies: bool) -> bool {
        match self {
            Self::CameraFacing(_) => !view_varies,
            Self::Directional(light) => !light.has_beam() && (!light.rim || !view_varies),
            Self::FaceShade(_) | Self::Iso(_) => true,
        }
    }
}

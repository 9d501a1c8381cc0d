//! Isometric styling: one top, one left and one right role chosen from the
//! current rotation.

use std::cmp::Ordering;

use glam::Vec3;

use crate::color::Rgba;
use crate::face::Face;
use crate::shading::context::FaceContext;
use crate::shading::params::{ParamSpec, StageParams};
use crate::shading::role::{FaceRole, RoleStyle};
use crate::shading::{CompiledStage, ShaderStage, StageInfo, StageKind};

const SIDE_FACES: [Face; 4] = [Face::Front, Face::Back, Face::Left, Face::Right];
/// Side faces need at least this view-dot to be preferred for left/right.
const SIDE_VISIBLE_DOT: f32 = 0.01;

const DEFAULT_TOP: Rgba = Rgba::new(255, 255, 255, 255);
const DEFAULT_LEFT: Rgba = Rgba::new(235, 235, 235, 230);
const DEFAULT_RIGHT: Rgba = Rgba::new(210, 210, 210, 210);

/// Isometric role of each face for one rotation. Faces without a role are
/// left untouched by the iso stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsoRoles {
    roles: [Option<FaceRole>; 6],
}

impl IsoRoles {
    /// Assign roles from rotated normals and the view direction.
    ///
    /// Whichever of top/bottom faces the eye more is `Top`, and so is its
    /// opposite. The two most eye-facing side faces become `Left` and
    /// `Right`, the one further along screen +X being `Right`.
    pub fn assign(normals: &[Vec3; 6], view: Vec3) -> Self {
        let dot = |f: Face| normals[f.index()].dot(view);
        let mut roles = [None; 6];

        let top = if dot(Face::Top) >= dot(Face::Bottom) {
            Face::Top
        } else {
            Face::Bottom
        };
        roles[top.index()] = Some(FaceRole::Top);
        roles[top.opposite().index()] = Some(FaceRole::Top);

        let facing: Vec<Face> = SIDE_FACES
            .into_iter()
            .filter(|f| dot(*f) > SIDE_VISIBLE_DOT)
            .collect();
        let mut pool = if facing.len() >= 2 {
            facing
        } else {
            SIDE_FACES.to_vec()
        };
        pool.sort_by(|a, b| dot(*b).partial_cmp(&dot(*a)).unwrap_or(Ordering::Equal));

        if let [first, second, ..] = pool[..] {
            let (right, left) = if normals[first.index()].x > normals[second.index()].x {
                (first, second)
            } else {
                (second, first)
            };
            roles[left.index()] = Some(FaceRole::Left);
            roles[right.index()] = Some(FaceRole::Right);
        }

        Self { roles }
    }

    pub fn role(&self, face: Face) -> Option<FaceRole> {
        self.roles[face.index()]
    }
}

/// Resolved iso settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoShade {
    pub style: RoleStyle,
    pub top: Rgba,
    pub left: Rgba,
    pub right: Rgba,
}

impl IsoShade {
    pub fn from_params(params: &StageParams) -> Self {
        Self {
            style: RoleStyle::from_params(params),
            top: params.color_or("topColor", DEFAULT_TOP),
            left: params.color_or("leftColor", DEFAULT_LEFT),
            right: params.color_or("rightColor", DEFAULT_RIGHT),
        }
    }

    pub fn apply(&self, color: Rgba, face: &FaceContext<'_>) -> Rgba {
        if self.style.exempts(face.base_color) {
            return color;
        }
        let role_color = match face.frame.iso_roles().role(face.face) {
            Some(FaceRole::Top) => self.top,
            Some(FaceRole::Left) => self.left,
            Some(FaceRole::Right) => self.right,
            _ => return color,
        };
        self.style.apply(color, role_color)
    }
}

/// Registry entry for [`IsoShade`], id `iso`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsoStage;

impl ShaderStage for IsoStage {
    fn id(&self) -> &str {
        "iso"
    }

    fn kind(&self) -> StageKind {
        StageKind::Effect
    }

    fn info(&self) -> StageInfo {
        StageInfo {
            id: self.id().to_string(),
            display_name: "Iso".to_string(),
            kind: self.kind(),
            params: vec![
                ParamSpec::new("shadingMode", "alpha"),
                ParamSpec::new("materialMode", false),
                ParamSpec::new("enableTint", false),
                ParamSpec::new("topColor", DEFAULT_TOP),
                ParamSpec::new("leftColor", DEFAULT_LEFT),
                ParamSpec::new("rightColor", DEFAULT_RIGHT),
            ],
        }
    }

    fn shade(&self, color: Rgba, face: &FaceContext<'_>, params: &StageParams) -> Rgba {
        IsoShade::from_params(params).apply(color, face)
    }

    fn compile(&self, params: &StageParams) -> Option<CompiledStage> {
        Some(CompiledStage::Iso(IsoShade::from_params(params)))
    }
}

//! Symbolic face roles and the colour rules effect stages apply per role.

use glam::Vec3;

use crate::color::{Rgba, quantize};
use crate::face::Face;
use crate::shading::params::StageParams;

/// Orientation label used for effect styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceRole {
    Front = 0,
    Back = 1,
    Right = 2,
    Left = 3,
    Top = 4,
    Bottom = 5,
}

impl FaceRole {
    pub const ALL: [FaceRole; 6] = [
        Self::Front,
        Self::Back,
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
    ];

    /// Role from the dominant axis of a rotated normal.
    ///
    /// Z-dominant normals are always `Front`: a face pointing away from the
    /// eye is culled before any stage sees it.
    pub fn dominant(normal: Vec3) -> Self {
        let a = normal.abs();
        if a.z >= a.x && a.z >= a.y {
            Self::Front
        } else if a.x >= a.y {
            if normal.x > 0.0 { Self::Right } else { Self::Left }
        } else if normal.y > 0.0 {
            Self::Top
        } else {
            Self::Bottom
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter key holding this role's colour, e.g. `topColor`.
    pub const fn color_key(self) -> &'static str {
        match self {
            Self::Front => "frontColor",
            Self::Back => "backColor",
            Self::Right => "rightColor",
            Self::Left => "leftColor",
            Self::Top => "topColor",
            Self::Bottom => "bottomColor",
        }
    }
}

impl From<Face> for FaceRole {
    fn from(face: Face) -> Self {
        match face {
            Face::Front => Self::Front,
            Face::Back => Self::Back,
            Face::Right => Self::Right,
            Face::Left => Self::Left,
            Face::Top => Self::Top,
            Face::Bottom => Self::Bottom,
        }
    }
}

/// How a role colour modifies the working colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShadingMode {
    /// Scale RGB by the role colour's alpha.
    #[default]
    Alpha,
    /// Replace RGB with the role colour.
    Literal,
}

impl ShadingMode {
    /// `"literal"` selects [`ShadingMode::Literal`]; anything else is alpha.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("literal") {
            Self::Literal
        } else {
            Self::Alpha
        }
    }
}

/// Options shared by the role-based effect stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleStyle {
    pub mode: ShadingMode,
    /// In alpha mode, also multiply by the role colour's RGB.
    pub tint: bool,
    /// Leave faces whose base colour is pure untouched.
    pub material: bool,
}

impl RoleStyle {
    pub fn from_params(params: &StageParams) -> Self {
        Self {
            mode: params
                .text("shadingMode")
                .map(ShadingMode::parse)
                .unwrap_or_default(),
            tint: params.flag_or("enableTint", false),
            material: params.flag_or("materialMode", false),
        }
    }

    /// Whether the style leaves a face with this base colour unchanged.
    pub fn exempts(&self, base: Rgba) -> bool {
        self.material && base.is_pure()
    }

    /// Apply `role_color` to the working colour. Alpha is kept.
    pub fn apply(&self, color: Rgba, role_color: Rgba) -> Rgba {
        match self.mode {
            ShadingMode::Literal => color.with_rgb(role_color.r, role_color.g, role_color.b),
            ShadingMode::Alpha => {
                let brightness = role_color.a as f32 / 255.0;
                let factor = if self.tint {
                    Vec3::new(role_color.r as f32, role_color.g as f32, role_color.b as f32)
                        / 255.0
                        * brightness
                } else {
                    Vec3::splat(brightness)
                };
                color.with_rgb(
                    quantize(color.r as f32 * factor.x),
                    quantize(color.g as f32 * factor.y),
                    quantize(color.b as f32 * factor.z),
                )
            }
        }
    }
}

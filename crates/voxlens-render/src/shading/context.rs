//! Per-call and per-face inputs handed to shader stages.

use glam::Vec3;
use voxlens_math::{Bounds, EulerRotation};

use crate::color::Rgba;
use crate::face::Face;
use crate::shading::iso::IsoRoles;

/// Model-wide facts shared by every face in one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFrame {
    /// Rotation pivot (bounding-box centre of the voxel centres).
    pub pivot: Vec3,
    /// Cell extent on each axis.
    pub size: Vec3,
    pub rotation: EulerRotation,
    /// Rotated face normals, indexed by [`Face::index`].
    pub normals: [Vec3; 6],
    /// Eye-to-centroid view direction.
    pub uniform_view: Vec3,
    iso_roles: IsoRoles,
}

impl ModelFrame {
    pub fn new(
        bounds: &Bounds,
        rotation: EulerRotation,
        normals: [Vec3; 6],
        uniform_view: Vec3,
    ) -> Self {
        Self {
            pivot: bounds.center(),
            size: bounds.size(),
            rotation,
            normals,
            uniform_view,
            iso_roles: IsoRoles::assign(&normals, uniform_view),
        }
    }

    /// Half the bounding diagonal.
    pub fn model_radius(&self) -> f32 {
        self.size.length() * 0.5
    }

    /// Isometric role assignment for this rotation.
    pub fn iso_roles(&self) -> &IsoRoles {
        &self.iso_roles
    }
}

/// Everything a stage may read about the face being shaded.
#[derive(Clone, Copy, Debug)]
pub struct FaceContext<'a> {
    pub face: Face,
    /// Rotated unit normal.
    pub normal: Vec3,
    /// Unit vector toward the eye under the call's view policy.
    pub view: Vec3,
    /// Voxel centre in model space.
    pub position: Vec3,
    /// Voxel centre after rotation about the pivot.
    pub world: Vec3,
    /// The voxel's input colour, before any stage ran.
    pub base_color: Rgba,
    pub frame: &'a ModelFrame,
}

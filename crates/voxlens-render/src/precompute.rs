//! Pose inspection helpers for callers that want geometry without rendering.

use glam::Vec3;
use voxlens_math::EulerRotation;

use crate::face::{Face, FaceMask};
use crate::template::RotationTemplate;
use crate::visibility::{is_face_visible, visibility_threshold, visible_faces};

/// Rotated unit normals of the six faces, indexed by [`Face::index`].
pub fn rotated_normals(rotation: &EulerRotation) -> [Vec3; 6] {
    Face::ALL.map(|f| rotation.rotate_normal(f.normal()))
}

/// Rotated corners of a cube with edge `voxel_size`, centred on the origin.
pub fn rotated_cube(rotation: &EulerRotation, voxel_size: f32) -> [Vec3; 8] {
    RotationTemplate::build(rotation, voxel_size).corners
}

/// Faces a cube shows along `view` at the given rotation and voxel size.
pub fn faces_visible(rotation: &EulerRotation, view: Vec3, voxel_size: f32) -> FaceMask {
    let template = RotationTemplate::build(rotation, voxel_size);
    visible_faces(&template, view, visibility_threshold(voxel_size))
}

/// Where a voxel centre ends up after rotating the model about `pivot`.
pub fn rotated_position(position: Vec3, rotation: &EulerRotation, pivot: Vec3) -> Vec3 {
    rotation.rotate_about(position, pivot)
}

/// Whether a single rotated normal passes the visibility test.
pub fn face_visible(normal: Vec3, view: Vec3, voxel_size: f32) -> bool {
    is_face_visible(normal, view, visibility_threshold(voxel_size))
}

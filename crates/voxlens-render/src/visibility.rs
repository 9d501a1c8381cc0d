//! Back-face culling against a view vector and neighbour occupancy culling.

use glam::{IVec3, Vec3};
use rustc_hash::FxHashSet;

use crate::camera::Camera;
use crate::face::{Face, FaceMask};
use crate::template::RotationTemplate;
use crate::voxel::Voxel;

/// Voxel sizes above this no longer shrink the visibility threshold.
const THRESHOLD_SIZE_CAP: f32 = 3.0;

/// Minimum normal·view a face needs to be drawn.
///
/// Larger on-screen voxels get a smaller threshold, so grazing faces that
/// would cover many pixels still appear.
pub fn visibility_threshold(voxel_size: f32) -> f32 {
    0.01 / voxel_size.min(THRESHOLD_SIZE_CAP)
}

/// Whether a face with rotated `normal` faces the viewer along `view`.
///
/// Exactly perpendicular faces are never visible.
pub fn is_face_visible(normal: Vec3, view: Vec3, threshold: f32) -> bool {
    normal.dot(view) > threshold
}

/// The faces of a template that pass the visibility test for `view`.
pub fn visible_faces(template: &RotationTemplate, view: Vec3, threshold: f32) -> FaceMask {
    Face::ALL
        .into_iter()
        .filter(|f| is_face_visible(template.normal(*f), view, threshold))
        .collect()
}

/// How the view vector for a face is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPolicy {
    /// One vector for the whole call: eye toward the model centroid.
    Uniform,
    /// Eye toward each rotated voxel centre.
    PerVoxel,
}

impl ViewPolicy {
    pub fn view_vector(self, camera: &Camera, world: Vec3) -> Vec3 {
        match self {
            Self::Uniform => camera.uniform_view(),
            Self::PerVoxel => camera.view_from(world),
        }
    }

    /// Whether the vector can differ between voxels for this camera.
    pub fn varies(self, camera: &Camera) -> bool {
        self == Self::PerVoxel && camera.is_perspective()
    }
}

/// Set of lattice cells holding a voxel, for hidden-face culling.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: FxHashSet<IVec3>,
}

impl Occupancy {
    pub fn from_voxels(voxels: &[Voxel]) -> Self {
        Self {
            cells: voxels.iter().map(|v| Self::cell(v.position)).collect(),
        }
    }

    /// Lattice cell containing `position`.
    pub fn cell(position: Vec3) -> IVec3 {
        position.round().as_ivec3()
    }

    pub fn is_occupied(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }

    /// Whether `face` of the voxel at `position` is covered by a neighbour.
    pub fn hides(&self, position: Vec3, face: Face) -> bool {
        self.is_occupied(Self::cell(position) + face.neighbor_offset())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use voxlens_math::EulerRotation;

    #[test]
    fn test_threshold_shrinks_with_size() {
        assert!((visibility_threshold(1.0) - 0.01).abs() < 1e-9);
        assert!((visibility_threshold(2.0) - 0.005).abs() < 1e-9);
        assert_eq!(visibility_threshold(3.0), visibility_threshold(40.0));
    }

    #[test]
    fn test_perpendicular_face_never_visible() {
        assert!(!is_face_visible(Vec3::X, Vec3::Z, 0.0));
        assert!(!is_face_visible(Vec3::Y, Vec3::Z, visibility_threshold(8.0)));
    }

    #[test]
    fn test_facing_face_visible() {
        assert!(is_face_visible(Vec3::Z, Vec3::Z, visibility_threshold(1.0)));
        assert!(!is_face_visible(Vec3::NEG_Z, Vec3::Z, 0.0));
    }

    #[test]
    fn test_threshold_rejects_grazing_face() {
        let grazing = Vec3::new(1.0, 0.0, 0.005).normalize();
        assert!(!is_face_visible(grazing, Vec3::Z, visibility_threshold(1.0)));
        assert!(is_face_visible(grazing, Vec3::Z, visibility_threshold(3.0)));
    }

    #[test]
    fn test_identity_visible_faces() {
        let t = RotationTemplate::build(&EulerRotation::IDENTITY, 8.0);
        let mask = visible_faces(&t, Vec3::Z, visibility_threshold(8.0));
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![Face::Front]);
    }

    #[test]
    fn test_turned_visible_faces() {
        let t = RotationTemplate::build(&EulerRotation::from_degrees(30.0, -45.0, 0.0), 8.0);
        let mask = visible_faces(&t, Vec3::Z, visibility_threshold(8.0));
        assert!(mask.contains(Face::Front));
        assert!(mask.contains(Face::Right));
        assert!(mask.contains(Face::Top));
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_occupancy_hides_shared_faces() {
        let voxels = [
            Voxel::new(0.0, 0.0, 0.0, Rgba::WHITE),
            Voxel::new(1.0, 0.0, 0.0, Rgba::WHITE),
        ];
        let occ = Occupancy::from_voxels(&voxels);
        assert_eq!(occ.len(), 2);
        assert!(occ.hides(Vec3::ZERO, Face::Right));
        assert!(occ.hides(Vec3::X, Face::Left));
        assert!(!occ.hides(Vec3::ZERO, Face::Left));
        assert!(!occ.hides(Vec3::ZERO, Face::Top));
    }

    #[test]
    fn test_occupancy_rounds_positions() {
        let voxels = [Voxel::new(0.9, -0.2, 2.1, Rgba::WHITE)];
        let occ = Occupancy::from_voxels(&voxels);
        assert!(occ.is_occupied(IVec3::new(1, 0, 2)));
    }
}

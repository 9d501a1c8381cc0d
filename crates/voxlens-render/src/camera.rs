//! Camera model: projection choice, camera distance and voxel pixel size.
//!
//! The camera always sits on the +Z axis through the model centroid, looking
//! back toward it. Everything here is recomputed from the model bounds on
//! every render call.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use voxlens_math::{Bounds, EulerRotation};

/// Narrowest and widest accepted field of view, in degrees.
const FOV_RANGE: (f32, f32) = (5.0, 75.0);
/// Orthographic camera distance in multiples of the largest model extent.
const ORTHO_DISTANCE_FACTOR: f32 = 5.0;
/// Fraction of the smaller viewport side the model may occupy.
const VIEWPORT_FILL: f32 = 0.9;
/// Floor applied to every camera-space depth.
const MIN_DEPTH: f32 = 0.001;
/// Orthographic depth bias per unit of normal Z, keeps coincident faces ordered.
const ORTHO_NORMAL_BIAS: f32 = 0.001;

/// Which depth of the rotated model the user scale is calibrated at.
///
/// Parsed case-insensitively from the first letter of `front`, `middle` or
/// `back`; anything else selects [`DepthReference::Middle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DepthReference {
    /// Nearest point of the rotated bounding box.
    Front,
    /// The model centroid.
    #[default]
    Middle,
    /// Farthest point of the rotated bounding box.
    Back,
}

impl From<&str> for DepthReference {
    fn from(s: &str) -> Self {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('f') => Self::Front,
            Some('b') => Self::Back,
            _ => Self::Middle,
        }
    }
}

impl From<String> for DepthReference {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<DepthReference> for String {
    fn from(r: DepthReference) -> Self {
        match r {
            DepthReference::Front => "front",
            DepthReference::Middle => "middle",
            DepthReference::Back => "back",
        }
        .to_string()
    }
}

/// Projection used to map camera space onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Parallel projection; screen offsets are a direct linear scale.
    Orthographic,
    /// Pinhole projection.
    Perspective {
        /// Distance from the eye to the image plane, in pixels.
        focal_length: f32,
    },
}

/// Sanitized inputs to [`Camera::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    pub width: u32,
    pub height: u32,
    /// Requested pixels per voxel; must be positive.
    pub scale: f32,
    /// Field of view in degrees; 0 disables perspective.
    pub fov_degrees: f32,
    /// Forces orthographic projection regardless of the field of view.
    pub orthogonal: bool,
    pub reference: DepthReference,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            scale: 1.0,
            fov_degrees: 0.0,
            orthogonal: false,
            reference: DepthReference::Middle,
        }
    }
}

/// One projected quad corner: screen position and camera-space depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenVertex {
    pub position: Vec2,
    pub depth: f32,
}

/// Camera derived for a single render call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    /// Distance from the model centroid to the eye along +Z, in lattice units.
    pub distance: f32,
    /// Eye position in lattice units.
    pub position: Vec3,
    /// Pixels per voxel edge at the reference depth.
    pub voxel_size: f32,
    /// Model centroid; projects onto the viewport centre.
    pub pivot: Vec3,
    /// Viewport centre in pixels.
    pub screen_center: Vec2,
}

impl Camera {
    /// Derive the camera for a model with the given bounds and rotation.
    pub fn new(bounds: &Bounds, rotation: &EulerRotation, settings: &CameraSettings) -> Self {
        let pivot = bounds.center();
        let max_dim = match bounds.max_dim() {
            d if d.is_finite() && d > 0.0 => d,
            _ => 1.0,
        };
        let scale = if settings.scale.is_finite() && settings.scale > 0.0 {
            settings.scale
        } else {
            1.0
        };
        let max_allowed = settings.width.min(settings.height) as f32 * VIEWPORT_FILL;
        let screen_center = Vec2::new(settings.width as f32, settings.height as f32) * 0.5;

        let perspective = !settings.orthogonal && settings.fov_degrees > 0.0;

        let (projection, distance, voxel_size) = if perspective {
            let fov = settings.fov_degrees.clamp(FOV_RANGE.0, FOV_RANGE.1);
            let warp = (fov - FOV_RANGE.0) / (FOV_RANGE.1 - FOV_RANGE.0);
            let amplified = warp.cbrt();
            let distance = max_dim * (1.2 + (1.0 - amplified).powi(2) * 45.0);
            let focal_length = (settings.height as f32 * 0.5) / (fov.to_radians() * 0.5).tan();

            let voxel_size = if focal_length > 1e-6 {
                let reference_depth =
                    reference_depth(bounds, rotation, pivot, distance, settings.reference);
                let size = (scale * reference_depth / focal_length).min(max_allowed / max_dim);
                if size > 0.0 { size } else { 1.0 }
            } else {
                1.0
            };
            (
                Projection::Perspective { focal_length },
                distance,
                voxel_size,
            )
        } else {
            let mut voxel_size = scale.max(1.0);
            if voxel_size * max_dim > max_allowed {
                voxel_size = max_allowed / max_dim;
            }
            if voxel_size.is_nan() || voxel_size <= 0.0 {
                voxel_size = 1.0;
            }
            (
                Projection::Orthographic,
                max_dim * ORTHO_DISTANCE_FACTOR,
                voxel_size,
            )
        };

        Self {
            projection,
            distance,
            position: pivot + Vec3::Z * distance,
            voxel_size,
            pivot,
            screen_center,
        }
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Focal length in pixels, or 0 under orthographic projection.
    pub fn focal_length(&self) -> f32 {
        match self.projection {
            Projection::Perspective { focal_length } => focal_length,
            Projection::Orthographic => 0.0,
        }
    }

    /// Direction from the model centroid to the eye.
    pub fn uniform_view(&self) -> Vec3 {
        (self.position - self.pivot).try_normalize().unwrap_or(Vec3::Z)
    }

    /// Direction from a rotated voxel centre to the eye.
    ///
    /// Orthographic rays are parallel, so every voxel sees `+Z`.
    pub fn view_from(&self, world: Vec3) -> Vec3 {
        if !self.is_perspective() {
            return Vec3::Z;
        }
        let to_eye = self.position - world;
        let len = to_eye.length();
        if len > 1e-5 { to_eye / len } else { Vec3::Z }
    }

    /// Project one rotated cube corner.
    ///
    /// `world` is the rotated voxel centre in lattice units, `offset` the
    /// rotated corner offset in pixels and `normal_z` the face normal's Z.
    pub fn project(&self, world: Vec3, offset: Vec3, normal_z: f32) -> ScreenVertex {
        let vs = self.voxel_size;
        let wx = world.x * vs + offset.x;
        let wy = world.y * vs + offset.y;
        let wz = world.z + offset.z / vs;
        let eye_z = self.position.z;

        let (depth, s) = match self.projection {
            Projection::Perspective { focal_length } => {
                let depth = (eye_z - wz).max(MIN_DEPTH);
                (depth, focal_length / depth)
            }
            Projection::Orthographic => (eye_z - wz + normal_z * ORTHO_NORMAL_BIAS, 1.0),
        };

        ScreenVertex {
            position: Vec2::new(
                self.screen_center.x + (wx - self.pivot.x * vs) * s,
                self.screen_center.y + (wy - self.pivot.y * vs) * s,
            ),
            depth,
        }
    }
}

/// Camera-space depth the user scale is calibrated at.
fn reference_depth(
    bounds: &Bounds,
    rotation: &EulerRotation,
    pivot: Vec3,
    distance: f32,
    reference: DepthReference,
) -> f32 {
    let eye_z = pivot.z + distance;
    match reference {
        DepthReference::Middle => distance.max(MIN_DEPTH),
        DepthReference::Front | DepthReference::Back => {
            let (z_min, z_max) = bounds
                .corners()
                .iter()
                .map(|c| rotation.rotate_about(*c, pivot).z)
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), z| {
                    (lo.min(z), hi.max(z))
                });
            if reference == DepthReference::Front {
                (eye_z - z_max).max(MIN_DEPTH)
            } else {
                (eye_z - z_min).max(MIN_DEPTH)
            }
        }
    }
}

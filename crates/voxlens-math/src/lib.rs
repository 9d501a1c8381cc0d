//! Rotation and bounding-box math shared by the voxlens renderer.

mod bounds;
mod rotation;

pub use bounds::Bounds;
pub use rotation::{EulerRotation, normalize_degrees};

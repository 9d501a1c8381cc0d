//! Axis-aligned bounds over voxel centres.

use glam::Vec3;

/// Bounding box spanning the centres of a set of voxels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Smallest centre coordinate on each axis.
    pub min: Vec3,
    /// Largest centre coordinate on each axis.
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from two corners, sorting components so `min <= max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Bounds of a set of points, or `None` when the set is empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    /// Midpoint between the extreme centres; the rotation pivot.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent in cells on each axis. A single voxel has size 1.
    pub fn size(&self) -> Vec3 {
        self.max - self.min + Vec3::ONE
    }

    /// Largest of the three cell extents.
    pub fn max_dim(&self) -> f32 {
        self.size().max_element()
    }

    /// Length of the cell-extent diagonal.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// The eight corners of the centre box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ]
    }
}

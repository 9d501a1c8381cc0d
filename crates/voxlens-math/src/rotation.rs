//! Euler rotation about a pivot, applied as X, then Y, then Z.

use glam::Vec3;

/// Normalised angles are snapped to multiples of `1 / ANGLE_STEPS` degrees.
const ANGLE_STEPS: f64 = 1e6;

/// Wrap an angle into `[0, 360)` and snap it to a fixed grid.
///
/// Snapping makes `a` and `a + 360` collapse to the same `f64`, so both
/// produce bit-identical sines and cosines. Non-finite input maps to 0.
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    let snapped = (wrapped * ANGLE_STEPS).round() / ANGLE_STEPS;
    if snapped >= 360.0 { 0.0 } else { snapped }
}

/// Rotation by three Euler angles in degrees.
///
/// The per-axis sines and cosines are computed once at construction. Rotations
/// follow the right-handed convention and are applied about X first, then Y,
/// then Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerRotation {
    degrees: [f64; 3],
    cos: Vec3,
    sin: Vec3,
}

impl EulerRotation {
    /// The rotation that leaves every vector unchanged.
    pub const IDENTITY: Self = Self {
        degrees: [0.0; 3],
        cos: Vec3::ONE,
        sin: Vec3::ZERO,
    };

    /// Build a rotation from angles about X, Y and Z in degrees.
    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        let degrees = [
            normalize_degrees(x),
            normalize_degrees(y),
            normalize_degrees(z),
        ];
        let [rx, ry, rz] = degrees.map(f64::to_radians);
        Self {
            degrees,
            cos: Vec3::new(rx.cos() as f32, ry.cos() as f32, rz.cos() as f32),
            sin: Vec3::new(rx.sin() as f32, ry.sin() as f32, rz.sin() as f32),
        }
    }

    /// The normalised angles in degrees.
    pub fn degrees(&self) -> [f64; 3] {
        self.degrees
    }

    /// Bit patterns of the normalised angles, usable as a hash key.
    pub fn key(&self) -> [u64; 3] {
        self.degrees.map(f64::to_bits)
    }

    /// Rotate a vector about the origin.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let (c, s) = (self.cos, self.sin);

        let y1 = v.y * c.x - v.z * s.x;
        let z1 = v.y * s.x + v.z * c.x;

        let x2 = v.x * c.y + z1 * s.y;
        let z2 = -v.x * s.y + z1 * c.y;

        let x3 = x2 * c.z - y1 * s.z;
        let y3 = x2 * s.z + y1 * c.z;

        Vec3::new(x3, y3, z2)
    }

    /// Rotate a point about `pivot`.
    pub fn rotate_about(&self, point: Vec3, pivot: Vec3) -> Vec3 {
        self.rotate(point - pivot) + pivot
    }

    /// Rotate a direction and renormalise it.
    ///
    /// A zero vector stays zero.
    pub fn rotate_normal(&self, normal: Vec3) -> Vec3 {
        let rotated = self.rotate(normal);
        let len = rotated.length();
        if len > 0.0 { rotated / len } else { rotated }
    }
}

impl Default for EulerRotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

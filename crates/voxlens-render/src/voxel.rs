//! Voxel input records.

use glam::Vec3;
use serde::Deserialize;

use crate::color::Rgba;
use crate::error::VoxelError;

/// A coloured unit cube centred on a lattice position.
///
/// Deserializes from either the positional form `[x, y, z, r, g, b, a]` or
/// the structured form `{"x":..,"y":..,"z":..,"color":{"r":..,..}}`. Missing
/// colour channels default to 255.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "VoxelEntry")]
pub struct Voxel {
    /// Centre of the cube in lattice units.
    pub position: Vec3,
    /// Flat colour of every face.
    pub color: Rgba,
}

impl Voxel {
    pub fn new(x: f32, y: f32, z: f32, color: Rgba) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            color,
        }
    }
}

fn opaque_white() -> Rgba {
    Rgba::WHITE
}

/// Wire forms accepted for a single voxel.
#[derive(Deserialize)]
#[serde(untagged)]
enum VoxelEntry {
    Structured {
        x: f64,
        y: f64,
        z: f64,
        #[serde(default = "opaque_white")]
        color: Rgba,
    },
    Positional(Vec<f64>),
}

impl TryFrom<VoxelEntry> for Voxel {
    type Error = VoxelError;

    fn try_from(entry: VoxelEntry) -> Result<Self, Self::Error> {
        match entry {
            VoxelEntry::Structured { x, y, z, color } => {
                Ok(Self::new(x as f32, y as f32, z as f32, color))
            }
            VoxelEntry::Positional(values) => {
                let [x, y, z, rest @ ..] = values.as_slice() else {
                    return Err(VoxelError::TooFewComponents(values.len()));
                };
                let channel = |i: usize| {
                    rest.get(i)
                        .filter(|v| v.is_finite())
                        .map_or(255, |v| v.round().clamp(0.0, 255.0) as u8)
                };
                let color = Rgba::new(channel(0), channel(1), channel(2), channel(3));
                Ok(Self::new(*x as f32, *y as f32, *z as f32, color))
            }
        }
    }
}

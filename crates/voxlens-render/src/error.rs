//! Error types reported by render calls and stage lookups.

use thiserror::Error;

use crate::shading::StageKind;

/// Status returned by a render call that could not produce an image.
///
/// The `Display` output is the human-readable status message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Width or height was zero.
    #[error("invalid viewport {width}x{height}: width and height must be > 0")]
    InvalidDimensions { width: u32, height: u32 },

    /// The pixel buffer would exceed the allocation limit.
    #[error("viewport {width}x{height} exceeds the {limit}-byte pixel buffer limit")]
    BufferTooLarge { width: u32, height: u32, limit: usize },

    /// A serialized request could not be decoded.
    #[error("invalid render request: {0}")]
    InvalidRequest(String),

    /// Another render is still running on the same renderer.
    #[error("a render is already in flight")]
    Busy,
}

/// Failure to resolve a shader stage descriptor against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("unknown shader stage '{id}'")]
    Unknown { id: String },

    #[error("shader stage '{id}' is a {actual} stage, expected {expected}")]
    WrongKind {
        id: String,
        expected: StageKind,
        actual: StageKind,
    },
}

/// A voxel entry that could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoxelError {
    #[error("positional voxel entry needs at least 3 coordinates, got {0}")]
    TooFewComponents(usize),
}

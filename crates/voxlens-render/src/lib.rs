//! Software renderer that turns a lattice of coloured voxels into an RGBA image.
//!
//! A render call rotates the model about its centroid, derives an orthographic
//! or perspective camera, culls faces that point away from the viewer, shades
//! the survivors through a pipeline of lighting and effect stages, and paints
//! the resulting quads back to front with a scanline fill.
//!
//! [`Renderer`] owns the state that outlives a single call (the stage registry
//! and the rotation template cache). [`RenderGate`] wraps it for callers that
//! need an explicit single-flight guard.

pub mod camera;
pub mod color;
mod error;
pub mod face;
mod guard;
pub mod params;
pub mod precompute;
pub mod raster;
mod render;
mod request;
pub mod shading;
pub mod template;
pub mod visibility;
pub mod voxel;

#[cfg(test)]
mod tests;

pub use camera::{Camera, CameraSettings, DepthReference, Projection};
pub use color::Rgba;
pub use error::{RenderError, StageError, VoxelError};
pub use face::{Face, FaceMask};
pub use guard::RenderGate;
pub use params::RenderParams;
pub use raster::{FaceQuad, PixelBuffer};
pub use render::{RenderVariant, RenderedImage, Renderer};
pub use request::RenderRequest;
pub use shading::{
    CompiledStage, ExecutionPath, FaceContext, ModelFrame, ParamSpec, ParamValue, ShaderStage,
    StageDescriptor, StageInfo, StageKind, StageParams, StageRegistry,
};
pub use template::{RotationTemplate, TemplateCache};
pub use visibility::{Occupancy, ViewPolicy};
pub use voxel::Voxel;
pub use voxlens_math::{Bounds, EulerRotation};

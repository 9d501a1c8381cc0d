//! Render entry points. Every variant shares the camera, culling, projection
//! and rasterisation core and differs only in how a face colour is produced.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;
use voxlens_math::Bounds;

use crate::camera::Camera;
use crate::color::Rgba;
use crate::error::RenderError;
use crate::face::Face;
use crate::params::RenderParams;
use crate::raster::{FaceQuad, PixelBuffer, rasterize};
use crate::request::RenderRequest;
use crate::shading::{
    ExecutionPath, FaceColorCache, FaceContext, ModelFrame, ShadingPipeline, StageRegistry,
};
use crate::template::{DEFAULT_TEMPLATE_CAPACITY, RotationTemplate, TemplateCache};
use crate::visibility::{Occupancy, ViewPolicy, visibility_threshold, visible_faces};
use crate::voxel::Voxel;

/// Which shading configuration a render call uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderVariant {
    /// A single camera-facing light.
    #[default]
    Basic,
    /// The directional light configured by `dynamicLighting`.
    Dynamic,
    /// The configured `lighting` and `fx` stage lists.
    Stack,
}

/// Output of a successful render call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes, top-left origin.
    pub pixels: Vec<u8>,
    /// Number of face quads drawn.
    pub face_count: usize,
}

impl RenderedImage {
    fn new(buffer: PixelBuffer, face_count: usize) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            pixels: buffer.into_raw(),
            face_count,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.pixels.get(i..i + 4)?;
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }
}

/// Owns the state that persists across render calls.
///
/// Methods take `&mut self`, so calls against one renderer never overlap.
/// Wrap it in a [`crate::RenderGate`] to share it between threads.
#[derive(Debug, Default)]
pub struct Renderer {
    registry: StageRegistry,
    templates: TemplateCache,
}

impl Renderer {
    /// A renderer with the built-in stages and the default template cache.
    pub fn new() -> Self {
        Self::with_registry(StageRegistry::with_builtins())
    }

    pub fn with_registry(registry: StageRegistry) -> Self {
        Self {
            registry,
            templates: TemplateCache::new(DEFAULT_TEMPLATE_CAPACITY),
        }
    }

    /// Resize the template cache; 0 disables it.
    pub fn with_template_capacity(mut self, capacity: usize) -> Self {
        self.templates.set_capacity(capacity);
        self
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StageRegistry {
        &mut self.registry
    }

    pub fn template_cache(&self) -> &TemplateCache {
        &self.templates
    }

    /// Camera-facing light with a single view vector for the whole model.
    ///
    /// In mesh mode faces keep their flat voxel colour.
    pub fn render_basic(
        &mut self,
        voxels: &[Voxel],
        params: &RenderParams,
    ) -> Result<RenderedImage, RenderError> {
        let light = params.camera_facing();
        let flat = params.mesh_mode;
        render_faces(
            &mut self.templates,
            voxels,
            params,
            ViewPolicy::Uniform,
            |_| {
                move |face: &FaceContext<'_>| {
                    if flat {
                        face.base_color
                    } else {
                        light.apply(face.base_color, face)
                    }
                }
            },
        )
    }

    /// Directional light with per-voxel view vectors.
    pub fn render_dynamic(
        &mut self,
        voxels: &[Voxel],
        params: &RenderParams,
    ) -> Result<RenderedImage, RenderError> {
        let light = params.directional_light();
        render_faces(
            &mut self.templates,
            voxels,
            params,
            ViewPolicy::PerVoxel,
            |_| move |face: &FaceContext<'_>| light.apply(face.base_color, face),
        )
    }

    /// The configured lighting and effect stages.
    ///
    /// Output is identical for either execution path.
    pub fn render_stack(
        &mut self,
        voxels: &[Voxel],
        params: &RenderParams,
        path: ExecutionPath,
    ) -> Result<RenderedImage, RenderError> {
        let pipeline = ShadingPipeline::resolve(&self.registry, &params.lighting, &params.fx, path);
        let policy = ViewPolicy::PerVoxel;
        render_faces(&mut self.templates, voxels, params, policy, |camera| {
            let pipeline = &pipeline;
            let memoize = pipeline.is_face_invariant(policy.varies(camera));
            let mut cache = FaceColorCache::new();
            move |face: &FaceContext<'_>| {
                if memoize {
                    cache.get_or_insert_with(face.base_color, face.face, || {
                        pipeline.shade(face.base_color, face)
                    })
                } else {
                    pipeline.shade(face.base_color, face)
                }
            }
        })
    }

    /// Dispatch on `variant`; stacks use the compiled path.
    pub fn render(
        &mut self,
        variant: RenderVariant,
        voxels: &[Voxel],
        params: &RenderParams,
    ) -> Result<RenderedImage, RenderError> {
        match variant {
            RenderVariant::Basic => self.render_basic(voxels, params),
            RenderVariant::Dynamic => self.render_dynamic(voxels, params),
            RenderVariant::Stack => self.render_stack(voxels, params, ExecutionPath::Compiled),
        }
    }

    /// Render a decoded request.
    pub fn handle(&mut self, request: &RenderRequest) -> Result<RenderedImage, RenderError> {
        match request.variant {
            RenderVariant::Stack => {
                self.render_stack(&request.voxels, &request.params, request.execution)
            }
            variant => self.render(variant, &request.voxels, &request.params),
        }
    }
}

/// The shared render core.
///
/// `make_shader` receives the call's camera and returns the per-face colour
/// function.
fn render_faces<M, F>(
    templates: &mut TemplateCache,
    voxels: &[Voxel],
    params: &RenderParams,
    policy: ViewPolicy,
    make_shader: M,
) -> Result<RenderedImage, RenderError>
where
    M: FnOnce(&Camera) -> F,
    F: FnMut(&FaceContext<'_>) -> Rgba,
{
    let (width, height) = params.dimensions()?;
    let Some(bounds) = Bounds::from_points(voxels.iter().map(|v| v.position)) else {
        debug!(width, height, "empty model, background only");
        let buffer = PixelBuffer::filled(width, height, params.background_color);
        return Ok(RenderedImage::new(buffer, 0));
    };

    let rotation = params.rotation();
    let camera = Camera::new(&bounds, &rotation, &params.camera_settings());
    // Perspective scales per vertex, so only the orthographic path reuses templates.
    let template = if camera.is_perspective() {
        RotationTemplate::build(&rotation, camera.voxel_size)
    } else {
        templates.get_or_build(&rotation, camera.voxel_size)
    };
    let frame = ModelFrame::new(&bounds, rotation, template.normals, camera.uniform_view());
    let threshold = visibility_threshold(camera.voxel_size);
    let occupancy = params.mesh_mode.then(|| Occupancy::from_voxels(voxels));
    let mut shade = make_shader(&camera);

    let mut quads = Vec::with_capacity(voxels.len() * 3);
    for voxel in voxels {
        let world = rotation.rotate_about(voxel.position, camera.pivot);
        let view = policy.view_vector(&camera, world);
        for face in visible_faces(&template, view, threshold).iter() {
            if occupancy.as_ref().is_some_and(|o| o.hides(voxel.position, face)) {
                continue;
            }
            let normal = template.normal(face);
            let ctx = FaceContext {
                face,
                normal,
                view,
                position: voxel.position,
                world,
                base_color: voxel.color,
                frame: &frame,
            };
            let color = shade(&ctx);
            quads.push(project_face(&camera, &template, face, world, normal.z, color));
        }
    }

    let face_count = quads.len();
    let buffer = rasterize(quads, width, height, params.background_color);
    debug!(
        voxels = voxels.len(),
        faces = face_count,
        perspective = camera.is_perspective(),
        voxel_size = camera.voxel_size,
        "render complete"
    );
    Ok(RenderedImage::new(buffer, face_count))
}

fn project_face(
    camera: &Camera,
    template: &RotationTemplate,
    face: Face,
    world: Vec3,
    normal_z: f32,
    color: Rgba,
) -> FaceQuad {
    let vertices = template
        .face_corners(face)
        .map(|offset| camera.project(world, offset, normal_z));
    let depth = vertices.iter().map(|v| v.depth).sum::<f32>() / 4.0;
    FaceQuad {
        points: vertices.map(|v| v.position),
        depth,
        color,
    }
}

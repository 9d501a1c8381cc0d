//! Ordered lighting and effect stages resolved for one render call.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgba;
use crate::face::Face;
use crate::shading::{
    CompiledStage, FaceContext, ShaderStage, StageDescriptor, StageKind, StageParams,
    StageRegistry,
};

/// How stages are run per face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPath {
    /// Parameters are resolved once per call into typed stages.
    #[default]
    Compiled,
    /// Every face looks its stage up and re-reads the parameter map.
    Interpreted,
}

enum PipelineStage {
    Compiled(CompiledStage),
    Interpreted {
        stage: Arc<dyn ShaderStage>,
        params: StageParams,
    },
}

/// Lighting stages followed by effect stages, each in configured order.
pub struct ShadingPipeline {
    stages: Vec<PipelineStage>,
}

impl ShadingPipeline {
    /// Resolve descriptors against `registry`.
    ///
    /// Disabled descriptors are skipped. Unknown ids and stages listed under
    /// the wrong kind are logged and skipped; they never fail the render.
    pub fn resolve(
        registry: &StageRegistry,
        lighting: &[StageDescriptor],
        fx: &[StageDescriptor],
        path: ExecutionPath,
    ) -> Self {
        let lists = [(StageKind::Lighting, lighting), (StageKind::Effect, fx)];
        let mut stages = Vec::with_capacity(lighting.len() + fx.len());
        for (kind, descriptors) in lists {
            for descriptor in descriptors.iter().filter(|d| d.enabled) {
                let stage = match registry.resolve(&descriptor.id, kind) {
                    Ok(stage) => stage,
                    Err(err) => {
                        warn!("skipping shader stage: {err}");
                        continue;
                    }
                };
                let compiled = match path {
                    ExecutionPath::Compiled => stage.compile(&descriptor.params),
                    ExecutionPath::Interpreted => None,
                };
                stages.push(match compiled {
                    Some(compiled) => PipelineStage::Compiled(compiled),
                    None => PipelineStage::Interpreted {
                        stage: Arc::clone(stage),
                        params: descriptor.params.clone(),
                    },
                });
            }
        }
        Self { stages }
    }

    /// A pipeline of already compiled stages.
    pub fn from_compiled(stages: impl IntoIterator<Item = CompiledStage>) -> Self {
        Self {
            stages: stages.into_iter().map(PipelineStage::Compiled).collect(),
        }
    }

    /// Run every stage over `color` in order.
    pub fn shade(&self, color: Rgba, face: &FaceContext<'_>) -> Rgba {
        self.stages.iter().fold(color, |color, stage| match stage {
            PipelineStage::Compiled(compiled) => compiled.apply(color, face),
            PipelineStage::Interpreted { stage, params } => stage.shade(color, face, params),
        })
    }

    /// Whether every stage is compiled and independent of voxel position.
    pub fn is_face_invariant(&self, view_varies: bool) -> bool {
        self.stages.iter().all(|stage| match stage {
            PipelineStage::Compiled(compiled) => compiled.is_face_invariant(view_varies),
            PipelineStage::Interpreted { .. } => false,
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Shaded colour per (base colour, face), for face-invariant pipelines.
#[derive(Debug, Default)]
pub struct FaceColorCache {
    entries: FxHashMap<Rgba, [Option<Rgba>; 6]>,
}

impl FaceColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached colour for `base` on `face`, computing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        base: Rgba,
        face: Face,
        shade: impl FnOnce() -> Rgba,
    ) -> Rgba {
        let slot = &mut self.entries.entry(base).or_default()[face.index()];
        *slot.get_or_insert_with(shade)
    }

    /// Number of distinct base colours seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::{CameraFacing, DirectionalLight, ModelFrame};
    use glam::Vec3;
    use voxlens_math::{Bounds, EulerRotation};

    fn frame() -> ModelFrame {
        ModelFrame::new(
            &Bounds::new(Vec3::ZERO, Vec3::new(4.0, 4.0, 4.0)),
            EulerRotation::IDENTITY,
            Face::ALL.map(Face::normal),
            Vec3::Z,
        )
    }

    fn ctx(frame: &ModelFrame, face: Face, world: Vec3) -> FaceContext<'_> {
        FaceContext {
            face,
            normal: face.normal(),
            view: Vec3::Z,
            position: world,
            world,
            base_color: Rgba::new(200, 100, 50, 255),
            frame,
        }
    }

    fn stack() -> (Vec<StageDescriptor>, Vec<StageDescriptor>) {
        (
            vec![
                StageDescriptor::new("dynamic").with_param("pitch", 10.0),
                StageDescriptor::new("basic").disabled(),
            ],
            vec![
                StageDescriptor::new("iso").with_param("enableTint", true),
                StageDescriptor::new("faceshade")
                    .with_param("shadingMode", "literal")
                    .with_param("frontColor", Rgba::new(10, 20, 30, 255)),
            ],
        )
    }

    #[test]
    fn test_disabled_and_unknown_stages_skipped() {
        let registry = StageRegistry::default();
        let lighting = vec![
            StageDescriptor::new("basic").disabled(),
            StageDescriptor::new("nope"),
            StageDescriptor::new("iso"),
        ];
        let pipeline = ShadingPipeline::resolve(&registry, &lighting, &[], ExecutionPath::Compiled);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_compiled_matches_interpreted() {
        let registry = StageRegistry::default();
        let (lighting, fx) = stack();
        let compiled = ShadingPipeline::resolve(&registry, &lighting, &fx, ExecutionPath::Compiled);
        let interpreted =
            ShadingPipeline::resolve(&registry, &lighting, &fx, ExecutionPath::Interpreted);
        assert_eq!(compiled.len(), 3);
        assert_eq!(interpreted.len(), 3);

        let f = frame();
        for face in Face::ALL {
            for world in [Vec3::ZERO, Vec3::new(4.0, 1.0, 3.0)] {
                let c = ctx(&f, face, world);
                assert_eq!(
                    compiled.shade(c.base_color, &c),
                    interpreted.shade(c.base_color, &c)
                );
            }
        }
    }

    #[test]
    fn test_stages_run_in_list_order() {
        let f = frame();
        let c = ctx(&f, Face::Front, Vec3::ZERO);
        let literal = crate::shading::FaceShade::from_params(
            &StageParams::new()
                .with("shadingMode", "literal")
                .with("frontColor", Rgba::new(100, 100, 100, 255)),
        );
        let halve = CameraFacing::new(50.0, 0.0);
        // A 0..50 ramp gives 50% at dot 1.
        let a = ShadingPipeline::from_compiled([
            CompiledStage::FaceShade(literal),
            CompiledStage::CameraFacing(halve),
        ]);
        assert_eq!(a.shade(c.base_color, &c), Rgba::new(50, 50, 50, 255));
        let b = ShadingPipeline::from_compiled([
            CompiledStage::CameraFacing(halve),
            CompiledStage::FaceShade(literal),
        ]);
        assert_eq!(b.shade(c.base_color, &c), Rgba::new(100, 100, 100, 255));
    }

    #[test]
    fn test_face_invariance() {
        let beam = DirectionalLight::default();
        assert!(!ShadingPipeline::from_compiled([CompiledStage::Directional(beam)])
            .is_face_invariant(false));

        let flat = DirectionalLight {
            diameter: 0.0,
            ..DirectionalLight::default()
        };
        let p = ShadingPipeline::from_compiled([CompiledStage::Directional(flat)]);
        assert!(p.is_face_invariant(false));
        assert!(p.is_face_invariant(true));

        let basic = ShadingPipeline::from_compiled([CompiledStage::CameraFacing(
            CameraFacing::default(),
        )]);
        assert!(basic.is_face_invariant(false));
        assert!(!basic.is_face_invariant(true));

        let registry = StageRegistry::default();
        let interpreted = ShadingPipeline::resolve(
            &registry,
            &[],
            &[StageDescriptor::new("iso")],
            ExecutionPath::Interpreted,
        );
        assert!(!interpreted.is_face_invariant(false));
    }

    #[test]
    fn test_face_color_cache() {
        let mut cache = FaceColorCache::new();
        let red = Rgba::new(255, 0, 0, 255);
        let mut calls = 0;
        for _ in 0..3 {
            let c = cache.get_or_insert_with(red, Face::Top, || {
                calls += 1;
                Rgba::BLACK
            });
            assert_eq!(c, Rgba::BLACK);
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }
}

//! Lookup table of shader stages by id.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::StageError;
use crate::shading::{
    CameraFacingStage, DirectionalStage, FaceShadeStage, IsoStage, ShaderStage, StageInfo,
    StageKind,
};

/// Registry mapping stage ids to [`ShaderStage`] implementations.
///
/// Stages keep their registration order, which is the order
/// [`StageRegistry::infos`] lists them in. Registering an id that already
/// exists replaces the stage in place.
#[derive(Clone)]
pub struct StageRegistry {
    stages: Vec<Arc<dyn ShaderStage>>,
    by_id: FxHashMap<String, usize>,
}

impl StageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            by_id: FxHashMap::default(),
        }
    }

    /// A registry holding the four built-in stages.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CameraFacingStage));
        registry.register(Arc::new(DirectionalStage));
        registry.register(Arc::new(FaceShadeStage));
        registry.register(Arc::new(IsoStage));
        registry
    }

    /// Add a stage, returning the one it replaced, if any.
    pub fn register(&mut self, stage: Arc<dyn ShaderStage>) -> Option<Arc<dyn ShaderStage>> {
        let id = stage.id().to_string();
        info!(stage = %id, kind = %stage.kind(), "registering shader stage");
        match self.by_id.get(&id) {
            Some(&index) => Some(std::mem::replace(&mut self.stages[index], stage)),
            None => {
                self.by_id.insert(id, self.stages.len());
                self.stages.push(stage);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn ShaderStage>> {
        self.by_id.get(id).map(|&index| &self.stages[index])
    }

    /// Look up `id` and check it belongs to the `expected` list.
    pub fn resolve(
        &self,
        id: &str,
        expected: StageKind,
    ) -> Result<&Arc<dyn ShaderStage>, StageError> {
        let stage = self
            .get(id)
            .ok_or_else(|| StageError::Unknown { id: id.to_string() })?;
        let actual = stage.kind();
        if actual != expected {
            return Err(StageError::WrongKind {
                id: id.to_string(),
                expected,
                actual,
            });
        }
        Ok(stage)
    }

    pub fn infos(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|s| s.info()).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.id())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

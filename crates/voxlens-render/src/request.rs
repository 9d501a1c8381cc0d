//! JSON render requests.

use serde::Deserialize;

use crate::error::RenderError;
use crate::params::RenderParams;
use crate::render::RenderVariant;
use crate::shading::ExecutionPath;
use crate::voxel::Voxel;

/// A complete render call as read from JSON:
/// `{"variant": "stack", "voxels": [...], "params": {...}}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    pub variant: RenderVariant,
    pub voxels: Vec<Voxel>,
    pub params: RenderParams,
    /// Execution path for stack renders.
    pub execution: ExecutionPath,
}

impl RenderRequest {
    pub fn from_json(text: &str) -> Result<Self, RenderError> {
        serde_json::from_str(text).map_err(|e| RenderError::InvalidRequest(e.to_string()))
    }

    /// Decode an already parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RenderError> {
        serde_json::from_value(value).map_err(|e| RenderError::InvalidRequest(e.to_string()))
    }
}

//! Single-flight access to a shared [`Renderer`].

use std::sync::{Mutex, TryLockError};

use tracing::warn;

use crate::error::RenderError;
use crate::render::Renderer;

/// Lets one render run at a time and turns away overlapping requests.
///
/// A request that arrives while another is in flight fails with
/// [`RenderError::Busy`] instead of waiting.
#[derive(Debug, Default)]
pub struct RenderGate {
    renderer: Mutex<Renderer>,
}

impl RenderGate {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer: Mutex::new(renderer),
        }
    }

    /// Run `f` with exclusive access to the renderer, or fail with `Busy`.
    pub fn try_render<T>(
        &self,
        f: impl FnOnce(&mut Renderer) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        let mut renderer = match self.renderer.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(RenderError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!("previous render panicked; reusing renderer state");
                poisoned.into_inner()
            }
        };
        f(&mut renderer)
    }

    /// Whether a render is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.renderer.try_lock(), Err(TryLockError::WouldBlock))
    }

    pub fn into_inner(self) -> Renderer {
        self.renderer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

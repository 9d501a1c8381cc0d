//! Rotated cube geometry shared by every voxel in a render call, plus a
//! bounded cache of it keyed by rotation and voxel size.

use std::collections::VecDeque;

use glam::Vec3;
use rustc_hash::FxHashMap;
use tracing::trace;
use voxlens_math::EulerRotation;

use crate::face::{Face, UNIT_CUBE};

/// Default number of templates kept by [`TemplateCache`].
pub const DEFAULT_TEMPLATE_CAPACITY: usize = 64;

/// Face normals and cube corner offsets for one rotation and voxel size.
///
/// Corner offsets keep their rotated Z, so projecting through a template
/// preserves per-vertex depth exactly as recomputing would.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationTemplate {
    /// Rotated unit normals, indexed by [`Face::index`].
    pub normals: [Vec3; 6],
    /// Rotated [`UNIT_CUBE`] corners scaled to pixels.
    pub corners: [Vec3; 8],
    pub voxel_size: f32,
}

impl RotationTemplate {
    pub fn build(rotation: &EulerRotation, voxel_size: f32) -> Self {
        Self {
            normals: Face::ALL.map(|f| rotation.rotate_normal(f.normal())),
            corners: UNIT_CUBE.map(|c| rotation.rotate(c * voxel_size)),
            voxel_size,
        }
    }

    pub fn normal(&self, face: Face) -> Vec3 {
        self.normals[face.index()]
    }

    /// Offsets of the four corners of `face`, in winding order.
    pub fn face_corners(&self, face: Face) -> [Vec3; 4] {
        face.corners().map(|i| self.corners[i])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TemplateKey {
    rotation: [u64; 3],
    voxel_size: u32,
}

impl TemplateKey {
    fn new(rotation: &EulerRotation, voxel_size: f32) -> Self {
        Self {
            rotation: rotation.key(),
            voxel_size: voxel_size.to_bits(),
        }
    }
}

/// Least-recently-used cache of [`RotationTemplate`]s.
///
/// A capacity of zero disables caching; every lookup builds a fresh template.
#[derive(Debug)]
pub struct TemplateCache {
    capacity: usize,
    entries: FxHashMap<TemplateKey, RotationTemplate>,
    /// Keys from least to most recently used.
    order: VecDeque<TemplateKey>,
    hits: u64,
    misses: u64,
}

impl TemplateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: FxHashMap::default(),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the template for `rotation` and `voxel_size`, building and
    /// caching it on a miss.
    pub fn get_or_build(&mut self, rotation: &EulerRotation, voxel_size: f32) -> RotationTemplate {
        if self.capacity == 0 {
            self.misses += 1;
            return RotationTemplate::build(rotation, voxel_size);
        }

        let key = TemplateKey::new(rotation, voxel_size);
        if let Some(template) = self.entries.get(&key).copied() {
            self.hits += 1;
            self.touch(key);
            return template;
        }

        self.misses += 1;
        let template = RotationTemplate::build(rotation, voxel_size);
        if self.entries.len() >= self.capacity
            && let Some(evicted) = self.order.pop_front()
        {
            self.entries.remove(&evicted);
            trace!(?evicted, "evicted rotation template");
        }
        self.entries.insert(key, template);
        self.order.push_back(key);
        template
    }

    fn touch(&mut self, key: TemplateKey) {
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting the oldest entries if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > capacity {
            match self.order.pop_front() {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_CAPACITY)
    }
}

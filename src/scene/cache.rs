// src/scene/cache.rs
//
// Memoizes built scenes by (dataset id, scene index). Source data is
// read-only for the life of the process, so entries are never invalidated.
// Failed builds are not cached.

use crate::dataset::SceneDataset;
use crate::error::SceneResult;
use crate::scene::aggregator::{build_scene, Scene};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct SceneCache {
    scenes: HashMap<(String, usize), Arc<Scene>>,
    hits: u64,
    misses: u64,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build<D: SceneDataset + ?Sized>(
        &mut self,
        dataset: &D,
        scene_index: usize,
    ) -> SceneResult<Arc<Scene>> {
        let key = (dataset.dataset_id().to_string(), scene_index);
        if let Some(scene) = self.scenes.get(&key) {
            self.hits += 1;
            debug!("Scene cache hit: {} #{}", key.0, key.1);
            return Ok(Arc::clone(scene));
        }

        self.misses += 1;
        let scene = Arc::new(build_scene(dataset, scene_index)?);
        self.scenes.insert(key, Arc::clone(&scene));
        Ok(scene)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

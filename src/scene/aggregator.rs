// src/scene/aggregator.rs
//
// Scene-wide aggregate: the ego track plus one ego-relative track for every
// distinct instance annotated anywhere in the scene.
//
// Instances are kept in discovery order (the first sample they appear in,
// then annotation order inside that sample), so summaries and snapshots are
// stable across repeated builds of the same scene. A Scene is immutable
// after `build_scene`; every query below is a pure read.

use crate::dataset::SceneDataset;
use crate::error::{SceneError, SceneResult};
use crate::tracking::{build_ego_track, build_instance_track, EgoTrack, InstanceTrack};
use crate::types::{Direction, Point2};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    scene_index: usize,
    scene_name: String,
    ego_track: EgoTrack,
    instances: Vec<InstanceTrack>,
}

/// Plot-ready view of a scene: the ego at the origin plus the relative
/// trajectories of the most-observed instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub ego: Point2,
    pub objects: Vec<SnapshotObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotObject {
    pub instance_token: String,
    pub category_name: String,
    pub path: Vec<Point2>,
}

pub fn build_scene<D: SceneDataset + ?Sized>(dataset: &D, scene_index: usize) -> SceneResult<Scene> {
    let ego_track = build_ego_track(dataset, scene_index)?;
    let scene_name = dataset
        .scene(scene_index)
        .map(|s| s.name.clone())
        .unwrap_or_default();

    info!(
        "Building scene {} '{}' ({} samples)",
        scene_index,
        scene_name,
        ego_track.len()
    );

    let mut seen = HashSet::new();
    let mut instance_tokens = Vec::new();
    let mut total_annotations = 0usize;
    for pose in ego_track.poses() {
        let sample = dataset.sample(&pose.sample_token).ok_or_else(|| {
            SceneError::CorruptSceneData(format!("sample {} not found", pose.sample_token))
        })?;
        for ann_token in &sample.anns {
            let ann = dataset.annotation(ann_token).ok_or_else(|| {
                SceneError::CorruptSceneData(format!("annotation {} not found", ann_token))
            })?;
            total_annotations += 1;
            if seen.insert(ann.instance_token.as_str()) {
                instance_tokens.push(ann.instance_token.as_str());
            }
        }
    }

    let instances = instance_tokens
        .into_iter()
        .map(|token| build_instance_track(dataset, token, &ego_track))
        .collect::<SceneResult<Vec<_>>>()?;

    info!(
        "Scene {} ready: {} instances from {} annotations",
        scene_index,
        instances.len(),
        total_annotations
    );

    Ok(Scene {
        scene_index,
        scene_name,
        ego_track,
        instances,
    })
}

impl Scene {
    /// Assembles a scene from already-built tracks.
    pub(crate) fn from_tracks(
        scene_index: usize,
        ego_track: EgoTrack,
        instances: Vec<InstanceTrack>,
    ) -> Self {
        Self {
            scene_index,
            scene_name: String::new(),
            ego_track,
            instances,
        }
    }

    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn ego_track(&self) -> &EgoTrack {
        &self.ego_track
    }

    pub fn instances(&self) -> &[InstanceTrack] {
        &self.instances
    }

    fn matching<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a InstanceTrack> + 'a {
        self.instances
            .iter()
            .filter(move |inst| inst.category_name().contains(category))
    }

    /// Any instance whose category contains `category` lies in `direction`.
    pub fn query_exist(&self, category: &str, direction: Direction) -> bool {
        self.matching(category).any(|inst| inst.is_toward(direction))
    }

    pub fn query_count(&self, category: &str, direction: Option<Direction>) -> usize {
        self.matching(category)
            .filter(|inst| direction.map_or(true, |d| inst.is_toward(d)))
            .count()
    }

    /// Closest mean distance over instances matching `category`, or
    /// infinity when nothing matches.
    fn nearest_distance(&self, category: &str) -> f64 {
        self.matching(category)
            .map(InstanceTrack::mean_distance)
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns whichever of `a` and `b` has the closer matching instance.
    /// Ties, including neither side matching, go to `a`.
    pub fn query_nearest<'q>(&self, a: &'q str, b: &'q str) -> &'q str {
        let dist_a = self.nearest_distance(a);
        let dist_b = self.nearest_distance(b);
        debug!("Nearest: '{}' at {:.2} vs '{}' at {:.2}", a, dist_a, b, dist_b);
        if dist_b < dist_a {
            b
        } else {
            a
        }
    }

    pub fn list_categories(&self) -> BTreeSet<String> {
        self.instances
            .iter()
            .map(|inst| inst.category_name().to_string())
            .collect()
    }

    pub fn summarize(&self) -> String {
        self.instances
            .iter()
            .map(InstanceTrack::describe_movement)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The `max_objects` instances with the most locations, longest first.
    /// Equal lengths keep discovery order.
    pub fn snapshot(&self, max_objects: usize) -> SceneSnapshot {
        let mut ranked: Vec<&InstanceTrack> = self.instances.iter().collect();
        ranked.sort_by(|a, b| b.locations().len().cmp(&a.locations().len()));
        SceneSnapshot {
            ego: Point2::ORIGIN,
            objects: ranked
                .into_iter()
                .take(max_objects)
                .map(|inst| SnapshotObject {
                    instance_token: inst.instance_token().to_string(),
                    category_name: inst.category_name().to_string(),
                    path: inst.locations().to_vec(),
                })
                .collect(),
        }
    }
}

// src/tracking/ego_track.rs
//
// Ego trajectory for one scene: the global ego position and timestamp at
// every sample, collected by walking the scene's `next` sample chain.
//
// The chain must visit each sample exactly once in forward order. A cycle,
// a dangling link, a sample without ego pose, a non-increasing timestamp or
// a chain whose length disagrees with the scene's declared sample count is
// reported as `CorruptSceneData`.

use crate::dataset::SceneDataset;
use crate::error::{SceneError, SceneResult};
use crate::types::Point2;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct EgoPose {
    pub sample_token: String,
    pub timestamp: u64,
    /// Global position
    pub position: Point2,
}

/// Ordered, non-empty, strictly increasing in time.
#[derive(Debug, Clone, PartialEq)]
pub struct EgoTrack {
    scene_token: String,
    poses: Vec<EgoPose>,
}

impl EgoTrack {
    pub fn scene_token(&self) -> &str {
        &self.scene_token
    }

    pub fn poses(&self) -> &[EgoPose] {
        &self.poses
    }

    pub fn positions(&self) -> impl Iterator<Item = Point2> + '_ {
        self.poses.iter().map(|p| p.position)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Timestamp of the first sample
    pub fn start_time(&self) -> u64 {
        self.poses.first().map(|p| p.timestamp).unwrap_or(0)
    }

    /// Ego position at exactly `timestamp`, if a sample was recorded then
    pub fn position_at(&self, timestamp: u64) -> Option<Point2> {
        self.poses
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|i| self.poses[i].position)
    }
}

/// nuScenes marks the end of a chain with an empty token as well as null.
fn next_token(next: Option<&str>) -> Option<&str> {
    next.filter(|t| !t.is_empty())
}

pub fn build_ego_track<D: SceneDataset + ?Sized>(
    dataset: &D,
    scene_index: usize,
) -> SceneResult<EgoTrack> {
    let scene = dataset
        .scene(scene_index)
        .ok_or(SceneError::InvalidSceneIndex {
            index: scene_index,
            num_scenes: dataset.num_scenes(),
        })?;

    let mut poses: Vec<EgoPose> = Vec::with_capacity(scene.nbr_samples);
    let mut visited = HashSet::new();
    let mut cursor = next_token(Some(scene.first_sample_token.as_str()));

    while let Some(token) = cursor {
        if !visited.insert(token) {
            return Err(SceneError::CorruptSceneData(format!(
                "sample chain of scene {} cycles back to {}",
                scene.token, token
            )));
        }

        let sample = dataset.sample(token).ok_or_else(|| {
            SceneError::CorruptSceneData(format!("sample {} not found", token))
        })?;

        let translation = sample.ego_translation.as_ref().ok_or_else(|| {
            SceneError::CorruptSceneData(format!("sample {} has no ego pose", token))
        })?;

        if let Some(prev) = poses.last() {
            if sample.timestamp <= prev.timestamp {
                return Err(SceneError::CorruptSceneData(format!(
                    "sample {} at {} does not follow {} at {}",
                    token, sample.timestamp, prev.sample_token, prev.timestamp
                )));
            }
        }

        poses.push(EgoPose {
            sample_token: sample.token.clone(),
            timestamp: sample.timestamp,
            position: Point2::from_translation(translation),
        });
        cursor = next_token(sample.next.as_deref());
    }

    if poses.is_empty() || poses.len() != scene.nbr_samples {
        return Err(SceneError::CorruptSceneData(format!(
            "scene {} declares {} samples but its chain has {}",
            scene.token,
            scene.nbr_samples,
            poses.len()
        )));
    }

    debug!(
        "Ego track for scene {}: {} samples from t={}",
        scene.token,
        poses.len(),
        poses[0].timestamp
    );

    Ok(EgoTrack {
        scene_token: scene.token.clone(),
        poses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{MemoryDataset, SampleRecord, SceneRecord};
    use crate::fixtures::SceneFixture;
    use assert_matches::assert_matches;

    fn sample(token: &str, timestamp: u64, next: Option<&str>) -> SampleRecord {
        SampleRecord {
            token: token.to_string(),
            timestamp,
            ego_translation: Some([timestamp as f64, 0.0, 0.0]),
            anns: Vec::new(),
            next: next.map(str::to_string),
        }
    }

    fn scene(first: &str, nbr_samples: usize) -> SceneRecord {
        SceneRecord {
            token: "sc".to_string(),
            name: "scene".to_string(),
            description: String::new(),
            first_sample_token: first.to_string(),
            nbr_samples,
        }
    }

    #[test]
    fn test_follows_chain_in_order() {
        let ds = SceneFixture::new("drive")
            .sample(10, 0.0, 0.0)
            .sample(20, 0.0, 5.0)
            .sample(30, 1.0, 10.0)
            .into_dataset();

        let track = build_ego_track(&ds, 0).unwrap();
        assert_eq!(track.len(), 3);
        assert_eq!(track.start_time(), 10);
        assert_eq!(track.scene_token(), "drive-scene");
        let ts: Vec<u64> = track.poses().iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![10, 20, 30]);
        let positions: Vec<Point2> = track.positions().collect();
        assert_eq!(positions[2], Point2::new(1.0, 10.0));
        assert_eq!(track.position_at(20), Some(Point2::new(0.0, 5.0)));
        assert_eq!(track.position_at(25), None);
    }

    #[test]
    fn test_samples_stored_out_of_order_still_follow_links() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 3));
        ds.add_sample(sample("c", 3, None));
        ds.add_sample(sample("a", 1, Some("b")));
        ds.add_sample(sample("b", 2, Some("c")));

        let track = build_ego_track(&ds, 0).unwrap();
        let tokens: Vec<&str> = track.poses().iter().map(|p| p.sample_token.as_str()).collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_next_token_ends_chain() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 1));
        ds.add_sample(sample("a", 1, Some("")));
        assert_eq!(build_ego_track(&ds, 0).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_scene_index() {
        let ds = SceneFixture::stationary("one", &[1]).into_dataset();
        assert_matches!(
            build_ego_track(&ds, 1),
            Err(SceneError::InvalidSceneIndex { index: 1, num_scenes: 1 })
        );
    }

    #[test]
    fn test_cycle_is_corrupt() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 2));
        ds.add_sample(sample("a", 1, Some("b")));
        ds.add_sample(sample("b", 2, Some("a")));
        assert_matches!(build_ego_track(&ds, 0), Err(SceneError::CorruptSceneData(_)));
    }

    #[test]
    fn test_dangling_link_is_corrupt() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 2));
        ds.add_sample(sample("a", 1, Some("missing")));
        assert_matches!(build_ego_track(&ds, 0), Err(SceneError::CorruptSceneData(_)));
    }

    #[test]
    fn test_missing_ego_pose_is_corrupt() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 1));
        let mut s = sample("a", 1, None);
        s.ego_translation = None;
        ds.add_sample(s);
        assert_matches!(build_ego_track(&ds, 0), Err(SceneError::CorruptSceneData(_)));
    }

    #[test]
    fn test_non_increasing_timestamp_is_corrupt() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 2));
        ds.add_sample(sample("a", 5, Some("b")));
        ds.add_sample(sample("b", 5, None));
        assert_matches!(build_ego_track(&ds, 0), Err(SceneError::CorruptSceneData(_)));
    }

    #[test]
    fn test_sample_count_mismatch_is_corrupt() {
        let mut ds = MemoryDataset::new("t");
        ds.add_scene(scene("a", 3));
        ds.add_sample(sample("a", 1, Some("b")));
        ds.add_sample(sample("b", 2, None));
        assert_matches!(build_ego_track(&ds, 0), Err(SceneError::CorruptSceneData(_)));
    }
}

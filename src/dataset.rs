// src/dataset.rs
//
// Read-only view of a recorded driving dataset.
//
// The engine only needs three lookups:
//   scene by index       → first sample token, declared sample count
//   sample by token      → timestamp, ego pose, annotation tokens, next link
//   annotation by token  → instance token, category, global translation
//
// `MemoryDataset` is the in-memory implementation used by the CLI and the
// tests. It deserializes a single JSON document holding the three tables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRecord {
    pub token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub first_sample_token: String,
    pub nbr_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub token: String,
    /// Microseconds since epoch
    pub timestamp: u64,
    /// Global ego translation at this sample; absent means corrupt data
    pub ego_translation: Option<[f64; 3]>,
    #[serde(default)]
    pub anns: Vec<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub token: String,
    pub sample_token: String,
    pub instance_token: String,
    pub category_name: String,
    /// Global translation of the box centre
    pub translation: [f64; 3],
}

// ============================================================================
// DATASET TRAIT
// ============================================================================

pub trait SceneDataset {
    /// Identity used as part of the scene cache key. Two datasets that can
    /// hold different records must never share one.
    fn dataset_id(&self) -> &str;
    fn num_scenes(&self) -> usize;
    fn scene(&self, index: usize) -> Option<&SceneRecord>;
    fn sample(&self, token: &str) -> Option<&SampleRecord>;
    fn annotation(&self, token: &str) -> Option<&AnnotationRecord>;
}

// ============================================================================
// IN-MEMORY DATASET
// ============================================================================

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    name: String,
    #[serde(default)]
    scenes: Vec<SceneRecord>,
    #[serde(default)]
    samples: Vec<SampleRecord>,
    #[serde(default)]
    annotations: Vec<AnnotationRecord>,
}

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    name: String,
    /// `<name>#<n>`, unique per constructed dataset
    id: String,
    scenes: Vec<SceneRecord>,
    samples: HashMap<String, SampleRecord>,
    annotations: HashMap<String, AnnotationRecord>,
}

impl MemoryDataset {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: format!("{}#{}", name, NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed)),
            ..Default::default()
        }
    }

    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read dataset {}", path))?;
        let dataset = Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse dataset {}", path))?;
        info!(
            "Loaded dataset '{}': {} scenes, {} samples, {} annotations",
            dataset.name,
            dataset.scenes.len(),
            dataset.samples.len(),
            dataset.annotations.len()
        );
        Ok(dataset)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let doc: DatasetDocument = serde_json::from_str(contents)?;
        let mut dataset = Self::new(&doc.name);
        for scene in doc.scenes {
            dataset.add_scene(scene);
        }
        for sample in doc.samples {
            dataset.add_sample(sample);
        }
        for ann in doc.annotations {
            dataset.add_annotation(ann);
        }
        Ok(dataset)
    }

    pub fn add_scene(&mut self, scene: SceneRecord) {
        self.scenes.push(scene);
    }

    pub fn add_sample(&mut self, sample: SampleRecord) {
        self.samples.insert(sample.token.clone(), sample);
    }

    pub fn add_annotation(&mut self, ann: AnnotationRecord) {
        self.annotations.insert(ann.token.clone(), ann);
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SceneDataset for MemoryDataset {
    fn dataset_id(&self) -> &str {
        &self.id
    }

    fn num_scenes(&self) -> usize {
        self.scenes.len()
    }

    fn scene(&self, index: usize) -> Option<&SceneRecord> {
        self.scenes.get(index)
    }

    fn sample(&self, token: &str) -> Option<&SampleRecord> {
        self.samples.get(token)
    }

    fn annotation(&self, token: &str) -> Option<&AnnotationRecord> {
        self.annotations.get(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "name": "mini",
        "scenes": [
            { "token": "sc0", "name": "scene-0061", "first_sample_token": "s0", "nbr_samples": 2 }
        ],
        "samples": [
            { "token": "s0", "timestamp": 100, "ego_translation": [1.0, 2.0, 0.0], "anns": ["a0"], "next": "s1" },
            { "token": "s1", "timestamp": 200, "ego_translation": [1.0, 3.0, 0.0], "next": null }
        ],
        "annotations": [
            { "token": "a0", "sample_token": "s0", "instance_token": "i0",
              "category_name": "vehicle.bus.rigid", "translation": [4.0, 9.0, 1.5] }
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let ds = MemoryDataset::from_json_str(DOC).unwrap();
        assert_eq!(ds.name(), "mini");
        assert!(ds.dataset_id().starts_with("mini#"));
        assert_eq!(ds.num_scenes(), 1);
        assert_eq!(ds.scene(0).unwrap().first_sample_token, "s0");
        assert!(ds.scene(1).is_none());

        let s1 = ds.sample("s1").unwrap();
        assert!(s1.anns.is_empty());
        assert!(s1.next.is_none());
        assert_eq!(ds.sample("s0").unwrap().next.as_deref(), Some("s1"));

        let ann = ds.annotation("a0").unwrap();
        assert_eq!(ann.instance_token, "i0");
        assert_eq!(ann.category_name, "vehicle.bus.rigid");
    }

    #[test]
    fn test_missing_ego_pose_parses_as_none() {
        let doc = r#"{ "name": "x", "samples": [
            { "token": "s0", "timestamp": 1, "next": null }
        ] }"#;
        let ds = MemoryDataset::from_json_str(doc).unwrap();
        assert!(ds.sample("s0").unwrap().ego_translation.is_none());
    }

    #[test]
    fn test_demo_dataset_answers() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/v1.0-mini.json");
        let ds = MemoryDataset::load(path).unwrap();
        let scene = crate::scene::build_scene(&ds, 0).unwrap();
        assert_eq!(scene.scene_name(), "scene-0061");
        assert_eq!(scene.instances().len(), 3);
        assert_eq!(crate::vqa::answer(&scene, "Is there a bus ahead?").to_string(), "Yes");
        assert_eq!(
            crate::vqa::answer(&scene, "How many pedestrian are to my left?").to_string(),
            "1"
        );
        assert_eq!(
            crate::vqa::answer(&scene, "Which is closer, bus or truck").to_string(),
            "truck"
        );
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(MemoryDataset::from_json_str(r#"{ "scenes": [] }"#).is_err());
    }
}

// src/lib.rs
//
// Spatial question answering over recorded driving scenes.
//
// Signal flow:
//   SceneDataset → tracking::ego_track      → EgoTrack
//                → tracking::instance_track → InstanceTrack (ego-relative)
//                → scene::aggregator        → Scene (queries)
//                → vqa::router              → AnswerValue
//   Scene::summarize → summary_client       → display summary

pub mod config;
pub mod dataset;
pub mod error;
pub mod scene;
pub mod summary_client;
pub mod tracking;
pub mod types;
pub mod vqa;

#[cfg(test)]
pub(crate) mod fixtures;

pub use dataset::{MemoryDataset, SceneDataset};
pub use error::{SceneError, SceneResult};
pub use scene::{build_scene, Scene, SceneCache};
pub use summary_client::{quick_summary, LlmSummarizer, Summarizer};
pub use types::{Config, Direction, Point2};
pub use vqa::{answer, AnswerValue};

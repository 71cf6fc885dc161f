// src/scene/mod.rs

pub mod aggregator;
pub mod cache;

pub use aggregator::{build_scene, Scene, SceneSnapshot, SnapshotObject};
pub use cache::SceneCache;

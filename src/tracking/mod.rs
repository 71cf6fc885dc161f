// src/tracking/mod.rs
//
// Track builders.
//
// Signal flow:
//   scene index → ego_track      → EgoTrack (global ego positions per sample)
//   instance    → instance_track → InstanceTrack (ego-relative positions)
//
// Both builders only read from a `SceneDataset`.

pub mod ego_track;
pub mod instance_track;

pub use ego_track::{build_ego_track, EgoPose, EgoTrack};
pub use instance_track::{build_instance_track, InstanceTrack};

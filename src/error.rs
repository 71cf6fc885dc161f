// src/error.rs
//
// Failure kinds of the scene engine. Question answering itself never
// fails; these only surface from building ego, instance and scene tracks.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("Scene index {index} out of range (dataset has {num_scenes} scenes)")]
    InvalidSceneIndex { index: usize, num_scenes: usize },

    #[error("Corrupt scene data: {0}")]
    CorruptSceneData(String),

    #[error("Instance {0} has no annotations in this scene")]
    UnknownInstance(String),

    #[error("No ego pose at timestamp {timestamp} for instance {instance}")]
    EgoTimeMismatch { instance: String, timestamp: u64 },

    #[error("Instance {instance} annotated as both {first} and {other}")]
    InconsistentCategory {
        instance: String,
        first: String,
        other: String,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;

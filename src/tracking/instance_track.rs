// src/tracking/instance_track.rs
//
// Per-object trajectory expressed relative to the ego vehicle.
//
// For every sample of the scene (in ego-track order) at which the instance
// is annotated, the ego position at the same timestamp is subtracted from
// the annotation's global position. Direction is judged from the sign of
// the mean offset on each axis:
//   mean y >  0 → ahead,  otherwise behind
//   mean x <  0 → left,   otherwise right
// so an object sitting exactly on an axis falls in the behind/right bucket.

use crate::dataset::SceneDataset;
use crate::error::{SceneError, SceneResult};
use crate::tracking::ego_track::EgoTrack;
use crate::types::{Direction, Point2};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceTrack {
    instance_token: String,
    category_name: String,
    /// Ego-relative positions, one per annotated sample
    locations: Vec<Point2>,
    /// Sample timestamp of each location
    timestamps: Vec<u64>,
}

// ============================================================================
// DIRECTION PREDICATES
// ============================================================================

type DirectionPredicate = fn(&InstanceTrack) -> bool;

fn is_ahead(track: &InstanceTrack) -> bool {
    track.mean_longitudinal() > 0.0
}

fn is_behind(track: &InstanceTrack) -> bool {
    track.mean_longitudinal() < 0.0
}

fn is_left(track: &InstanceTrack) -> bool {
    track.mean_lateral() < 0.0
}

fn is_right(track: &InstanceTrack) -> bool {
    track.mean_lateral() > 0.0
}

const DIRECTION_PREDICATES: [(Direction, DirectionPredicate); 4] = [
    (Direction::Ahead, is_ahead),
    (Direction::Behind, is_behind),
    (Direction::Left, is_left),
    (Direction::Right, is_right),
];

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

impl InstanceTrack {
    /// Builds a track directly from ego-relative data. `locations` and
    /// `timestamps` must be non-empty, equally long and time-ordered.
    pub(crate) fn from_parts(
        instance_token: &str,
        category_name: &str,
        locations: Vec<Point2>,
        timestamps: Vec<u64>,
    ) -> Self {
        debug_assert!(!locations.is_empty());
        debug_assert_eq!(locations.len(), timestamps.len());
        Self {
            instance_token: instance_token.to_string(),
            category_name: category_name.to_string(),
            locations,
            timestamps,
        }
    }

    pub fn instance_token(&self) -> &str {
        &self.instance_token
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn locations(&self) -> &[Point2] {
        &self.locations
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn mean_lateral(&self) -> f64 {
        mean(self.locations.iter().map(|p| p.x))
    }

    pub fn mean_longitudinal(&self) -> f64 {
        mean(self.locations.iter().map(|p| p.y))
    }

    /// Mean Euclidean distance from the ego vehicle over all locations
    pub fn mean_distance(&self) -> f64 {
        mean(self.locations.iter().map(Point2::norm))
    }

    pub fn is_toward(&self, direction: Direction) -> bool {
        DIRECTION_PREDICATES
            .iter()
            .find(|(d, _)| *d == direction)
            .map_or(false, |(_, predicate)| predicate(self))
    }

    pub fn describe_movement(&self) -> String {
        let longitudinal = if self.is_toward(Direction::Ahead) {
            Direction::Ahead
        } else {
            Direction::Behind
        };
        let lateral = if self.is_toward(Direction::Left) {
            Direction::Left
        } else {
            Direction::Right
        };
        format!(
            "{} is {} and to the {}.",
            self.category_name, longitudinal, lateral
        )
    }
}

pub fn build_instance_track<D: SceneDataset + ?Sized>(
    dataset: &D,
    instance_token: &str,
    ego_track: &EgoTrack,
) -> SceneResult<InstanceTrack> {
    let mut category: Option<&str> = None;
    let mut locations = Vec::new();
    let mut timestamps = Vec::new();

    for pose in ego_track.poses() {
        let sample = dataset.sample(&pose.sample_token).ok_or_else(|| {
            SceneError::CorruptSceneData(format!("sample {} not found", pose.sample_token))
        })?;

        for ann_token in &sample.anns {
            let ann = dataset.annotation(ann_token).ok_or_else(|| {
                SceneError::CorruptSceneData(format!(
                    "annotation {} of sample {} not found",
                    ann_token, sample.token
                ))
            })?;
            if ann.instance_token != instance_token {
                continue;
            }

            match category {
                None => category = Some(ann.category_name.as_str()),
                Some(first) if first != ann.category_name => {
                    return Err(SceneError::InconsistentCategory {
                        instance: instance_token.to_string(),
                        first: first.to_string(),
                        other: ann.category_name.clone(),
                    });
                }
                Some(_) => {}
            }

            let ego = ego_track.position_at(sample.timestamp).ok_or_else(|| {
                SceneError::EgoTimeMismatch {
                    instance: instance_token.to_string(),
                    timestamp: sample.timestamp,
                }
            })?;

            locations.push(Point2::from_translation(&ann.translation) - ego);
            timestamps.push(sample.timestamp);
            // One box per instance per sample
            break;
        }
    }

    let category = category.ok_or_else(|| SceneError::UnknownInstance(instance_token.to_string()))?;
    Ok(InstanceTrack::from_parts(
        instance_token,
        category,
        locations,
        timestamps,
    ))
}

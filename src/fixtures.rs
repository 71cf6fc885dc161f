// src/fixtures.rs
//
// Hand-assembled datasets for unit tests. Samples are linked in the order
// they are added; instances are placed in GLOBAL coordinates.

use crate::dataset::{AnnotationRecord, MemoryDataset, SampleRecord, SceneRecord};

pub struct SceneFixture {
    name: String,
    /// (timestamp, ego x, ego y)
    samples: Vec<(u64, f64, f64)>,
    /// (instance token, category, sample index, global x, global y)
    annotations: Vec<(String, String, usize, f64, f64)>,
}

impl SceneFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            samples: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// One sample per timestamp with the ego at the origin
    pub fn stationary(name: &str, timestamps: &[u64]) -> Self {
        let mut fixture = Self::new(name);
        for &ts in timestamps {
            fixture = fixture.sample(ts, 0.0, 0.0);
        }
        fixture
    }

    pub fn sample(mut self, timestamp: u64, ego_x: f64, ego_y: f64) -> Self {
        self.samples.push((timestamp, ego_x, ego_y));
        self
    }

    /// Annotates `instance` at each `(sample index, x, y)` global position
    pub fn instance(mut self, instance: &str, category: &str, positions: &[(usize, f64, f64)]) -> Self {
        for &(idx, x, y) in positions {
            self.annotations
                .push((instance.to_string(), category.to_string(), idx, x, y));
        }
        self
    }

    pub fn sample_token(&self, idx: usize) -> String {
        format!("{}-s{}", self.name, idx)
    }

    pub fn add_to(&self, dataset: &mut MemoryDataset) {
        let n = self.samples.len();
        dataset.add_scene(SceneRecord {
            token: format!("{}-scene", self.name),
            name: self.name.clone(),
            description: String::new(),
            first_sample_token: self.sample_token(0),
            nbr_samples: n,
        });

        for (idx, &(timestamp, x, y)) in self.samples.iter().enumerate() {
            let anns = self
                .annotations
                .iter()
                .enumerate()
                .filter(|(_, a)| a.2 == idx)
                .map(|(i, _)| format!("{}-a{}", self.name, i))
                .collect();
            dataset.add_sample(SampleRecord {
                token: self.sample_token(idx),
                timestamp,
                ego_translation: Some([x, y, 0.0]),
                anns,
                next: (idx + 1 < n).then(|| self.sample_token(idx + 1)),
            });
        }

        for (i, (instance, category, idx, x, y)) in self.annotations.iter().enumerate() {
            dataset.add_annotation(AnnotationRecord {
                token: format!("{}-a{}", self.name, i),
                sample_token: self.sample_token(*idx),
                instance_token: instance.clone(),
                category_name: category.clone(),
                translation: [*x, *y, 1.0],
            });
        }
    }

    pub fn into_dataset(self) -> MemoryDataset {
        let mut dataset = MemoryDataset::new("fixture");
        self.add_to(&mut dataset);
        dataset
    }
}

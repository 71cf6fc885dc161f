use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents).context("Invalid config YAML")?;
        Ok(config)
    }

    /// `scene_vqa=<level>` filter for the tracing subscriber
    pub fn log_filter(&self) -> String {
        format!("scene_vqa={}", self.logging.level)
    }
}

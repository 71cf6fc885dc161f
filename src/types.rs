use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub scene: SceneConfig,
    pub summary: SummaryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// JSON document with `scenes`, `samples` and `annotations` tables
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub index: usize,
    /// Number of most-observed instances included in the snapshot
    pub snapshot_objects: usize,
    /// Prebuilt questions answered when no question is given on the command line
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub enabled: bool,
    pub server_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Raw summaries longer than this are truncated for display
    pub max_display_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "data/v1.0-mini.json".to_string(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            index: 0,
            snapshot_objects: 5,
            questions: vec![
                "Is there a bus ahead?".to_string(),
                "How many pedestrians are to my left?".to_string(),
                "What objects are ahead?".to_string(),
                "Which is closer, bus or truck?".to_string(),
                "Describe the scene".to_string(),
            ],
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            max_display_chars: 200,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 2D position in metres. In the ego-relative frame x is lateral
/// (positive = right) and y is longitudinal (positive = ahead).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Drops the z component of a dataset translation
    pub fn from_translation(t: &[f64; 3]) -> Self {
        Self { x: t[0], y: t[1] }
    }

    /// Euclidean distance from the origin
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Relative position of an instance with respect to the ego vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ahead,
    Behind,
    Left,
    Right,
}

impl Direction {
    /// Keyword scan order used by the question router
    pub const ALL: [Direction; 4] = [
        Direction::Ahead,
        Direction::Behind,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ahead => "ahead",
            Direction::Behind => "behind",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

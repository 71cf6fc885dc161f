use serde::Serialize;
use std::fmt;

/// Result of answering one question. Rendered for display with `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Rendered as "Yes" / "No"
    Flag(bool),
    Count(usize),
    Text(String),
    /// Rendered comma-joined
    List(Vec<String>),
}

impl AnswerValue {
    pub fn text(s: impl Into<String>) -> Self {
        AnswerValue::Text(s.into())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Flag(true) => f.write_str("Yes"),
            AnswerValue::Flag(false) => f.write_str("No"),
            AnswerValue::Count(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

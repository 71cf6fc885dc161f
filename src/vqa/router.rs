// src/vqa/router.rs
//
// Keyword router for the fixed question grammar.
//
// Rules are tried in order on the lowercased question and the first match
// wins. The order matters: "how many passengers ..." must hit the passenger
// rule, and "is there ... how many" the existence rule.
//
//   1. "passenger"                     → fixed unavailable-data text
//   2. "is there"                      → query_exist (direction defaults to ahead)
//   3. "how many"                      → query_count (direction optional)
//   4. "what objects" / "what is"      → list_categories
//   5. "which is closer"               → query_nearest
//   6. "describe the scene"            → summarize
//   otherwise                          → NOT_SUPPORTED
//
// Object words are taken naively: the first whitespace-separated word after
// the phrase, punctuation and plurals included.

use crate::scene::Scene;
use crate::types::Direction;
use crate::vqa::answer::AnswerValue;
use tracing::debug;

pub const PASSENGER_UNAVAILABLE: &str = "Passenger information is not available in nuScenes dataset.";
pub const NOT_SUPPORTED: &str = "Question type not supported.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Passenger,
    Existence,
    Count,
    Categories,
    Nearest,
    Describe,
}

struct Rule {
    kind: QuestionKind,
    matches: fn(&str) -> bool,
    /// `None` when the question matched but its operands could not be read
    handle: fn(&Scene, &str) -> Option<AnswerValue>,
}

const RULES: [Rule; 6] = [
    Rule {
        kind: QuestionKind::Passenger,
        matches: |q| q.contains("passenger"),
        handle: |_, _| Some(AnswerValue::text(PASSENGER_UNAVAILABLE)),
    },
    Rule {
        kind: QuestionKind::Existence,
        matches: |q| q.contains("is there"),
        handle: answer_existence,
    },
    Rule {
        kind: QuestionKind::Count,
        matches: |q| q.contains("how many"),
        handle: answer_count,
    },
    Rule {
        kind: QuestionKind::Categories,
        matches: |q| q.contains("what objects") || q.contains("what is"),
        handle: |scene, _| {
            Some(AnswerValue::List(
                scene.list_categories().into_iter().collect(),
            ))
        },
    },
    Rule {
        kind: QuestionKind::Nearest,
        matches: |q| q.contains("which is closer"),
        handle: answer_nearest,
    },
    Rule {
        kind: QuestionKind::Describe,
        matches: |q| q.contains("describe the scene"),
        handle: |scene, _| Some(AnswerValue::Text(scene.summarize())),
    },
];

/// First word after the last occurrence of `phrase`. Without an
/// occurrence the whole question is scanned.
fn word_after<'q>(q: &'q str, phrase: &str) -> Option<&'q str> {
    q.rsplit(phrase).next()?.split_whitespace().next()
}

/// First direction keyword found anywhere in the question
fn find_direction(q: &str) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| q.contains(d.as_str()))
}

fn answer_existence(scene: &Scene, q: &str) -> Option<AnswerValue> {
    let object = word_after(q, "is there a ")?;
    let direction = find_direction(q).unwrap_or(Direction::Ahead);
    Some(AnswerValue::Flag(scene.query_exist(object, direction)))
}

fn answer_count(scene: &Scene, q: &str) -> Option<AnswerValue> {
    let object = word_after(q, "how many ")?;
    Some(AnswerValue::Count(scene.query_count(object, find_direction(q))))
}

fn answer_nearest(scene: &Scene, q: &str) -> Option<AnswerValue> {
    let stripped = q.replace("which is closer, ", "");
    let mut terms = stripped.split(" or ");
    let a = terms.next()?;
    let b = terms.next()?;
    Some(AnswerValue::text(scene.query_nearest(a, b)))
}

/// Which rule a question falls under, if any.
pub fn classify(question: &str) -> Option<QuestionKind> {
    let q = question.to_lowercase();
    RULES.iter().find(|r| (r.matches)(&q)).map(|r| r.kind)
}

/// Never fails: unmatched or unreadable questions get `NOT_SUPPORTED`.
pub fn answer(scene: &Scene, question: &str) -> AnswerValue {
    let q = question.to_lowercase();
    match RULES.iter().find(|r| (r.matches)(&q)) {
        Some(rule) => {
            debug!("Question {:?} routed to {:?}", question, rule.kind);
            (rule.handle)(scene, &q).unwrap_or_else(|| AnswerValue::text(NOT_SUPPORTED))
        }
        None => {
            debug!("Question {:?} matched no rule", question);
            AnswerValue::text(NOT_SUPPORTED)
        }
    }
}

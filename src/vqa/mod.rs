// src/vqa/mod.rs
//
// Question answering over a built Scene.
//
//   question text → router (ordered keyword rules) → Scene query → AnswerValue

pub mod answer;
pub mod router;

pub use answer::AnswerValue;
pub use router::{answer, QuestionKind, NOT_SUPPORTED, PASSENGER_UNAVAILABLE};

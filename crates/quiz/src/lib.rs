//! Quiz
//!
//! Quiz documents as produced by the external generator, grading of a set
//! of answers, and the quiz-based adjustment of a focus score.

pub mod adjust;
pub mod grade;
pub mod model;

pub use adjust::{adjust_for_quiz, after_quiz_average, QUIZ_STEP};
pub use grade::{grade, QuestionResult, QuizGrade, Verdict};
pub use model::{parse_answers, Question, Quiz};

use thiserror::Error;

/// Quiz error types
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Invalid quiz format: {0}")]
    InvalidFormat(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

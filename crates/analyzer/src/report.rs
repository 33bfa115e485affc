//! Session report

use chrono::{DateTime, Utc};
use quiz::{adjust_for_quiz, after_quiz_average, grade, Quiz, QuizGrade};
use serde::Serialize;
use session_stats::SessionSummary;
use tracing::info;
use uuid::Uuid;

/// Headline numbers of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCards {
    /// After-quiz average when a quiz was taken, otherwise the mean score
    pub final_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_quiz: Option<f64>,
}

/// Quiz outcome and its effect on the score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSection {
    pub grade: QuizGrade,
    /// Signed sum of the per-question steps
    pub adjustment: f64,
    /// Running score at the end of the session after the quiz walk
    pub adjusted_score: f64,
    pub average_before_quiz: f64,
    pub average_after_quiz: f64,
}

impl QuizSection {
    pub fn new(quiz: &Quiz, answers: &[String], running_score: f64, average_before: f64) -> Self {
        let grade = grade(quiz, answers);
        let (adjusted_score, adjustment) = adjust_for_quiz(running_score, &quiz.pair(answers));
        Self {
            grade,
            adjustment,
            adjusted_score,
            average_before_quiz: average_before,
            average_after_quiz: after_quiz_average(average_before, adjustment),
        }
    }
}

/// Everything produced for one analyzed input
#[derive(Debug, Clone, Serialize)]
pub struct FocusReport {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub score_cards: ScoreCards,
    pub summary: SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizSection>,
}

impl FocusReport {
    pub fn new(session_id: Uuid, summary: SessionSummary, quiz: Option<QuizSection>) -> Self {
        let after_quiz = quiz.as_ref().map(|q| q.average_after_quiz);
        let score_cards = ScoreCards {
            final_score: after_quiz.unwrap_or(summary.mean_score),
            max_score: summary.max_score,
            min_score: summary.min_score,
            after_quiz,
        };
        info!(
            "Report for session {}: final {:.2} over {} frames",
            session_id, score_cards.final_score, summary.frames
        );

        Self {
            session_id,
            generated_at: Utc::now(),
            score_cards,
            summary,
            quiz,
        }
    }
}

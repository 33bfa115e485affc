//! Quiz document model

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::QuizError;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Quiz document: `{"questions": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Parse a quiz document; a quiz without questions is rejected
    pub fn from_json(text: &str) -> Result<Self, QuizError> {
        let quiz: Quiz = serde_json::from_str(text)?;
        if quiz.questions.is_empty() {
            return Err(QuizError::InvalidFormat(
                "expected a non-empty \"questions\" list".into(),
            ));
        }
        debug!("Parsed quiz with {} questions", quiz.questions.len());
        Ok(quiz)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Pair answers with questions positionally as (user, correct);
    /// unmatched entries on either side are dropped
    pub fn pair<'a>(&'a self, answers: &'a [String]) -> Vec<(&'a str, &'a str)> {
        answers
            .iter()
            .zip(&self.questions)
            .map(|(answer, q)| (answer.as_str(), q.correct_answer.as_str()))
            .collect()
    }
}

/// Parse a user-answers document: a JSON array of strings
pub fn parse_answers(text: &str) -> Result<Vec<String>, QuizError> {
    Ok(serde_json::from_str(text)?)
}

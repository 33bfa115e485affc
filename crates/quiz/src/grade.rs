//! Quiz grading

use serde::Serialize;

use crate::model::Quiz;

/// Outcome of one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// Graded question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub verdict: Verdict,
    /// 100 when correct, 0 otherwise
    pub score_percent: f64,
}

/// Graded quiz
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizGrade {
    pub results: Vec<QuestionResult>,
    pub correct: usize,
    /// Correct answers scaled to 0..10 over every question in the quiz
    pub score_out_of_ten: f64,
}

/// Grade `answers` against `quiz`, pairing positionally
pub fn grade(quiz: &Quiz, answers: &[String]) -> QuizGrade {
    let results: Vec<QuestionResult> = answers
        .iter()
        .zip(&quiz.questions)
        .map(|(answer, q)| {
            let verdict = if *answer == q.correct_answer {
                Verdict::Correct
            } else {
                Verdict::Wrong
            };
            QuestionResult {
                question: q.question.clone(),
                user_answer: answer.clone(),
                correct_answer: q.correct_answer.clone(),
                verdict,
                score_percent: if verdict == Verdict::Correct { 100.0 } else { 0.0 },
            }
        })
        .collect();

    let correct = results
        .iter()
        .filter(|r| r.verdict == Verdict::Correct)
        .count();
    let score_out_of_ten = if quiz.is_empty() {
        0.0
    } else {
        correct as f64 / quiz.len() as f64 * 10.0
    };

    QuizGrade {
        results,
        correct,
        score_out_of_ten,
    }
}

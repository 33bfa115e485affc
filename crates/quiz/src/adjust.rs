//! Quiz-based focus adjustment

use tracing::debug;

/// Score points per question, added when right and removed when wrong
pub const QUIZ_STEP: f64 = 5.0;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Walk the (user answer, correct answer) pairs from `score`.
///
/// A correct answer caps the score at 100 and a wrong one floors it at 0;
/// the incoming score is not clamped beforehand. Returns the final score
/// and the signed sum of the nominal per-question steps.
pub fn adjust_for_quiz<A, C>(mut score: f64, pairs: &[(A, C)]) -> (f64, f64)
where
    A: AsRef<str>,
    C: AsRef<str>,
{
    let mut adjustment = 0.0;

    for (user, correct) in pairs {
        if user.as_ref() == correct.as_ref() {
            score = (score + QUIZ_STEP).min(MAX_SCORE);
            adjustment += QUIZ_STEP;
        } else {
            score = (score - QUIZ_STEP).max(MIN_SCORE);
            adjustment -= QUIZ_STEP;
        }
    }

    debug!(
        "Quiz adjustment over {} answers: {:+} -> {:.2}",
        pairs.len(),
        adjustment,
        score
    );
    (score, adjustment)
}

/// Session average with the quiz adjustment layered on, clamped to [0, 100]
pub fn after_quiz_average(before: f64, adjustment: f64) -> f64 {
    (before + adjustment).clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_right_then_wrong_cancels() {
        let (score, adjustment) = adjust_for_quiz(50.0, &[("A", "A"), ("B", "C")]);
        assert_eq!(score, 50.0);
        assert_eq!(adjustment, 0.0);
    }

    #[test]
    fn test_clamped_per_step() {
        // 98 -> 100 -> 95: clamping happens before the wrong answer
        let (score, adjustment) = adjust_for_quiz(98.0, &[("A", "A"), ("A", "B")]);
        assert_eq!(score, 95.0);
        assert_eq!(adjustment, 0.0);

        let (score, adjustment) = adjust_for_quiz(3.0, &[("x", "y"), ("x", "y")]);
        assert_eq!(score, 0.0);
        assert_eq!(adjustment, -10.0);
    }

    #[test]
    fn test_out_of_range_start_not_clamped() {
        let (score, adjustment) = adjust_for_quiz(120.0, &[("A", "B")]);
        assert_eq!(score, 115.0);
        assert_eq!(adjustment, -5.0);

        let (score, adjustment) = adjust_for_quiz(120.0, &[("A", "A")]);
        assert_eq!(score, 100.0);
        assert_eq!(adjustment, 5.0);

        let (score, _) = adjust_for_quiz(-4.0, &[("A", "A")]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_no_answers() {
        let pairs: [(&str, &str); 0] = [];
        assert_eq!(adjust_for_quiz(42.0, &pairs), (42.0, 0.0));
    }

    #[test]
    fn test_after_quiz_average() {
        assert_eq!(after_quiz_average(60.0, 10.0), 70.0);
        assert_eq!(after_quiz_average(97.0, 10.0), 100.0);
        assert_eq!(after_quiz_average(3.0, -10.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_pure_and_bounded(
            score in 0.0f64..=100.0,
            answers in prop::collection::vec((0u8..3, 0u8..3), 0..20),
        ) {
            let pairs: Vec<(String, String)> = answers
                .iter()
                .map(|(u, c)| (u.to_string(), c.to_string()))
                .collect();

            let first = adjust_for_quiz(score, &pairs);
            let second = adjust_for_quiz(score, &pairs);
            prop_assert_eq!(first, second);
            prop_assert!((0.0..=100.0).contains(&first.0));

            let right = answers.iter().filter(|(u, c)| u == c).count() as f64;
            let wrong = answers.len() as f64 - right;
            prop_assert_eq!(first.1, QUIZ_STEP * (right - wrong));
        }
    }
}

//! Focus Analyzer
//!
//! Replays a landmark recording through the focus scorer, summarizes the
//! session, optionally grades a quiz and writes a JSON report.

pub mod pipeline;
pub mod report;
pub mod settings;

pub use pipeline::FocusPipeline;
pub use report::{FocusReport, QuizSection, ScoreCards};
pub use settings::{LogFormat, Settings};

use face_mesh::{MeshError, RecordedMesh};
use focus::FocusError;
use quiz::{parse_answers, Quiz, QuizError};
use session_stats::{summarize, StatsError};
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Analyzer error types
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("No input recording configured (set `input` or FOCUS_INPUT)")]
    MissingInput,

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Focus(#[from] FocusError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Install the global tracing subscriber
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), AnalyzerError> {
    let level: Level = level
        .parse()
        .map_err(|e| AnalyzerError::Logging(format!("log level {:?}: {}", level, e)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    result.map_err(|e| AnalyzerError::Logging(e.to_string()))
}

/// Analyze the configured input and build the report
pub async fn analyze(settings: &Settings) -> Result<FocusReport, AnalyzerError> {
    let input = settings.input.as_ref().ok_or(AnalyzerError::MissingInput)?;
    info!("Analyzing {}", input.display());

    let recording = tokio::fs::read(input).await?;
    let mut pipeline = FocusPipeline::new(settings.scoring.clone())?;
    pipeline.process(&mut RecordedMesh::new(recording.as_slice()))?;

    let log = pipeline.finish();
    let summary = summarize(log.records());

    let quiz = match (&settings.quiz, &settings.answers) {
        (Some(quiz_path), Some(answers_path)) => {
            let quiz = Quiz::from_json(&tokio::fs::read_to_string(quiz_path).await?)?;
            let answers = parse_answers(&tokio::fs::read_to_string(answers_path).await?)?;
            if answers.len() != quiz.len() {
                warn!(
                    "{} answers for {} questions; pairing positionally",
                    answers.len(),
                    quiz.len()
                );
            }
            Some(QuizSection::new(
                &quiz,
                &answers,
                pipeline.score(),
                summary.mean_score,
            ))
        }
        (None, None) => None,
        _ => {
            warn!("Quiz grading needs both `quiz` and `answers`; skipping");
            None
        }
    };

    Ok(FocusReport::new(pipeline.session_id(), summary, quiz))
}

/// Write the report as pretty JSON to the configured output or stdout
pub async fn write_report(report: &FocusReport, settings: &Settings) -> Result<(), AnalyzerError> {
    let json = serde_json::to_string_pretty(report)?;
    match &settings.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("focus-{}-{}", uuid::Uuid::new_v4(), name))
    }

    fn recording(frames: usize) -> String {
        (0..frames)
            .map(|i| {
                format!(
                    "{{\"timestamp_s\": {}, \"width\": 640, \"height\": 480}}\n",
                    i as f64 * 0.1
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_analyze_without_quiz() {
        let input = temp_path("input.jsonl");
        tokio::fs::write(&input, recording(10)).await.unwrap();

        let settings = Settings {
            input: Some(input.clone()),
            ..Default::default()
        };
        let report = analyze(&settings).await.unwrap();
        tokio::fs::remove_file(&input).await.ok();

        assert_eq!(report.summary.frames, 10);
        assert_eq!(report.summary.max_score, 49.5);
        assert_eq!(report.summary.min_score, 45.0);
        assert!(report.quiz.is_none());
        assert_eq!(
            report.summary.camera.get(session_stats::CameraFacing::NotFront),
            100.0
        );
    }

    #[tokio::test]
    async fn test_analyze_with_quiz_and_output() {
        let input = temp_path("input.jsonl");
        let quiz = temp_path("quiz.json");
        let answers = temp_path("answers.json");
        let output = temp_path("report.json");
        tokio::fs::write(&input, recording(4)).await.unwrap();
        tokio::fs::write(
            &quiz,
            r#"{"questions": [{"question": "Q1?", "options": ["A", "B"], "correct_answer": "A"},
                              {"question": "Q2?", "options": ["A", "B"], "correct_answer": "B"}]}"#,
        )
        .await
        .unwrap();
        tokio::fs::write(&answers, r#"["A", "A"]"#).await.unwrap();

        let settings = Settings {
            input: Some(input.clone()),
            quiz: Some(quiz.clone()),
            answers: Some(answers.clone()),
            output: Some(output.clone()),
            ..Default::default()
        };
        let report = analyze(&settings).await.unwrap();
        write_report(&report, &settings).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&output).await.unwrap()).unwrap();
        for path in [&input, &quiz, &answers, &output] {
            tokio::fs::remove_file(path).await.ok();
        }

        let section = report.quiz.unwrap();
        assert_eq!(section.adjustment, 0.0);
        assert_eq!(section.grade.correct, 1);
        assert_eq!(written["quiz"]["grade"]["score_out_of_ten"], 5.0);
        assert_eq!(written["score_cards"]["final_score"], section.average_after_quiz);
    }

    #[tokio::test]
    async fn test_missing_input() {
        let result = analyze(&Settings::default()).await;
        assert!(matches!(result, Err(AnalyzerError::MissingInput)));
    }

    #[test]
    fn test_bad_log_level() {
        assert!(matches!(
            init_logging("loud", LogFormat::Text),
            Err(AnalyzerError::Logging(_))
        ));
    }
}

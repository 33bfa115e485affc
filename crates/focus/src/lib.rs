//! Focus Scoring
//!
//! Per-frame focus estimation from face landmarks:
//! - Head pose, per-eye gaze and eye closure classification
//! - Dwell timers that debounce centered, not-centered and blink states
//! - A bounded score with rate-limited increases and decreases

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod geometry;
pub mod pose;
pub mod score;
pub mod signals;

#[cfg(test)]
mod testing;

pub use analysis::FrameAnalysis;
pub use classifier::GeometryClassifier;
pub use config::FocusConfig;
pub use debounce::{Confirmations, DwellTimer, TemporalDebouncer};
pub use pose::PoseError;
pub use score::{FocusScoreEngine, RateLimiter, ScoreUpdate};
pub use signals::{FrameSignals, GazeState, HeadPose, PoseAngles};

use std::time::Duration;

use face_mesh::LandmarkSet;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Focus error types
#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timestamp went backwards: {previous:?} -> {current:?}")]
    NonMonotonic { previous: Duration, current: Duration },
}

/// One scoring session: classifier, debouncer and score engine for a
/// single input stream
pub struct FocusSession {
    id: Uuid,
    config: FocusConfig,
    classifier: GeometryClassifier,
    debouncer: TemporalDebouncer,
    engine: FocusScoreEngine,
    last_timestamp: Option<Duration>,
    frames: u64,
}

impl FocusSession {
    /// Create a session; fails if the configuration is unusable
    pub fn new(config: FocusConfig) -> Result<Self, FocusError> {
        config.validate()?;
        let id = Uuid::new_v4();
        info!("Starting focus session {} with {:?}", id, config);

        Ok(Self {
            id,
            classifier: GeometryClassifier::new(),
            debouncer: TemporalDebouncer::new(&config),
            engine: FocusScoreEngine::new(&config),
            config,
            last_timestamp: None,
            frames: 0,
        })
    }

    /// Classify one frame and update the score.
    ///
    /// `landmarks` is `None` when no face was detected. Timestamps must not
    /// go backwards within a session.
    pub fn classify_and_score(
        &mut self,
        landmarks: Option<&LandmarkSet>,
        timestamp: Duration,
    ) -> Result<FrameAnalysis, FocusError> {
        if let Some(previous) = self.last_timestamp {
            if timestamp < previous {
                return Err(FocusError::NonMonotonic {
                    previous,
                    current: timestamp,
                });
            }
        }
        self.last_timestamp = Some(timestamp);
        self.frames += 1;
        metrics::counter!("focus_frames_total").increment(1);

        let analysis = match landmarks {
            None => {
                metrics::counter!("focus_faces_missing_total").increment(1);
                let update = self.engine.update(timestamp, None);
                FrameAnalysis {
                    timestamp,
                    score: self.engine.score(),
                    gaze: GazeState::NotDetected,
                    head_pose: HeadPose::NotDetected,
                    signals: None,
                    confirmed: None,
                    update,
                }
            }
            Some(landmarks) => {
                let signals = self.classifier.classify(landmarks);
                let eyes_closed = geometry::eyes_closed(signals.blink_ratio);
                let confirmed =
                    self.debouncer
                        .observe(timestamp, signals.is_centered(), eyes_closed);

                let update = self.engine.update(timestamp, Some(confirmed));
                if update.eyes_discount {
                    self.debouncer.rearm_blink(timestamp);
                }

                FrameAnalysis {
                    timestamp,
                    score: self.engine.score(),
                    gaze: signals.gaze,
                    head_pose: signals.head_pose,
                    signals: Some(signals),
                    confirmed: Some(confirmed),
                    update,
                }
            }
        };

        metrics::gauge!("focus_score").set(analysis.score);
        Ok(analysis)
    }

    pub fn score(&self) -> f64 {
        self.engine.score()
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Frames processed since the session started or was reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn classifier(&self) -> &GeometryClassifier {
        &self.classifier
    }

    pub fn debouncer(&self) -> &TemporalDebouncer {
        &self.debouncer
    }

    /// Start over for a new input: score back to 50, timers and limiters
    /// cleared, new session id
    pub fn reset(&mut self) {
        let previous = self.id;
        self.id = Uuid::new_v4();
        self.engine.reset();
        self.debouncer.reset();
        self.last_timestamp = None;
        self.frames = 0;
        debug!("Session {} reset as {}", previous, self.id);
    }
}

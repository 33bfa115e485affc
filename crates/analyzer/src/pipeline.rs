//! Frame-at-a-time focus pipeline

use face_mesh::{MeshFrame, MeshSource};
use focus::{FocusConfig, FocusSession, FrameAnalysis};
use session_stats::FrameLog;
use tracing::{debug, info};
use uuid::Uuid;

use crate::AnalyzerError;

/// Scores frames from one input at a time and keeps the session log
pub struct FocusPipeline {
    session: FocusSession,
    log: FrameLog,
}

impl FocusPipeline {
    pub fn new(config: FocusConfig) -> Result<Self, AnalyzerError> {
        Ok(Self {
            session: FocusSession::new(config)?,
            log: FrameLog::new(),
        })
    }

    /// Start a new input: fresh session state and an empty log
    pub fn begin(&mut self) {
        self.session.reset();
        self.log.clear();
        info!("Pipeline ready for session {}", self.session.session_id());
    }

    /// Score one pushed frame (live input)
    pub fn on_frame(&mut self, frame: &MeshFrame) -> Result<FrameAnalysis, AnalyzerError> {
        let analysis = self
            .session
            .classify_and_score(frame.landmarks.as_ref(), frame.timestamp)?;
        self.log.record(&analysis)?;
        Ok(analysis)
    }

    /// Pull `source` to exhaustion as a new input (batch); returns the
    /// number of frames scored
    pub fn process<M: MeshSource>(&mut self, source: &mut M) -> Result<usize, AnalyzerError> {
        self.begin();
        let mut frames = 0;
        while let Some(frame) = source.next_mesh()? {
            let analysis = self.on_frame(&frame)?;
            frames += 1;
            if frames % 300 == 0 {
                debug!(
                    "{} frames processed, score {:.2} at {:.1}s",
                    frames,
                    analysis.score,
                    analysis.timestamp.as_secs_f64()
                );
            }
        }
        info!(
            "Processed {} frames, final score {:.2}",
            frames,
            self.session.score()
        );
        Ok(frames)
    }

    /// Hand over the log of the current input
    pub fn finish(&mut self) -> FrameLog {
        std::mem::take(&mut self.log)
    }

    pub fn score(&self) -> f64 {
        self.session.score()
    }

    pub fn session_id(&self) -> Uuid {
        self.session.session_id()
    }

    pub fn log(&self) -> &FrameLog {
        &self.log
    }
}

//! Per-frame analysis output

use std::time::Duration;

use serde::Serialize;

use crate::debounce::Confirmations;
use crate::score::ScoreUpdate;
use crate::signals::{FrameSignals, GazeState, HeadPose};

/// Result of classifying and scoring one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameAnalysis {
    /// Offset from the start of the input
    #[serde(with = "secs")]
    pub timestamp: Duration,

    /// Score after this frame
    pub score: f64,

    pub gaze: GazeState,
    pub head_pose: HeadPose,

    /// Full classifier output when a face was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<FrameSignals>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<Confirmations>,

    pub update: ScoreUpdate,
}

impl FrameAnalysis {
    pub fn face_detected(&self) -> bool {
        self.signals.is_some()
    }
}

mod secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }
}

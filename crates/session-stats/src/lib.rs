//! Session Statistics
//!
//! Insertion-ordered frame log for one session and the aggregation that
//! reduces it to time-weighted distributions and score extremes.

pub mod log;
pub mod summary;

pub use log::{FrameLog, FrameRecord};
pub use summary::{summarize, CameraFacing, Distribution, SessionSummary, TimelinePoint};

use std::time::Duration;

use thiserror::Error;

/// Session statistics error types
#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("Frame timestamp went backwards: {previous:?} -> {current:?}")]
    NonMonotonic { previous: Duration, current: Duration },

    #[error("Score out of range: {0}")]
    InvalidScore(f64),
}

/// Round to two decimals
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

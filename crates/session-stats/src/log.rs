//! Per-frame session log

use std::time::Duration;

use focus::{FrameAnalysis, GazeState, HeadPose};
use serde::Serialize;
use tracing::debug;

use crate::StatsError;

/// One logged frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    #[serde(rename = "timestamp_s", serialize_with = "as_secs")]
    pub timestamp: Duration,

    /// Time since the previous record (zero for the first)
    #[serde(rename = "delta_time_s", serialize_with = "as_secs")]
    pub delta_time: Duration,

    pub focus_score: f64,
    pub gaze: GazeState,
    pub head_pose: HeadPose,
}

fn as_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

/// Append-only, timestamp-ordered log of one session's frames
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FrameLog {
    records: Vec<FrameRecord>,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame; `delta_time` is derived from the previous record
    pub fn push(
        &mut self,
        timestamp: Duration,
        focus_score: f64,
        gaze: GazeState,
        head_pose: HeadPose,
    ) -> Result<&FrameRecord, StatsError> {
        if !(0.0..=100.0).contains(&focus_score) {
            return Err(StatsError::InvalidScore(focus_score));
        }

        let delta_time = match self.records.last() {
            Some(last) if timestamp < last.timestamp => {
                return Err(StatsError::NonMonotonic {
                    previous: last.timestamp,
                    current: timestamp,
                });
            }
            Some(last) => timestamp - last.timestamp,
            None => Duration::ZERO,
        };

        self.records.push(FrameRecord {
            timestamp,
            delta_time,
            focus_score,
            gaze,
            head_pose,
        });
        Ok(&self.records[self.records.len() - 1])
    }

    /// Append the outcome of one scored frame
    pub fn record(&mut self, analysis: &FrameAnalysis) -> Result<&FrameRecord, StatsError> {
        self.push(
            analysis.timestamp,
            analysis.score,
            analysis.gaze,
            analysis.head_pose,
        )
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        debug!("Clearing frame log ({} records)", self.records.len());
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_from_previous() {
        let mut log = FrameLog::new();
        let first = *log
            .push(Duration::from_millis(200), 50.0, GazeState::Center, HeadPose::Forward)
            .unwrap();
        assert_eq!(first.delta_time, Duration::ZERO);

        let second = *log
            .push(Duration::from_millis(350), 50.3, GazeState::Center, HeadPose::Forward)
            .unwrap();
        assert_eq!(second.delta_time, Duration::from_millis(150));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_rejects_backwards() {
        let mut log = FrameLog::new();
        log.push(Duration::from_secs(1), 50.0, GazeState::Left, HeadPose::Left)
            .unwrap();
        let err = log
            .push(Duration::ZERO, 50.0, GazeState::Left, HeadPose::Left)
            .unwrap_err();
        assert!(matches!(err, StatsError::NonMonotonic { .. }));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_rejects_bad_score() {
        let mut log = FrameLog::new();
        assert!(log
            .push(Duration::ZERO, 101.0, GazeState::Center, HeadPose::Forward)
            .is_err());
        assert!(log
            .push(Duration::ZERO, f64::NAN, GazeState::Center, HeadPose::Forward)
            .is_err());
    }

    #[test]
    fn test_serializes_seconds() {
        let mut log = FrameLog::new();
        log.push(
            Duration::from_millis(1500),
            42.0,
            GazeState::Blink,
            HeadPose::Down,
        )
        .unwrap();
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json[0]["timestamp_s"], 1.5);
        assert_eq!(json[0]["gaze"], "Blink");
    }
}

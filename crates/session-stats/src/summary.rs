//! Reduction of a frame log to a session summary

use std::collections::BTreeMap;

use focus::{GazeState, HeadPose};
use serde::Serialize;
use tracing::debug;

use crate::log::FrameRecord;
use crate::round2;

/// Whether the face was found facing the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CameraFacing {
    Front,
    NotFront,
}

/// Percentage of qualifying time per category (two decimals).
///
/// Only observed categories are stored; any other category reads as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Distribution<K: Ord> {
    shares: BTreeMap<K, f64>,
}

impl<K: Ord> Default for Distribution<K> {
    fn default() -> Self {
        Self {
            shares: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> Distribution<K> {
    /// Time-weighted shares of `category` over the records where
    /// `qualifies` holds
    fn weigh<F, Q>(records: &[FrameRecord], category: F, qualifies: Q) -> Self
    where
        F: Fn(&FrameRecord) -> K,
        Q: Fn(&K) -> bool,
    {
        let mut time: BTreeMap<K, f64> = BTreeMap::new();
        let mut total = 0.0;
        for record in records {
            let key = category(record);
            if qualifies(&key) {
                let dt = record.delta_time.as_secs_f64();
                *time.entry(key).or_default() += dt;
                total += dt;
            }
        }

        if total <= 0.0 {
            return Self::default();
        }
        Self {
            shares: time
                .into_iter()
                .map(|(k, t)| (k, round2(t / total * 100.0)))
                .collect(),
        }
    }

    /// Share of `category` in percent, 0 if it never occurred
    pub fn get(&self, category: K) -> f64 {
        self.shares.get(&category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &f64)> {
        self.shares.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// One point of the focus-over-time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// Minutes since the first frame, two decimals
    pub minute: f64,
    pub focus_score: f64,
}

/// Summary statistics of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub gaze: Distribution<GazeState>,
    pub head_pose: Distribution<HeadPose>,
    pub camera: Distribution<CameraFacing>,
    pub min_score: f64,
    pub max_score: f64,
    /// Mean per-frame score; the before-quiz baseline
    pub mean_score: f64,
    pub frames: usize,
    pub duration_s: f64,
    pub timeline: Vec<TimelinePoint>,
}

/// Reduce a timestamp-ordered frame log.
///
/// Gaze shares cover only Center, Left and Right time, head-pose shares
/// exclude NotDetected time, and the camera split covers all time. Empty
/// input or a category without qualifying time yields zeros.
pub fn summarize(records: &[FrameRecord]) -> SessionSummary {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return SessionSummary::default();
    };

    let gaze = Distribution::weigh(
        records,
        |r| r.gaze,
        |g| !matches!(
            g,
            GazeState::NotDetected | GazeState::Unknown | GazeState::Blink
        ),
    );
    let head_pose = Distribution::weigh(records, |r| r.head_pose, |p| p.is_detected());
    let camera = Distribution::weigh(
        records,
        |r| {
            if r.head_pose.is_detected() {
                CameraFacing::Front
            } else {
                CameraFacing::NotFront
            }
        },
        |_| true,
    );

    let scores = records.iter().map(|r| r.focus_score);
    let min_score = scores.clone().fold(f64::INFINITY, f64::min);
    let max_score = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let mean_score = scores.sum::<f64>() / records.len() as f64;

    let timeline = records
        .iter()
        .map(|r| TimelinePoint {
            minute: round2((r.timestamp - first.timestamp).as_secs_f64() / 60.0),
            focus_score: r.focus_score,
        })
        .collect();

    let summary = SessionSummary {
        gaze,
        head_pose,
        camera,
        min_score,
        max_score,
        mean_score,
        frames: records.len(),
        duration_s: (last.timestamp - first.timestamp).as_secs_f64(),
        timeline,
    };
    debug!(
        "Summarized {} frames: mean {:.2}, min {:.2}, max {:.2}",
        summary.frames, summary.mean_score, summary.min_score, summary.max_score
    );
    summary
}

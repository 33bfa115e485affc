//! Per-frame classified signals

use serde::{Deserialize, Serialize};

/// Head pose bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum HeadPose {
    Forward,
    Left,
    Right,
    Down,
    Up,
    /// No face in the frame, or the pose fit failed
    #[default]
    NotDetected,
}

impl HeadPose {
    /// Bucket scaled pitch/yaw angles.
    ///
    /// Yaw wins over pitch; the pitch band is asymmetric (-10 / +20).
    pub fn from_angles(pitch: f64, yaw: f64) -> Self {
        if yaw < -10.0 {
            HeadPose::Left
        } else if yaw > 10.0 {
            HeadPose::Right
        } else if pitch < -10.0 {
            HeadPose::Down
        } else if pitch > 20.0 {
            HeadPose::Up
        } else {
            HeadPose::Forward
        }
    }

    pub fn is_detected(&self) -> bool {
        *self != HeadPose::NotDetected
    }
}

/// Gaze bucket, per eye or merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum GazeState {
    Center,
    Left,
    Right,
    /// Eyes closed
    Blink,
    /// No face in the frame
    #[default]
    NotDetected,
    /// Eye box too small to classify
    Unknown,
}

impl GazeState {
    /// Left or Right
    pub fn is_directional(&self) -> bool {
        matches!(self, GazeState::Left | GazeState::Right)
    }

    /// Combine the two per-eye readings.
    ///
    /// Agreement wins; otherwise a directional left eye wins, and failing
    /// that the right eye's reading is used.
    pub fn merge(left: GazeState, right: GazeState) -> GazeState {
        if left == right || left.is_directional() {
            left
        } else {
            right
        }
    }
}

/// Head pose angles after scaling, in the units the pose thresholds use
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Everything the classifier extracts from one face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSignals {
    pub head_pose: HeadPose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angles: Option<PoseAngles>,
    pub left_gaze: GazeState,
    pub right_gaze: GazeState,
    pub gaze: GazeState,
    /// Averaged eyelid aspect ratio (may be infinite when an eye is shut flat)
    pub blink_ratio: f64,
}

impl FrameSignals {
    /// Forward head with centered eyes
    pub fn is_centered(&self) -> bool {
        self.head_pose == HeadPose::Forward && self.gaze == GazeState::Center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_thresholds() {
        assert_eq!(HeadPose::from_angles(0.0, 0.0), HeadPose::Forward);
        assert_eq!(HeadPose::from_angles(0.0, -10.5), HeadPose::Left);
        assert_eq!(HeadPose::from_angles(0.0, 10.5), HeadPose::Right);
        assert_eq!(HeadPose::from_angles(-10.5, 0.0), HeadPose::Down);
        assert_eq!(HeadPose::from_angles(20.5, 0.0), HeadPose::Up);
    }

    #[test]
    fn test_pose_band_is_asymmetric() {
        // +15 pitch is still forward, -15 is already down
        assert_eq!(HeadPose::from_angles(15.0, 0.0), HeadPose::Forward);
        assert_eq!(HeadPose::from_angles(-15.0, 0.0), HeadPose::Down);
        // boundaries are exclusive
        assert_eq!(HeadPose::from_angles(-10.0, 10.0), HeadPose::Forward);
        assert_eq!(HeadPose::from_angles(20.0, -10.0), HeadPose::Forward);
    }

    #[test]
    fn test_yaw_takes_priority() {
        assert_eq!(HeadPose::from_angles(-30.0, 30.0), HeadPose::Right);
        assert_eq!(HeadPose::from_angles(40.0, -11.0), HeadPose::Left);
    }

    #[test]
    fn test_merge_tie_break() {
        use GazeState::*;
        assert_eq!(GazeState::merge(Left, Center), Left);
        assert_eq!(GazeState::merge(Center, Right), Right);
        assert_eq!(GazeState::merge(Center, Center), Center);
        assert_eq!(GazeState::merge(Right, Left), Right);
        assert_eq!(GazeState::merge(Blink, Blink), Blink);
        assert_eq!(GazeState::merge(Unknown, Center), Center);
        assert_eq!(GazeState::merge(Center, Unknown), Unknown);
    }
}

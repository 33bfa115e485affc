//! Landmarks to discrete per-frame signals

use face_mesh::{indices, LandmarkSet};
use tracing::{debug, warn};

use crate::geometry::{blink_ratio, eye_direction, iris_center};
use crate::pose;
use crate::signals::{FrameSignals, GazeState, HeadPose};

/// Turns one face into head pose, per-eye and merged gaze, and blink ratio.
///
/// Long-lived: one instance per session, reused for every frame.
#[derive(Debug, Default)]
pub struct GeometryClassifier {
    pose_failures: u64,
}

impl GeometryClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a detected face
    pub fn classify(&mut self, landmarks: &LandmarkSet) -> FrameSignals {
        let (head_pose, angles) = match pose::fit_head(landmarks) {
            Ok(fit) => {
                let angles = fit.scaled_angles();
                (HeadPose::from_angles(angles.pitch, angles.yaw), Some(angles))
            }
            Err(e) => {
                self.pose_failures += 1;
                warn!("Head pose fit failed: {}", e);
                (HeadPose::NotDetected, None)
            }
        };

        let left_eye = landmarks.pixels(&indices::LEFT_EYE);
        let right_eye = landmarks.pixels(&indices::RIGHT_EYE);

        let Some(ratio) = blink_ratio(&right_eye, &left_eye) else {
            return FrameSignals {
                head_pose,
                angles,
                left_gaze: GazeState::Unknown,
                right_gaze: GazeState::Unknown,
                gaze: GazeState::Unknown,
                blink_ratio: 0.0,
            };
        };

        let left_gaze = iris_center(&landmarks.pixels(&indices::LEFT_IRIS))
            .map_or(GazeState::Unknown, |iris| eye_direction(&left_eye, iris, ratio));
        let right_gaze = iris_center(&landmarks.pixels(&indices::RIGHT_IRIS))
            .map_or(GazeState::Unknown, |iris| eye_direction(&right_eye, iris, ratio));
        let gaze = GazeState::merge(left_gaze, right_gaze);

        debug!(
            "Classified frame: pose={:?} gaze={:?} (L={:?} R={:?}) ratio={:.2}",
            head_pose, gaze, left_gaze, right_gaze, ratio
        );

        FrameSignals {
            head_pose,
            angles,
            left_gaze,
            right_gaze,
            gaze,
            blink_ratio: ratio,
        }
    }

    /// Frames whose pose fit failed since creation
    pub fn pose_failures(&self) -> u64 {
        self.pose_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{face, Look};
    use face_mesh::{Landmark, REFINED_LANDMARK_COUNT};

    #[test]
    fn test_frontal_centered_face() {
        let mut classifier = GeometryClassifier::new();
        let signals = classifier.classify(&face(Look::Center, true));

        assert_eq!(signals.head_pose, HeadPose::Forward);
        assert_eq!(signals.left_gaze, GazeState::Center);
        assert_eq!(signals.right_gaze, GazeState::Center);
        assert!(signals.is_centered());
        assert!(signals.blink_ratio < 5.5);
    }

    #[test]
    fn test_looking_sideways() {
        let mut classifier = GeometryClassifier::new();
        assert_eq!(classifier.classify(&face(Look::Left, true)).gaze, GazeState::Left);
        assert_eq!(classifier.classify(&face(Look::Right, true)).gaze, GazeState::Right);
    }

    #[test]
    fn test_closed_eyes_blink() {
        let mut classifier = GeometryClassifier::new();
        let signals = classifier.classify(&face(Look::Center, false));
        assert_eq!(signals.gaze, GazeState::Blink);
        assert!(!signals.is_centered());
    }

    #[test]
    fn test_collapsed_face_degrades() {
        let mut classifier = GeometryClassifier::new();
        let points = vec![Landmark::new(0.5, 0.5, 0.0); REFINED_LANDMARK_COUNT];
        let set = LandmarkSet::new(points, 640, 480).unwrap();

        let signals = classifier.classify(&set);
        assert_eq!(signals.head_pose, HeadPose::NotDetected);
        assert!(signals.angles.is_none());
        assert_eq!(classifier.pose_failures(), 1);
    }
}

//! Landmark sets and anatomical index tables

use serde::{Deserialize, Serialize};

use crate::MeshError;

/// Points per face when iris refinement is enabled
pub const REFINED_LANDMARK_COUNT: usize = 478;

/// Stable anatomical indices into a refined landmark set
pub mod indices {
    /// Left eye contour (16 points). [0]/[8] span the eye horizontally,
    /// [12]/[4] vertically.
    pub const LEFT_EYE: [usize; 16] = [
        362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
    ];

    /// Right eye contour (16 points), same layout as `LEFT_EYE`
    pub const RIGHT_EYE: [usize; 16] = [
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ];

    /// Left iris ring
    pub const LEFT_IRIS: [usize; 4] = [474, 475, 476, 477];

    /// Right iris ring
    pub const RIGHT_IRIS: [usize; 4] = [469, 470, 471, 472];

    /// Nose tip, eye corners, mouth corners and chin used for the pose fit
    pub const POSE_REFERENCE: [usize; 6] = [1, 33, 61, 199, 263, 291];
}

/// Normalized landmark as produced by the face mesh.
///
/// `x`/`y` are fractions of the frame width/height, `z` is relative depth
/// on roughly the same scale as `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another pixel
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        dx.hypot(dy)
    }
}

/// One face worth of landmarks plus the dimensions of the frame it came from.
///
/// Immutable once built; the constructor guarantees every index in
/// [`indices`] is addressable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
    width: u32,
    height: u32,
}

impl LandmarkSet {
    /// Build a landmark set for a `width` x `height` frame
    pub fn new(points: Vec<Landmark>, width: u32, height: u32) -> Result<Self, MeshError> {
        if width == 0 || height == 0 {
            return Err(MeshError::InvalidDimensions { width, height });
        }
        if points.len() < REFINED_LANDMARK_COUNT {
            return Err(MeshError::TooFewLandmarks {
                expected: REFINED_LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        Ok(Self {
            points,
            width,
            height,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of landmarks
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw normalized landmark
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Landmark scaled to pixels, truncated toward zero
    pub fn pixel(&self, index: usize) -> Option<PixelPoint> {
        self.points.get(index).map(|lm| {
            PixelPoint::new(
                (lm.x * f64::from(self.width)) as i32,
                (lm.y * f64::from(self.height)) as i32,
            )
        })
    }

    /// Pixels for a group of indices (indices out of range are skipped)
    pub fn pixels(&self, group: &[usize]) -> Vec<PixelPoint> {
        group.iter().filter_map(|&i| self.pixel(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn uniform(x: f64, y: f64) -> Vec<Landmark> {
        vec![Landmark::new(x, y, 0.0); REFINED_LANDMARK_COUNT]
    }

    #[test]
    fn test_rejects_short_sets() {
        let err = LandmarkSet::new(vec![Landmark::default(); 468], 640, 480).unwrap_err();
        assert!(matches!(
            err,
            MeshError::TooFewLandmarks { expected: 478, actual: 468 }
        ));
    }

    #[test]
    fn test_rejects_empty_frame() {
        assert!(LandmarkSet::new(uniform(0.5, 0.5), 0, 480).is_err());
    }

    #[test]
    fn test_pixel_truncates() {
        let set = LandmarkSet::new(uniform(0.50, 0.2509), 641, 480).unwrap();
        let p = set.pixel(0).unwrap();
        assert_eq!(p, PixelPoint::new(320, 120));
        assert!(set.pixel(REFINED_LANDMARK_COUNT).is_none());
    }

    #[test]
    fn test_pixel_distance() {
        let a = PixelPoint::new(0, 0);
        let b = PixelPoint::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn pixels_stay_inside_frame(x in 0.0f64..0.999, y in 0.0f64..0.999, w in 1u32..4000, h in 1u32..4000) {
            let set = LandmarkSet::new(uniform(x, y), w, h).unwrap();
            let p = set.pixel(indices::POSE_REFERENCE[0]).unwrap();
            prop_assert!(p.x >= 0 && (p.x as u32) < w);
            prop_assert!(p.y >= 0 && (p.y as u32) < h);
        }
    }
}

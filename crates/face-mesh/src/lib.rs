//! Face Mesh Input Layer
//!
//! Everything the focus core consumes from the outside world:
//! - Landmark sets with the refined-iris index scheme (478 points)
//! - Decoded video frames and the frame-source seam (live or file-backed)
//! - The landmark-provider seam (image -> zero or one face)
//! - Replay of pre-extracted landmark recordings (JSON lines)

pub mod frame;
pub mod landmarks;
pub mod recorded;

pub use frame::{
    Detected, FrameSource, LandmarkProvider, MeshFrame, MeshSource, VideoFrame,
    NOMINAL_FRAME_INTERVAL,
};
pub use landmarks::{indices, Landmark, LandmarkSet, PixelPoint, REFINED_LANDMARK_COUNT};
pub use recorded::{RecordedFrame, RecordedMesh};

use thiserror::Error;

/// Face mesh error types
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Landmark set too small: expected {expected} points, got {actual}")]
    TooFewLandmarks { expected: usize, actual: usize },

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Failure reported by an external [`LandmarkProvider`] implementation
    #[error("Landmark provider failed: {0}")]
    Provider(String),

    #[error("Malformed recording at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

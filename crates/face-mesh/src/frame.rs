//! Video frames and the seams that turn them into landmark streams

use std::time::Duration;

use image::{imageops, RgbImage};
use tracing::debug;

use crate::{LandmarkSet, MeshError};

/// Nominal interval between frames of a file-backed source (30 fps)
pub const NOMINAL_FRAME_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 30);

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Offset from the start of the input
    pub timestamp: Duration,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp: Duration, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp,
            sequence,
        }
    }

    /// Copy the pixels into an image buffer
    pub fn to_image(&self) -> Result<RgbImage, MeshError> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            MeshError::InvalidFrame(format!(
                "{} bytes do not fill a {}x{} RGB frame",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }

    /// Horizontally mirrored copy, the selfie view landmark providers expect
    pub fn mirrored(&self) -> Result<VideoFrame, MeshError> {
        let flipped = imageops::flip_horizontal(&self.to_image()?);
        Ok(VideoFrame {
            data: flipped.into_raw(),
            width: self.width,
            height: self.height,
            timestamp: self.timestamp,
            sequence: self.sequence,
        })
    }
}

/// One timestamped landmark observation; `landmarks` is `None` when no face
/// was found in the frame.
#[derive(Debug, Clone)]
pub struct MeshFrame {
    pub timestamp: Duration,
    pub landmarks: Option<LandmarkSet>,
}

/// Face-landmark extraction capability (e.g. a face-mesh model).
///
/// Implementations are long-lived: acquire one per session and drop it when
/// the session ends.
pub trait LandmarkProvider {
    /// Extract at most one face from `image`
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>, MeshError>;
}

/// Pull-based supplier of decoded frames
pub trait FrameSource {
    /// Next frame, or `None` once the input is exhausted
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, MeshError>;
}

/// Pull-based supplier of landmark observations
pub trait MeshSource {
    /// Next observation, or `None` once the input is exhausted
    fn next_mesh(&mut self) -> Result<Option<MeshFrame>, MeshError>;
}

/// Runs a [`LandmarkProvider`] over every frame of a [`FrameSource`]
pub struct Detected<S, P> {
    source: S,
    provider: P,
    mirror: bool,
}

impl<S: FrameSource, P: LandmarkProvider> Detected<S, P> {
    /// Mirror frames before detection, as a webcam preview does
    pub fn new(source: S, provider: P) -> Self {
        Self {
            source,
            provider,
            mirror: true,
        }
    }

    /// Feed frames to the provider as captured
    pub fn unmirrored(source: S, provider: P) -> Self {
        Self {
            source,
            provider,
            mirror: false,
        }
    }

    /// Release the source and provider
    pub fn into_parts(self) -> (S, P) {
        (self.source, self.provider)
    }
}

impl<S: FrameSource, P: LandmarkProvider> MeshSource for Detected<S, P> {
    fn next_mesh(&mut self) -> Result<Option<MeshFrame>, MeshError> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        let frame = if self.mirror { frame.mirrored()? } else { frame };
        let landmarks = self.provider.detect(&frame.to_image()?)?;
        if landmarks.is_none() {
            debug!("No face in frame {}", frame.sequence);
        }

        Ok(Some(MeshFrame {
            timestamp: frame.timestamp,
            landmarks,
        }))
    }
}

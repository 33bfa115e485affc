//! Replay of pre-extracted landmark recordings
//!
//! A recording is JSON lines, one object per frame:
//!
//! ```json
//! {"timestamp_s": 0.033, "width": 640, "height": 480, "landmarks": [{"x": 0.5, "y": 0.4, "z": -0.01}, ...]}
//! ```
//!
//! `landmarks` is `null`, empty or absent when no face was found.
//! `timestamp_s` may be omitted, in which case frames are spaced by the
//! nominal interval.

use std::io::BufRead;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Landmark, LandmarkSet, MeshError, MeshFrame, MeshSource, NOMINAL_FRAME_INTERVAL};

const MAX_TIMESTAMP_S: f64 = 1e9;

/// One line of a landmark recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_s: Option<f64>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

/// [`MeshSource`] over a JSON-lines recording
pub struct RecordedMesh<R> {
    reader: R,
    line: usize,
    index: u32,
    interval: Duration,
    buf: String,
}

impl<R: BufRead> RecordedMesh<R> {
    pub fn new(reader: R) -> Self {
        Self::with_interval(reader, NOMINAL_FRAME_INTERVAL)
    }

    /// Use `interval` to space frames that carry no timestamp
    pub fn with_interval(reader: R, interval: Duration) -> Self {
        Self {
            reader,
            line: 0,
            index: 0,
            interval,
            buf: String::new(),
        }
    }

    fn decode(&self, record: RecordedFrame) -> Result<MeshFrame, MeshError> {
        let timestamp = match record.timestamp_s {
            // Rounded to the nearest nanosecond so decimal timestamps such
            // as 0.7 keep exact spacing
            Some(secs) if secs.is_finite() && (0.0..MAX_TIMESTAMP_S).contains(&secs) => {
                Duration::from_nanos((secs * 1e9).round() as u64)
            }
            Some(secs) => {
                return Err(MeshError::InvalidFrame(format!(
                    "line {}: timestamp {} out of range",
                    self.line, secs
                )))
            }
            None => self.interval * self.index,
        };

        let landmarks = match record.landmarks {
            Some(points) if !points.is_empty() => {
                Some(LandmarkSet::new(points, record.width, record.height)?)
            }
            _ => None,
        };

        Ok(MeshFrame {
            timestamp,
            landmarks,
        })
    }
}

impl<R: BufRead> MeshSource for RecordedMesh<R> {
    fn next_mesh(&mut self) -> Result<Option<MeshFrame>, MeshError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                debug!("Recording exhausted after {} frames", self.index);
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let record: RecordedFrame = serde_json::from_str(text).map_err(|source| {
                MeshError::Parse {
                    line: self.line,
                    source,
                }
            })?;
            let frame = self.decode(record)?;
            self.index += 1;
            return Ok(Some(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::REFINED_LANDMARK_COUNT;
    use std::io::Cursor;

    fn face_line(timestamp: Option<f64>) -> String {
        let record = RecordedFrame {
            timestamp_s: timestamp,
            width: 640,
            height: 480,
            landmarks: Some(vec![Landmark::new(0.5, 0.5, 0.0); REFINED_LANDMARK_COUNT]),
        };
        serde_json::to_string(&record).unwrap()
    }

    #[test]
    fn test_replays_faces_and_gaps() {
        let text = format!(
            "{}\n\n{{\"timestamp_s\": 0.5, \"width\": 640, \"height\": 480, \"landmarks\": null}}\n",
            face_line(Some(0.25))
        );
        let mut mesh = RecordedMesh::new(Cursor::new(text));

        let first = mesh.next_mesh().unwrap().unwrap();
        assert_eq!(first.timestamp, Duration::from_millis(250));
        assert_eq!(first.landmarks.unwrap().width(), 640);

        let second = mesh.next_mesh().unwrap().unwrap();
        assert_eq!(second.timestamp, Duration::from_millis(500));
        assert!(second.landmarks.is_none());

        assert!(mesh.next_mesh().unwrap().is_none());
    }

    #[test]
    fn test_missing_timestamps_use_interval() {
        let text = format!("{}\n{}\n", face_line(None), face_line(None));
        let mut mesh = RecordedMesh::with_interval(Cursor::new(text), Duration::from_millis(100));

        assert_eq!(mesh.next_mesh().unwrap().unwrap().timestamp, Duration::ZERO);
        assert_eq!(
            mesh.next_mesh().unwrap().unwrap().timestamp,
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_parse_error_reports_line() {
        let text = format!("{}\nnot json\n", face_line(Some(0.0)));
        let mut mesh = RecordedMesh::new(Cursor::new(text));
        mesh.next_mesh().unwrap();

        match mesh.next_mesh() {
            Err(MeshError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other.map(|f| f.is_some())),
        }
    }

    #[test]
    fn test_decimal_timestamps_exact() {
        let text = format!("{}\n{}\n", face_line(Some(0.6)), face_line(Some(0.7)));
        let mut mesh = RecordedMesh::new(Cursor::new(text));
        let a = mesh.next_mesh().unwrap().unwrap().timestamp;
        let b = mesh.next_mesh().unwrap().unwrap().timestamp;
        assert_eq!(b - a, Duration::from_millis(100));
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let text = face_line(Some(-1.0));
        let mut mesh = RecordedMesh::new(Cursor::new(text));
        assert!(matches!(mesh.next_mesh(), Err(MeshError::InvalidFrame(_))));
    }
}

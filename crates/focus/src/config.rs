//! Focus scoring configuration

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::FocusError;

/// Score every session starts from
pub const START_SCORE: f64 = 50.0;

/// Upper bound of the score
pub const MAX_SCORE: f64 = 100.0;

/// Lower bound of the score
pub const MIN_SCORE: f64 = 0.0;

/// Centered look must persist this long before the score rises
pub const CENTER_THRESHOLD: Duration = Duration::from_millis(500);

/// Fixed increase per centered tick
pub const CENTER_GAIN: f64 = 0.3;

/// Declared centered discount. The increase path uses [`CENTER_GAIN`].
pub const DISCOUNT_CENTER: f64 = 0.3;

/// Fixed decrease per tick while no face is detected
pub const ABSENCE_PENALTY: f64 = 0.5;

/// Minimum interval between two mutations of the same direction
pub const MIN_MUTATION_INTERVAL: Duration = Duration::from_millis(100);

/// Blink ratio above which the eyes count as closed
pub const BLINK_RATIO_THRESHOLD: f64 = 5.5;

const SIDE_THRESHOLD_RANGE: RangeInclusive<f64> = 1.0..=50.0;
const DISCOUNT_SIDE_RANGE: RangeInclusive<f64> = 1.0..=50.0;
const BLINK_THRESHOLD_RANGE: RangeInclusive<f64> = 1.0..=50.0;
const DISCOUNT_EYES_RANGE: RangeInclusive<f64> = 5.0..=50.0;

/// Tunable part of the scoring policy.
///
/// The defaults for `discount_side` (0.3) and `discount_eyes` (0.5) sit
/// below their recommended ranges; only values changed from the defaults
/// are reported as out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Not-centered dwell before the side discount applies (seconds)
    pub side_threshold_s: f64,

    /// Score points removed per not-centered tick
    pub discount_side: f64,

    /// Eyes-closed dwell before the eye discount applies (seconds)
    pub blink_threshold_s: f64,

    /// Score points removed per eyes-closed tick
    pub discount_eyes: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            side_threshold_s: 3.0,
            discount_side: 0.3,
            blink_threshold_s: 3.0,
            discount_eyes: 0.5,
        }
    }
}

impl FocusConfig {
    /// Reject unusable values; warn about changed values outside the
    /// recommended ranges
    pub fn validate(&self) -> Result<(), FocusError> {
        for (name, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(FocusError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        for (name, secs) in [
            ("side_threshold_s", self.side_threshold_s),
            ("blink_threshold_s", self.blink_threshold_s),
        ] {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| FocusError::Config(format!("{}: {}", name, e)))?;
        }

        for name in self.outside_recommended() {
            warn!("{} is outside its recommended range", name);
        }

        Ok(())
    }

    /// Fields set away from their defaults and outside the recommended ranges
    pub fn outside_recommended(&self) -> Vec<&'static str> {
        let defaults = Self::default().fields();
        let ranges = [
            SIDE_THRESHOLD_RANGE,
            DISCOUNT_SIDE_RANGE,
            BLINK_THRESHOLD_RANGE,
            DISCOUNT_EYES_RANGE,
        ];

        self.fields()
            .into_iter()
            .zip(defaults)
            .zip(ranges)
            .filter(|(((_, value), (_, default)), range)| {
                value != default && !range.contains(value)
            })
            .map(|(((name, _), _), _)| name)
            .collect()
    }

    fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("side_threshold_s", self.side_threshold_s),
            ("discount_side", self.discount_side),
            ("blink_threshold_s", self.blink_threshold_s),
            ("discount_eyes", self.discount_eyes),
        ]
    }

    /// Not-centered dwell as a duration
    pub fn side_threshold(&self) -> Duration {
        Duration::try_from_secs_f64(self.side_threshold_s).unwrap_or_default()
    }

    /// Eyes-closed dwell as a duration
    pub fn blink_threshold(&self) -> Duration {
        Duration::try_from_secs_f64(self.blink_threshold_s).unwrap_or_default()
    }
}

//! Bounded focus score with per-direction rate limiting

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::{
    FocusConfig, ABSENCE_PENALTY, CENTER_GAIN, MAX_SCORE, MIN_MUTATION_INTERVAL, MIN_SCORE,
    START_SCORE,
};
use crate::debounce::Confirmations;

/// Minimum spacing between two mutations of the same direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Duration>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Whether a mutation at `now` is allowed
    pub fn ready(&self, now: Duration) -> bool {
        self.last
            .map_or(true, |last| now.saturating_sub(last) >= self.min_interval)
    }

    /// Record a mutation at `now`
    pub fn mark(&mut self, now: Duration) {
        self.last = Some(now);
    }

    pub fn last(&self) -> Option<Duration> {
        self.last
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// What one frame did to the score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreUpdate {
    /// Signed change actually applied after clamping
    pub delta: f64,
    pub center_gain: bool,
    pub absence_penalty: bool,
    pub side_discount: bool,
    pub eyes_discount: bool,
}

impl ScoreUpdate {
    fn decreased(&self) -> bool {
        self.absence_penalty || self.side_discount || self.eyes_discount
    }
}

/// Owns the score in [0, 100] and the two rate limiters
#[derive(Debug, Clone)]
pub struct FocusScoreEngine {
    score: f64,
    discount_side: f64,
    discount_eyes: f64,
    increase: RateLimiter,
    decrease: RateLimiter,
}

impl FocusScoreEngine {
    pub fn new(config: &FocusConfig) -> Self {
        Self {
            score: START_SCORE,
            discount_side: config.discount_side,
            discount_eyes: config.discount_eyes,
            increase: RateLimiter::new(MIN_MUTATION_INTERVAL),
            decrease: RateLimiter::new(MIN_MUTATION_INTERVAL),
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Apply one frame.
    ///
    /// `None` means no face was detected: a fixed penalty gated only by the
    /// decrease limiter. Otherwise the centered gain or side discount
    /// applies, and the eye discount is evaluated on top of either. The
    /// decrease limiter is sampled once, so side and eye discounts can land
    /// in the same frame.
    pub fn update(&mut self, now: Duration, confirmed: Option<Confirmations>) -> ScoreUpdate {
        let before = self.score;
        let decrease_ready = self.decrease.ready(now);
        let mut update = ScoreUpdate::default();

        match confirmed {
            None => {
                if decrease_ready {
                    self.adjust(-ABSENCE_PENALTY);
                    update.absence_penalty = true;
                }
            }
            Some(c) => {
                if c.centered {
                    if self.increase.ready(now) {
                        self.adjust(CENTER_GAIN);
                        self.increase.mark(now);
                        update.center_gain = true;
                    }
                } else if c.not_centered && decrease_ready {
                    self.adjust(-self.discount_side);
                    update.side_discount = true;
                }

                if c.blink_held && decrease_ready {
                    self.adjust(-self.discount_eyes);
                    update.eyes_discount = true;
                }
            }
        }

        if update.decreased() {
            self.decrease.mark(now);
        }
        update.delta = self.score - before;

        if update.delta != 0.0 {
            debug!("Score {:.2} -> {:.2} ({:?})", before, self.score, update);
        }
        update
    }

    fn adjust(&mut self, delta: f64) {
        self.score = (self.score + delta).clamp(MIN_SCORE, MAX_SCORE);
    }

    /// Back to the start score with both limiters cleared
    pub fn reset(&mut self) {
        self.score = START_SCORE;
        self.increase.clear();
        self.decrease.clear();
    }
}

//! Dwell timers that turn per-frame signals into confirmed states

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::{FocusConfig, CENTER_THRESHOLD};

/// Moment a condition was entered, if it currently holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DwellTimer {
    since: Option<Duration>,
}

impl DwellTimer {
    pub fn since(&self) -> Option<Duration> {
        self.since
    }

    pub fn is_running(&self) -> bool {
        self.since.is_some()
    }

    /// Elapsed time since the condition began; `None` when it just started
    fn enter(&mut self, now: Duration) -> Option<Duration> {
        match self.since {
            Some(start) => Some(now.saturating_sub(start)),
            None => {
                self.since = Some(now);
                None
            }
        }
    }

    fn restart(&mut self, now: Duration) {
        self.since = Some(now);
    }

    fn clear(&mut self) {
        self.since = None;
    }
}

/// Dwell confirmations for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confirmations {
    pub centered: bool,
    pub not_centered: bool,
    pub blink_held: bool,
}

/// Centered, not-centered and blink-held dwell timers
#[derive(Debug, Clone)]
pub struct TemporalDebouncer {
    side_threshold: Duration,
    blink_threshold: Duration,
    centered: DwellTimer,
    not_centered: DwellTimer,
    blink: DwellTimer,
}

impl TemporalDebouncer {
    pub fn new(config: &FocusConfig) -> Self {
        Self {
            side_threshold: config.side_threshold(),
            blink_threshold: config.blink_threshold(),
            centered: DwellTimer::default(),
            not_centered: DwellTimer::default(),
            blink: DwellTimer::default(),
        }
    }

    /// Advance the timers with one frame's signals.
    ///
    /// Centered and not-centered dwell are mutually exclusive: entering one
    /// clears the other. Blink dwell runs independently and clears the
    /// first frame the eyes are open again.
    pub fn observe(&mut self, now: Duration, centered: bool, eyes_closed: bool) -> Confirmations {
        let mut confirmed = Confirmations::default();

        if centered {
            self.not_centered.clear();
            let elapsed = self.centered.enter(now).unwrap_or_default();
            confirmed.centered = elapsed >= CENTER_THRESHOLD;
        } else {
            self.centered.clear();
            confirmed.not_centered = self
                .not_centered
                .enter(now)
                .is_some_and(|elapsed| elapsed >= self.side_threshold);
        }

        if eyes_closed {
            confirmed.blink_held = self
                .blink
                .enter(now)
                .is_some_and(|elapsed| elapsed >= self.blink_threshold);
        } else if self.blink.is_running() {
            debug!("Eyes reopened, blink dwell cleared");
            self.blink.clear();
        }

        confirmed
    }

    /// Restart the blink dwell so a sustained closure fires again one
    /// threshold later
    pub fn rearm_blink(&mut self, now: Duration) {
        self.blink.restart(now);
    }

    pub fn centered(&self) -> DwellTimer {
        self.centered
    }

    pub fn not_centered(&self) -> DwellTimer {
        self.not_centered
    }

    pub fn blink(&self) -> DwellTimer {
        self.blink
    }

    /// Clear every timer
    pub fn reset(&mut self) {
        self.centered.clear();
        self.not_centered.clear();
        self.blink.clear();
    }
}

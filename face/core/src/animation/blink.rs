//! Automatic blinking
//!
//! A blink starts once a random interval has elapsed since the previous one.
//! Progress then runs from 0 to 1 and the rendered lid follows an asymmetric
//! triangle: fast close over the first 30%, slow open over the rest.

use rand::Rng;

use crate::config::AnimationTuning;

/// Fraction of the blink spent closing
const CLOSE_PHASE: f32 = 0.3;

/// Blink scheduling state
#[derive(Clone, Debug, PartialEq)]
pub struct BlinkState {
    /// 0..1 through the current blink
    pub progress: f32,
    /// A blink is in flight
    pub is_blinking: bool,
    /// Gap before the next automatic blink
    pub next_interval_ms: u64,
    /// Clock reading when the last blink started
    pub last_blink_ms: u64,
}

impl BlinkState {
    pub fn new<R: Rng + ?Sized>(tuning: &AnimationTuning, rng: &mut R) -> Self {
        Self {
            progress: 0.0,
            is_blinking: false,
            next_interval_ms: draw_interval(tuning, rng),
            last_blink_ms: 0,
        }
    }

    /// Start a blink right now
    pub fn force(&mut self, now_ms: u64) {
        self.is_blinking = true;
        self.progress = 0.0;
        self.last_blink_ms = now_ms;
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        dt: f32,
        tuning: &AnimationTuning,
        rng: &mut R,
    ) {
        if !self.is_blinking && now_ms.saturating_sub(self.last_blink_ms) > self.next_interval_ms {
            self.force(now_ms);
            self.next_interval_ms = draw_interval(tuning, rng);
        }

        if self.is_blinking {
            self.progress += dt * tuning.blink_rate;
            if self.progress >= 1.0 {
                self.is_blinking = false;
                self.progress = 0.0;
            }
        }
    }

    /// Lid closure for rendering (0 = open, 1 = shut)
    #[must_use]
    pub fn factor(&self) -> f32 {
        if !self.is_blinking {
            return 0.0;
        }
        blink_envelope(self.progress)
    }
}

/// Triangular blink envelope over `progress` in `[0, 1]`
#[must_use]
pub fn blink_envelope(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    let value = if p < CLOSE_PHASE {
        p / CLOSE_PHASE
    } else {
        1.0 - (p - CLOSE_PHASE) / (1.0 - CLOSE_PHASE)
    };
    value.clamp(0.0, 1.0)
}

fn draw_interval<R: Rng + ?Sized>(tuning: &AnimationTuning, rng: &mut R) -> u64 {
    let lo = tuning.blink_min_interval_ms;
    let hi = tuning.blink_max_interval_ms.max(lo);
    rng.gen_range(lo..=hi)
}

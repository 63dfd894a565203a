//! Per-eye wink from an eye poke

use serde::{Deserialize, Serialize};

use crate::config::AnimationTuning;

/// Below this the live value snaps shut to zero
const WINK_EPSILON: f32 = 0.01;

/// Which eye
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// `0` is the left eye, anything else the right
    #[must_use]
    pub fn from_index(index: u8) -> Self {
        if index == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Wink state of one eye
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EyeWink {
    /// Live closure (0 = open, 1 = shut)
    pub value: f32,
    pub target: f32,
    /// Clock reading of the last poke, `None` when not poked
    pub poked_at_ms: Option<u64>,
}

impl EyeWink {
    fn poke(&mut self, now_ms: u64) {
        self.target = 1.0;
        self.value = 1.0;
        self.poked_at_ms = Some(now_ms);
    }

    fn update(&mut self, now_ms: u64, dt: f32, tuning: &AnimationTuning) {
        if let Some(poked_at) = self.poked_at_ms {
            if now_ms.saturating_sub(poked_at) >= tuning.wink_hold_ms {
                self.target = 0.0;
            }
        }

        let step = (dt * tuning.wink_rate).min(1.0);
        self.value = (self.value + (self.target - self.value) * step).clamp(0.0, 1.0);

        if self.target == 0.0 && self.value < WINK_EPSILON {
            self.value = 0.0;
            self.poked_at_ms = None;
        }
    }
}

/// Wink state for both eyes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WinkState {
    pub left: EyeWink,
    pub right: EyeWink,
}

impl WinkState {
    /// Close an eye in response to a poke
    pub fn poke(&mut self, eye: Eye, now_ms: u64) {
        self.eye_mut(eye).poke(now_ms);
    }

    /// Set both targets directly
    pub fn set_targets(&mut self, left: f32, right: f32) {
        self.left.target = left.clamp(0.0, 1.0);
        self.right.target = right.clamp(0.0, 1.0);
    }

    pub fn update(&mut self, now_ms: u64, dt: f32, tuning: &AnimationTuning) {
        self.left.update(now_ms, dt, tuning);
        self.right.update(now_ms, dt, tuning);
    }

    #[must_use]
    pub fn value(&self, eye: Eye) -> f32 {
        match eye {
            Eye::Left => self.left.value,
            Eye::Right => self.right.value,
        }
    }

    fn eye_mut(&mut self, eye: Eye) -> &mut EyeWink {
        match eye {
            Eye::Left => &mut self.left,
            Eye::Right => &mut self.right,
        }
    }
}

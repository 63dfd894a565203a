//! Gaze following and edge tracking
//!
//! The eyes ease toward the requested gaze point. When the gaze nears an
//! edge of the display the whole face leans that way, proportionally to how
//! far past the threshold it is.

use serde::{Deserialize, Serialize};

use crate::config::AnimationTuning;

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centre of the unit square
    pub const CENTER: Vec2 = Vec2::new(0.5, 0.5);
}

#[derive(Clone, Debug, PartialEq)]
pub struct GazeState {
    /// Smoothed gaze in `[0, 1]²`
    pub gaze: Vec2,
    pub target: Vec2,
    /// Face lean in reference units
    pub face_offset: Vec2,
}

impl Default for GazeState {
    fn default() -> Self {
        Self {
            gaze: Vec2::CENTER,
            target: Vec2::CENTER,
            face_offset: Vec2::default(),
        }
    }
}

impl GazeState {
    /// Set the gaze target, clamped to the unit square
    pub fn look_at(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(clamp_unit(x), clamp_unit(y));
    }

    pub fn update(&mut self, dt: f32, tuning: &AnimationTuning) {
        let follow = (dt * tuning.gaze_rate).min(1.0);
        self.gaze.x = clamp_unit(self.gaze.x + (self.target.x - self.gaze.x) * follow);
        self.gaze.y = clamp_unit(self.gaze.y + (self.target.y - self.gaze.y) * follow);

        let lean = Vec2::new(
            edge_lean(self.gaze.x, tuning.edge_threshold) * tuning.max_face_shift_x,
            edge_lean(self.gaze.y, tuning.edge_threshold) * tuning.max_face_shift_y,
        );
        let shift = (dt * tuning.face_shift_rate).min(1.0);
        self.face_offset.x += (lean.x - self.face_offset.x) * shift;
        self.face_offset.y += (lean.y - self.face_offset.y) * shift;
    }
}

/// Signed lean factor in `[-1, 1]` for one gaze axis
#[must_use]
pub fn edge_lean(gaze: f32, threshold: f32) -> f32 {
    if gaze < threshold {
        -((threshold - gaze) / threshold)
    } else if gaze > 1.0 - threshold {
        (gaze - (1.0 - threshold)) / threshold
    } else {
        0.0
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}

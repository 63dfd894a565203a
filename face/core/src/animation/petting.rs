//! Petting gesture
//!
//! Dragging on the face pushes it up or down. The live offset follows the
//! finger quickly and settles back slowly after release.

use crate::config::AnimationTuning;

/// Below this (after release) the offset snaps to zero
const SETTLE_THRESHOLD: f32 = 0.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PettingState {
    pub touch_active: bool,
    pub last_touch_y: f32,
    /// Live vertical offset in reference units
    pub offset_y: f32,
    pub target_offset_y: f32,
    /// The gesture switched the face to the cat expression
    pub auto_switched: bool,
}

impl PettingState {
    /// Start a gesture at `y`
    pub fn begin(&mut self, y: f32) {
        self.touch_active = true;
        self.last_touch_y = y;
    }

    /// Finger moved to `y`
    pub fn drag(&mut self, y: f32, tuning: &AnimationTuning) {
        if !self.touch_active {
            return;
        }
        let delta = y - self.last_touch_y;
        self.last_touch_y = y;
        let max = tuning.petting_max_offset;
        self.target_offset_y =
            (self.target_offset_y + delta * tuning.petting_sensitivity).clamp(-max, max);
    }

    /// Finger lifted; returns whether the gesture had auto-switched the expression
    pub fn release(&mut self) -> bool {
        self.touch_active = false;
        self.target_offset_y = 0.0;
        std::mem::take(&mut self.auto_switched)
    }

    pub fn update(&mut self, dt: f32, tuning: &AnimationTuning) {
        let rate = if self.touch_active {
            tuning.petting_press_rate
        } else {
            tuning.petting_release_rate
        };
        let step = (dt * rate).min(1.0);
        self.offset_y += (self.target_offset_y - self.offset_y) * step;

        if !self.touch_active && self.offset_y.abs() < SETTLE_THRESHOLD {
            self.offset_y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_is_bounded() {
        let tuning = AnimationTuning::default();
        let mut petting = PettingState::default();
        petting.begin(100.0);
        petting.drag(150.0, &tuning);
        assert_eq!(petting.target_offset_y, tuning.petting_max_offset);

        for _ in 0..20 {
            petting.update(0.05, &tuning);
            assert!(petting.offset_y > 0.0);
            assert!(petting.offset_y <= tuning.petting_max_offset);
        }
    }

    #[test]
    fn test_drag_ignored_without_touch() {
        let tuning = AnimationTuning::default();
        let mut petting = PettingState::default();
        petting.drag(150.0, &tuning);
        assert_eq!(petting.target_offset_y, 0.0);
    }

    #[test]
    fn test_release_settles_to_zero() {
        let tuning = AnimationTuning::default();
        let mut petting = PettingState::default();
        petting.begin(0.0);
        petting.drag(20.0, &tuning);
        for _ in 0..10 {
            petting.update(0.05, &tuning);
        }
        assert!(petting.offset_y > 5.0);

        petting.auto_switched = true;
        assert!(petting.release());
        assert!(!petting.auto_switched);

        let mut ticks = 0;
        while petting.offset_y != 0.0 {
            petting.update(0.05, &tuning);
            ticks += 1;
            assert!(ticks < 100, "offset never settled");
        }
    }
}

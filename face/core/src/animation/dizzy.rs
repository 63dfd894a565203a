//! Shake-triggered dizziness

use std::f32::consts::TAU;

use crate::config::AnimationTuning;
use crate::emotion::EmotionId;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DizzyState {
    pub active: bool,
    pub started_at_ms: u64,
    /// Radians, wrapped to one turn
    pub wobble_phase: f32,
    /// Expression restored when the dizziness wears off
    pub pre_dizzy_emotion: EmotionId,
}

impl DizzyState {
    /// Begin (or prolong) a dizzy spell
    pub fn start(&mut self, now_ms: u64, current_target: EmotionId) {
        if !self.active {
            self.pre_dizzy_emotion = current_target;
            self.wobble_phase = 0.0;
        }
        self.active = true;
        self.started_at_ms = now_ms;
    }

    /// End the spell; returns the expression to restore
    pub fn stop(&mut self) -> Option<EmotionId> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.wobble_phase = 0.0;
        Some(self.pre_dizzy_emotion)
    }

    /// Advance the wobble; returns the expression to restore once expired
    pub fn update(&mut self, now_ms: u64, dt: f32, tuning: &AnimationTuning) -> Option<EmotionId> {
        if !self.active {
            return None;
        }
        self.wobble_phase = (self.wobble_phase + dt * tuning.dizzy_wobble_rate) % TAU;
        if now_ms.saturating_sub(self.started_at_ms) >= tuning.dizzy_duration_ms {
            return self.stop();
        }
        None
    }

    /// Wobble in `[-1, 1]`, zero when not dizzy
    #[must_use]
    pub fn wobble(&self) -> f32 {
        if self.active {
            self.wobble_phase.sin()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_and_restores() {
        let tuning = AnimationTuning::default();
        let mut dizzy = DizzyState::default();
        dizzy.start(1000, EmotionId::Sad);

        assert_eq!(dizzy.update(2000, 0.05, &tuning), None);
        assert!(dizzy.wobble_phase > 0.0);
        assert_eq!(dizzy.update(4000, 0.05, &tuning), Some(EmotionId::Sad));
        assert!(!dizzy.active);
        assert_eq!(dizzy.wobble(), 0.0);
    }

    #[test]
    fn test_restart_keeps_original_snapshot() {
        let tuning = AnimationTuning::default();
        let mut dizzy = DizzyState::default();
        dizzy.start(0, EmotionId::Happy);
        dizzy.start(2500, EmotionId::Dizzy);

        assert_eq!(dizzy.update(3500, 0.05, &tuning), None);
        assert_eq!(dizzy.update(5500, 0.05, &tuning), Some(EmotionId::Happy));
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut dizzy = DizzyState::default();
        assert_eq!(dizzy.stop(), None);
    }
}

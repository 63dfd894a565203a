//! Face Animation
//!
//! Time-dependent state of the face: emotion transitions, gaze, blinking,
//! winks, petting and dizziness. Everything advances from a single
//! [`AnimationState::tick`] call driven by the render scheduler.
//!
//! # Design
//!
//! Time is an internal millisecond clock advanced by the clamped `dt` of
//! every tick, not the wall clock. A stalled process therefore resumes where
//! it left off instead of jumping ahead, and tests are deterministic.

mod blink;
mod dizzy;
mod gaze;
mod petting;
mod wink;

pub use blink::{blink_envelope, BlinkState};
pub use dizzy::DizzyState;
pub use gaze::{edge_lean, GazeState, Vec2};
pub use petting::PettingState;
pub use wink::{Eye, EyeWink, WinkState};

use rand::Rng;

use crate::config::AnimationTuning;
use crate::emotion::{interpolate, EmotionId, EmotionParameters};

/// Smallest accepted tick (seconds)
pub const MIN_DT: f32 = 0.001;
/// Largest accepted tick (seconds)
pub const MAX_DT: f32 = 0.1;

/// Clamp a frame delta into the stable range
#[must_use]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return MIN_DT;
    }
    dt.clamp(MIN_DT, MAX_DT)
}

/// Face-mode animation state
#[derive(Clone, Debug)]
pub struct AnimationState {
    tuning: AnimationTuning,
    now_ms: u64,

    pub current_emotion: EmotionId,
    pub target_emotion: EmotionId,
    /// 0..1 from `current_emotion` to `target_emotion`
    pub transition_progress: f32,
    pub current_params: EmotionParameters,

    pub gaze: GazeState,
    pub blink: BlinkState,
    pub wink: WinkState,
    pub petting: PettingState,
    pub dizzy: DizzyState,
}

impl AnimationState {
    /// Create a resting face showing `emotion`
    pub fn new<R: Rng + ?Sized>(tuning: AnimationTuning, emotion: EmotionId, rng: &mut R) -> Self {
        let blink = BlinkState::new(&tuning, rng);
        Self {
            tuning,
            now_ms: 0,
            current_emotion: emotion,
            target_emotion: emotion,
            transition_progress: 1.0,
            current_params: emotion.parameters(),
            gaze: GazeState::default(),
            blink,
            wink: WinkState::default(),
            petting: PettingState::default(),
            dizzy: DizzyState::default(),
        }
    }

    /// Internal clock reading
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[must_use]
    pub fn tuning(&self) -> &AnimationTuning {
        &self.tuning
    }

    /// Start a transition toward `emotion`
    pub fn set_emotion(&mut self, emotion: EmotionId) {
        self.target_emotion = emotion;
        self.transition_progress = 0.0;
    }

    pub fn set_gaze(&mut self, x: f32, y: f32) {
        self.gaze.look_at(x, y);
    }

    pub fn blink(&mut self) {
        self.blink.force(self.now_ms);
    }

    pub fn set_wink(&mut self, left: f32, right: f32) {
        self.wink.set_targets(left, right);
    }

    pub fn poke_eye(&mut self, eye: Eye) {
        self.wink.poke(eye, self.now_ms);
    }

    pub fn set_dizzy(&mut self, active: bool) {
        if active {
            self.dizzy.start(self.now_ms, self.target_emotion);
            self.set_emotion(EmotionId::Dizzy);
        } else if let Some(restore) = self.dizzy.stop() {
            self.set_emotion(restore);
        }
    }

    /// Finger down for a petting gesture
    pub fn begin_petting(&mut self, y: f32) {
        self.petting.begin(y);
        if self.target_emotion != EmotionId::Cat {
            self.set_emotion(EmotionId::Cat);
            self.petting.auto_switched = true;
        }
    }

    pub fn drag_petting(&mut self, y: f32) {
        self.petting.drag(y, &self.tuning);
    }

    pub fn end_petting(&mut self) {
        if self.petting.release() {
            self.set_emotion(EmotionId::Happy);
        }
    }

    /// Advance every Face-mode animation by `dt` seconds (clamped)
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let dt = clamp_dt(dt);
        self.now_ms += (dt * 1000.0).round() as u64;
        let now = self.now_ms;

        if self.transition_progress < 1.0 {
            self.transition_progress += dt * self.tuning.transition_rate;
            if self.transition_progress >= 1.0 {
                self.transition_progress = 1.0;
                self.current_emotion = self.target_emotion;
            }
            self.current_params = interpolate(
                &self.current_emotion.parameters(),
                &self.target_emotion.parameters(),
                self.transition_progress,
            );
        }

        self.gaze.update(dt, &self.tuning);
        self.blink.update(now, dt, &self.tuning, rng);
        self.wink.update(now, dt, &self.tuning);
        self.petting.update(dt, &self.tuning);

        if let Some(restore) = self.dizzy.update(now, dt, &self.tuning) {
            tracing::debug!(emotion = %restore, "Dizzy wore off");
            self.set_emotion(restore);
        }
    }

    /// Advance only the clock (used while another page is active)
    pub fn advance_clock(&mut self, dt: f32) {
        self.now_ms += (clamp_dt(dt) * 1000.0).round() as u64;
    }
}

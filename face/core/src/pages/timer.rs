//! Pomodoro countdown

use serde::{Deserialize, Serialize};

/// Longest countdown the `MM:SS` label can show
pub const MAX_MINUTES: u32 = 99;

const MAX_TOTAL_SECONDS: u32 = MAX_MINUTES * 60 + 59;

/// Countdown timer page payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub minutes: u32,
    /// 0..60
    pub seconds: u32,
    pub label: String,
    pub running: bool,
    /// Full duration when the countdown was set (drives the ring)
    pub total_seconds_at_start: u32,
    /// Engine clock reading of the last whole-second decrement
    pub last_tick_ms: u64,
}

impl TimerState {
    pub fn new(minutes: u32, seconds: u32, label: &str, running: bool, now_ms: u64) -> Self {
        let total = minutes
            .saturating_mul(60)
            .saturating_add(seconds)
            .min(MAX_TOTAL_SECONDS);
        Self {
            minutes: total / 60,
            seconds: total % 60,
            label: label.to_string(),
            running,
            total_seconds_at_start: total,
            last_tick_ms: now_ms,
        }
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    /// Remaining share of the original duration (1 = full, 0 = done)
    #[must_use]
    pub fn remaining_fraction(&self) -> f32 {
        if self.total_seconds_at_start == 0 {
            return 0.0;
        }
        (self.remaining_seconds() as f32 / self.total_seconds_at_start as f32).clamp(0.0, 1.0)
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.remaining_seconds() == 0 {
            return;
        }
        self.running = true;
        self.last_tick_ms = now_ms;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Back to `minutes:00`, paused
    pub fn reset(&mut self, minutes: u32, now_ms: u64) {
        let minutes = minutes.min(MAX_MINUTES);
        self.minutes = minutes;
        self.seconds = 0;
        self.running = false;
        self.total_seconds_at_start = minutes * 60;
        self.last_tick_ms = now_ms;
    }

    /// Count down one second per elapsed second of engine time
    pub fn update(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        while now_ms.saturating_sub(self.last_tick_ms) >= 1000 {
            self.last_tick_ms += 1000;
            if self.seconds > 0 {
                self.seconds -= 1;
            } else if self.minutes > 0 {
                self.minutes -= 1;
                self.seconds = 59;
            }
            if self.remaining_seconds() == 0 {
                self.running = false;
                tracing::info!(label = %self.label, "Timer finished");
                break;
            }
        }
    }

    /// `"MM:SS"`
    #[must_use]
    pub fn label_text(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

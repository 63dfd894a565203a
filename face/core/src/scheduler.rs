//! Frame Scheduler
//!
//! Drives an [`Engine`] at its configured frame period and feeds it input
//! from the bounded input channel.
//!
//! # Design
//!
//! One tokio task owns the loop. A `select!` waits on three things: the frame
//! interval, the next input event and shutdown. Late ticks are skipped rather
//! than bursted, so a stalled display never causes a catch-up storm.
//!
//! Frame deltas come from [`FrameClock`], which measures real elapsed time
//! with tokio's clock (so paused-time tests are deterministic).

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::engine::Engine;
use crate::input::{input_channel, InputEvent, InputReceiver, InputSender};

/// Measures time between frames
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or since creation)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Rendered frames per second, recomputed about once a second
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Count one rendered frame that took `dt` seconds
    pub fn record(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Render loop for one engine
pub struct Scheduler {
    engine: Engine,
    input: InputReceiver,
    clock: FrameClock,
}

impl Scheduler {
    /// Create a scheduler and the sender that feeds it input
    #[must_use]
    pub fn new(engine: Engine) -> (Self, InputSender) {
        let (tx, rx) = input_channel(engine.config().input_channel_capacity);
        let scheduler = Self {
            engine,
            input: rx,
            clock: FrameClock::new(),
        };
        (scheduler, tx)
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run until the engine is shut down
    pub async fn run(mut self) {
        let period = self.engine.config().frame_period();
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut input_open = true;

        tracing::info!(period_ms = period.as_millis() as u64, "Render loop started");
        self.clock.tick();

        loop {
            if self.engine.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    let dt = self.clock.tick();
                    self.engine.tick(dt);
                }
                event = self.input.recv(), if input_open => {
                    match event {
                        Some(event) => self.dispatch(event),
                        None => {
                            tracing::debug!("All input senders dropped");
                            input_open = false;
                        }
                    }
                }
                () = self.engine.shutdown_requested() => break,
            }
        }

        let status = self.engine.snapshot();
        tracing::info!(
            frames = status.frames_rendered,
            skipped = status.frames_skipped,
            dropped = status.commands_dropped,
            "Render loop stopped"
        );
    }

    fn dispatch(&self, event: InputEvent) {
        if !self.engine.handle_input(event) {
            tracing::trace!("Input had no effect");
        }
    }

    /// Run on a new tokio task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for _ in 0..10 {
            fps.record(0.05);
        }
        assert_eq!(fps.fps(), 0.0);
        for _ in 0..11 {
            fps.record(0.05);
        }
        assert!((fps.fps() - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_fps_ignores_bad_dt() {
        let mut fps = FpsCounter::default();
        fps.record(f32::NAN);
        fps.record(-1.0);
        fps.record(1.0);
        assert_eq!(fps.fps(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_clock_measures_elapsed() {
        let mut clock = FrameClock::new();
        time::advance(std::time::Duration::from_millis(50)).await;
        let dt = clock.tick();
        assert!((dt - 0.05).abs() < 1e-3);
    }
}

//! Engine
//!
//! [`Engine`] is a cheap-to-clone handle to one face. It owns all mutable
//! state behind a single lock, which both the render path and every command
//! take with a short timeout.
//!
//! # Contention
//!
//! Nothing here ever waits long. A frame that cannot get the lock within
//! `frame_lock_timeout_ms` is skipped; a command that cannot get it within
//! `command_timeout_ms` is dropped. The next frame or command supersedes it.
//! Inside a multi-threaded tokio runtime the wait runs under
//! [`tokio::task::block_in_place`] so it never parks a worker.
//!
//! # Queries
//!
//! Readers never touch the state lock. Every successful frame or command
//! publishes a copy of the queryable state to a status board, and the query
//! accessors read that copy.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Notify;

use crate::animation::{clamp_dt, AnimationState, Eye, Vec2};
use crate::color::{self, Rgb};
use crate::command::{self, Command};
use crate::config::EngineConfig;
use crate::emotion::EmotionId;
use crate::error::{EngineError, EngineResult};
use crate::input::InputEvent;
use crate::pages::{
    CalendarEvent, CalendarState, ClockState, DisplayPage, FontSize, Page, PageRegistry,
    ParticleKind, ParticleSystemState, Pixel, PixelGridState, SubwayState, TextState,
    TimerState, WeatherIcon, WeatherState,
};
use crate::render::Renderer;
use crate::scene::{compose_face, compose_page, eye_geometry, EyeGeometry, FaceLayout};
use crate::scheduler::FpsCounter;

/// Copy of the queryable engine state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EngineStatus {
    /// Expression the face is showing or heading toward
    pub emotion: EmotionId,
    /// Expression fully on screen (lags `emotion` during a transition)
    pub displayed_emotion: EmotionId,
    pub transition_progress: f32,
    pub gaze: Vec2,
    pub face_offset: Vec2,
    pub page: DisplayPage,
    pub fps: f32,
    pub dizzy: bool,
    pub cat_mode: bool,
    pub wink_left: f32,
    pub wink_right: f32,
    pub petting_offset_y: f32,
    pub blinking: bool,
    /// Engine clock in milliseconds
    pub clock_ms: u64,
    /// Eye placement from the last face frame (`None` off the face page)
    #[serde(skip)]
    pub eyes: Option<[EyeGeometry; 2]>,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub commands_dropped: u64,
}

/// Finger currently on the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Gesture {
    #[default]
    None,
    /// Press landed on an eye
    Poke,
    /// Press landed elsewhere on the face
    Pet,
}

/// Everything behind the state lock
struct EngineCore {
    anim: AnimationState,
    pages: PageRegistry,
    renderer: Box<dyn Renderer>,
    rng: StdRng,
    layout: FaceLayout,
    fps: FpsCounter,
    cat_mode: bool,
    gesture: Gesture,
    frames_rendered: u64,
}

impl EngineCore {
    fn now_ms(&self) -> u64 {
        self.anim.now_ms()
    }

    fn set_emotion(&mut self, emotion: EmotionId) {
        self.anim.set_emotion(emotion);
        self.renderer.invalidate();
    }

    /// Swap pages, hiding the old page's elements first
    fn show(&mut self, page: Page) {
        self.end_gesture();
        self.renderer.hide_all();
        self.pages.show(page);
    }

    fn clear_display(&mut self) {
        self.end_gesture();
        self.renderer.hide_all();
        if !self.pages.is_face() {
            self.pages.show(Page::Face);
        }
        self.renderer.invalidate();
    }

    fn set_dizzy(&mut self, active: bool) {
        let before = self.anim.target_emotion;
        self.anim.set_dizzy(active);
        if self.anim.target_emotion != before {
            self.renderer.invalidate();
        }
    }

    fn set_cat_mode(&mut self, enabled: bool) {
        self.cat_mode = enabled;
        if enabled {
            self.set_emotion(EmotionId::Cat);
        } else if self.anim.target_emotion == EmotionId::Cat {
            self.set_emotion(EmotionId::Neutral);
        }
    }

    fn hit_test(&self, x: f32, y: f32) -> Option<Eye> {
        if !self.pages.is_face() {
            return None;
        }
        eye_geometry(&self.anim, &self.layout)
            .into_iter()
            .find(|eye| eye.hit(x, y))
            .map(|eye| eye.eye)
    }

    /// Drop the finger: a petting gesture settles as on release
    fn end_gesture(&mut self) {
        if self.gesture == Gesture::Pet {
            let before = self.anim.target_emotion;
            self.anim.end_petting();
            if self.anim.target_emotion != before {
                self.renderer.invalidate();
            }
        }
        self.gesture = Gesture::None;
    }

    fn touch(&mut self, pressed: bool, x: f32, y: f32) {
        if !self.pages.is_face() {
            self.end_gesture();
            return;
        }
        match (self.gesture, pressed) {
            (Gesture::None, true) => {
                if let Some(eye) = self.hit_test(x, y) {
                    tracing::debug!(?eye, "Eye poked");
                    self.anim.poke_eye(eye);
                    self.gesture = Gesture::Poke;
                } else {
                    let before = self.anim.target_emotion;
                    self.anim.begin_petting(y);
                    if self.anim.target_emotion != before {
                        self.renderer.invalidate();
                    }
                    self.gesture = Gesture::Pet;
                }
            }
            (Gesture::Pet, true) => self.anim.drag_petting(y),
            (Gesture::Pet, false) => self.end_gesture(),
            (Gesture::Poke, false) => self.gesture = Gesture::None,
            (Gesture::Poke, true) | (Gesture::None, false) => {}
        }
    }

    /// Advance time by `dt` and draw the active page
    fn frame(&mut self, dt: f32) {
        self.fps.record(dt);
        if self.pages.is_face() {
            let before = self.anim.target_emotion;
            self.anim.tick(dt, &mut self.rng);
            if self.anim.target_emotion != before {
                self.renderer.invalidate();
            }
            let frame = compose_face(&self.anim, &self.layout);
            self.renderer.present(&frame);
        } else {
            self.anim.advance_clock(dt);
            let now = self.anim.now_ms();
            self.pages.update(now, clamp_dt(dt), &mut self.rng);
            let frame = compose_page(self.pages.active(), &self.layout);
            self.renderer.present(&frame);
        }
        self.frames_rendered += 1;
    }
}

struct Shared {
    config: EngineConfig,
    core: Mutex<EngineCore>,
    status: RwLock<EngineStatus>,
    shutdown: AtomicBool,
    shutdown_notify: Notify,
    frames_skipped: AtomicU64,
    commands_dropped: AtomicU64,
}

/// Handle to a running face engine
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("status", &*self.shared.status.read())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Bring up an engine drawing through `renderer`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the configuration fails
    /// validation and [`EngineError::SurfaceUnavailable`] if the renderer
    /// cannot get a drawing surface.
    pub fn new<R>(config: EngineConfig, renderer: R) -> EngineResult<Self>
    where
        R: Renderer + 'static,
    {
        config
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

        let mut renderer: Box<dyn Renderer> = Box::new(renderer);
        renderer.prepare(config.width, config.height)?;

        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let initial = if config.cat_mode {
            EmotionId::Cat
        } else {
            EmotionId::Neutral
        };
        let anim = AnimationState::new(config.animation.clone(), initial, &mut rng);

        let core = EngineCore {
            anim,
            pages: PageRegistry::new(),
            renderer,
            rng,
            layout: FaceLayout::new(config.width, config.height),
            fps: FpsCounter::default(),
            cat_mode: config.cat_mode,
            gesture: Gesture::None,
            frames_rendered: 0,
        };
        let status = RwLock::new(Self::status_of(&core, 0, 0));

        tracing::info!(
            width = config.width,
            height = config.height,
            frame_period_ms = config.frame_period_ms,
            cat_mode = config.cat_mode,
            "Face engine started"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                core: Mutex::new(core),
                status,
                shutdown: AtomicBool::new(false),
                shutdown_notify: Notify::new(),
                frames_skipped: AtomicU64::new(0),
                commands_dropped: AtomicU64::new(0),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Stop the engine; every later command is a no-op
    pub fn shutdown(&self) {
        if !self.shared.shutdown.swap(true, Ordering::SeqCst) {
            tracing::info!("Face engine shutting down");
            self.shared.shutdown_notify.notify_waiters();
        }
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shared.shutdown.load(Ordering::SeqCst)
    }

    /// Resolves once [`Engine::shutdown`] has been called
    pub async fn shutdown_requested(&self) {
        let notified = self.shared.shutdown_notify.notified();
        if self.is_shutdown() {
            return;
        }
        notified.await;
    }

    /// Advance and draw one frame
    ///
    /// Returns `false` when the frame was skipped because the state lock was
    /// busy (or the engine is shut down).
    pub fn tick(&self, dt: f32) -> bool {
        if self.is_shutdown() {
            return false;
        }
        let timeout = self.shared.config.frame_lock_timeout();
        let Some(mut core) = self.lock_core(timeout) else {
            let skipped = self.shared.frames_skipped.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(skipped, "State lock busy, skipping frame");
            return false;
        };
        core.frame(dt);
        self.publish(&core);
        true
    }

    /// Take the state lock, waiting at most `timeout`
    fn lock_core(&self, timeout: Duration) -> Option<MutexGuard<'_, EngineCore>> {
        if let Some(core) = self.shared.core.try_lock() {
            return Some(core);
        }
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.shared.core.try_lock_for(timeout))
            }
            _ => self.shared.core.try_lock_for(timeout),
        }
    }

    /// Run `f` under the state lock, or drop it on timeout
    fn command<F>(&self, name: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut EngineCore),
    {
        if self.is_shutdown() {
            return false;
        }
        let timeout: Duration = self.shared.config.command_timeout();
        let Some(mut core) = self.lock_core(timeout) else {
            self.shared.commands_dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(command = name, "State lock busy, dropping command");
            return false;
        };
        f(&mut core);
        self.publish(&core);
        true
    }

    fn publish(&self, core: &EngineCore) {
        let status = Self::status_of(
            core,
            self.shared.frames_skipped.load(Ordering::Relaxed),
            self.shared.commands_dropped.load(Ordering::Relaxed),
        );
        *self.shared.status.write() = status;
    }

    fn status_of(core: &EngineCore, frames_skipped: u64, commands_dropped: u64) -> EngineStatus {
        let anim = &core.anim;
        let on_face = core.pages.is_face();
        EngineStatus {
            emotion: anim.target_emotion,
            displayed_emotion: anim.current_emotion,
            transition_progress: anim.transition_progress,
            gaze: anim.gaze.gaze,
            face_offset: anim.gaze.face_offset,
            page: core.pages.kind(),
            fps: core.fps.fps(),
            dizzy: anim.dizzy.active,
            cat_mode: core.cat_mode,
            wink_left: anim.wink.left.value,
            wink_right: anim.wink.right.value,
            petting_offset_y: anim.petting.offset_y,
            blinking: anim.blink.is_blinking,
            clock_ms: anim.now_ms(),
            eyes: on_face.then(|| eye_geometry(anim, &core.layout)),
            frames_rendered: core.frames_rendered,
            frames_skipped,
            commands_dropped,
        }
    }

    // ------------------------------------------------------------------
    // Face commands
    // ------------------------------------------------------------------

    pub fn set_emotion(&self, emotion: EmotionId) -> bool {
        tracing::info!(%emotion, "Emotion set");
        self.command("set_emotion", |core| core.set_emotion(emotion))
    }

    /// Unknown names fall back to the eyes-only expression
    pub fn set_emotion_by_name(&self, name: &str) -> bool {
        self.set_emotion(EmotionId::from_name(name))
    }

    /// Look at a point in the unit square (clamped)
    pub fn set_gaze(&self, x: f32, y: f32) -> bool {
        self.command("set_gaze", |core| core.anim.set_gaze(x, y))
    }

    pub fn blink(&self) -> bool {
        self.command("blink", |core| core.anim.blink())
    }

    pub fn set_wink(&self, left: f32, right: f32) -> bool {
        self.command("set_wink", |core| core.anim.set_wink(left, right))
    }

    pub fn poke_eye(&self, eye: Eye) -> bool {
        self.command("poke_eye", |core| core.anim.poke_eye(eye))
    }

    pub fn set_dizzy(&self, active: bool) -> bool {
        self.command("set_dizzy", |core| core.set_dizzy(active))
    }

    pub fn set_cat_mode(&self, enabled: bool) -> bool {
        tracing::info!(enabled, "Cat mode");
        self.command("set_cat_mode", |core| core.set_cat_mode(enabled))
    }

    // ------------------------------------------------------------------
    // Page commands
    // ------------------------------------------------------------------

    pub fn show_text(&self, content: &str, size: FontSize, color: Rgb, background: Rgb) -> bool {
        let state = TextState::new(content, size, color, background);
        self.command("show_text", |core| core.show(Page::Text(state)))
    }

    pub fn show_pixel_art(&self, pixels: &[Pixel], background: Rgb) -> bool {
        let grid = PixelGridState::new(pixels, background);
        self.command("show_pixel_art", |core| core.show(Page::PixelArt(grid)))
    }

    pub fn show_weather(&self, temp_label: &str, icon: WeatherIcon, description: &str) -> bool {
        let state = WeatherState {
            temp_label: temp_label.to_string(),
            icon,
            description: description.to_string(),
        };
        self.command("show_weather", |core| core.show(Page::Weather(state)))
    }

    pub fn show_clock(&self, hour: u32, minute: u32, is_24h: bool, date_label: &str) -> bool {
        self.command("show_clock", |core| {
            let clock = ClockState::new(hour, minute, is_24h, date_label, core.now_ms());
            core.show(Page::Clock(clock));
        })
    }

    pub fn show_timer(&self, minutes: u32, seconds: u32, label: &str, running: bool) -> bool {
        self.command("show_timer", |core| {
            let timer = TimerState::new(minutes, seconds, label, running, core.now_ms());
            core.show(Page::Timer(timer));
        })
    }

    pub fn show_subway(
        &self,
        line_id: &str,
        line_color: Rgb,
        station: &str,
        direction: &str,
        arrivals_minutes: &[u32],
    ) -> bool {
        let state = SubwayState::new(line_id, line_color, station, direction, arrivals_minutes);
        self.command("show_subway", |core| core.show(Page::Subway(state)))
    }

    pub fn show_calendar(&self, events: Vec<CalendarEvent>) -> bool {
        let state = CalendarState::new(events);
        self.command("show_calendar", |core| core.show(Page::Calendar(state)))
    }

    pub fn show_animation(&self, kind: ParticleKind) -> bool {
        self.command("show_animation", |core| {
            let (w, h) = (core.layout.width as u16, core.layout.height as u16);
            let system = ParticleSystemState::new(kind, w, h, &mut core.rng);
            core.show(Page::Animation(system));
        })
    }

    /// Resume the countdown (timer page only)
    pub fn timer_start(&self) -> bool {
        self.command("timer_start", |core| {
            let now = core.now_ms();
            match core.pages.timer_mut() {
                Some(timer) => timer.start(now),
                None => tracing::debug!("timer_start ignored, timer page not active"),
            }
        })
    }

    /// Pause the countdown (timer page only)
    pub fn timer_pause(&self) -> bool {
        self.command("timer_pause", |core| match core.pages.timer_mut() {
            Some(timer) => timer.pause(),
            None => tracing::debug!("timer_pause ignored, timer page not active"),
        })
    }

    /// Reset to `minutes:00`, paused, showing the timer page
    pub fn timer_reset(&self, minutes: u32) -> bool {
        self.command("timer_reset", |core| {
            let now = core.now_ms();
            if let Some(timer) = core.pages.timer_mut() {
                timer.reset(minutes, now);
                return;
            }
            let mut timer = TimerState::new(minutes, 0, "", false, now);
            timer.reset(minutes, now);
            core.show(Page::Timer(timer));
        })
    }

    /// Return to the face with a full redraw
    pub fn clear_display(&self) -> bool {
        self.command("clear_display", EngineCore::clear_display)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Which eye (if any) is under a display point; face page only
    #[must_use]
    pub fn hit_test_eye(&self, x: f32, y: f32) -> Option<Eye> {
        let status = self.shared.status.read();
        if status.page != DisplayPage::Face {
            return None;
        }
        status
            .eyes
            .and_then(|eyes| eyes.into_iter().find(|eye| eye.hit(x, y)))
            .map(|eye| eye.eye)
    }

    /// Shake makes the face dizzy, but only while it is showing
    pub fn on_shake(&self, intensity: f32) -> bool {
        tracing::debug!(intensity, "Shake");
        self.command("on_shake", |core| {
            if core.pages.is_face() {
                core.set_dizzy(true);
            }
        })
    }

    /// Touch panel sample in display pixels
    pub fn touch(&self, pressed: bool, x: f32, y: f32) -> bool {
        self.command("touch", |core| core.touch(pressed, x, y))
    }

    /// Dispatch one input event
    pub fn handle_input(&self, event: InputEvent) -> bool {
        match event {
            InputEvent::Touch { pressed, x, y } => self.touch(pressed, x, y),
            InputEvent::Shake { intensity } => self.on_shake(intensity),
            InputEvent::Command(cmd) => self.apply(cmd),
        }
    }

    /// Apply a wire command
    pub fn apply(&self, cmd: Command) -> bool {
        tracing::debug!(cmd = cmd.name(), "Applying command");
        match cmd {
            Command::Emotion { value } => self.set_emotion_by_name(&value),
            Command::Gaze { x, y } => self.set_gaze(x, y),
            Command::Text {
                content,
                size,
                color: fg,
                bg,
            } => self.show_text(
                &content,
                size.as_deref().map_or(FontSize::Medium, FontSize::from_name),
                command::color_or(fg.as_ref(), color::TEXT_DEFAULT),
                command::color_or(bg.as_ref(), color::BACKGROUND),
            ),
            Command::TextClear | Command::PixelArtClear | Command::ClearDisplay => {
                self.clear_display()
            }
            Command::PixelArt { pixels, bg } => self.show_pixel_art(
                &command::decode_pixels(&pixels),
                command::color_or(bg.as_ref(), color::BACKGROUND),
            ),
            Command::Weather { temp, icon, desc } => {
                self.show_weather(&temp, WeatherIcon::from_name(&icon), &desc)
            }
            Command::Timer {
                minutes,
                seconds,
                label,
                running,
            } => self.show_timer(minutes, seconds, &label, running),
            Command::Clock {
                hours,
                minutes,
                is_24h,
                date,
            } => self.show_clock(hours, minutes, is_24h, &date),
            Command::Animation { kind } => self.show_animation(ParticleKind::from_name(&kind)),
            Command::Subway {
                line,
                color: line_color,
                station,
                direction,
                times,
            } => self.show_subway(
                &line,
                command::subway_color(line_color.as_ref()),
                &station,
                &direction,
                &times,
            ),
            Command::Calendar { events } => self.show_calendar(command::decode_events(&events)),
            Command::TimerStart => self.timer_start(),
            Command::TimerPause => self.timer_pause(),
            Command::TimerReset { minutes } => self.timer_reset(minutes),
            Command::Blink => self.blink(),
            Command::Dizzy { value } => self.set_dizzy(value),
            Command::CatMode { value } => self.set_cat_mode(value),
            Command::Unknown => {
                tracing::debug!("Ignoring unknown command");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Copy of everything queryable
    #[must_use]
    pub fn snapshot(&self) -> EngineStatus {
        let mut status = self.shared.status.read().clone();
        status.frames_skipped = self.shared.frames_skipped.load(Ordering::Relaxed);
        status.commands_dropped = self.shared.commands_dropped.load(Ordering::Relaxed);
        status
    }

    #[must_use]
    pub fn emotion(&self) -> EmotionId {
        self.shared.status.read().emotion
    }

    #[must_use]
    pub fn gaze(&self) -> (f32, f32) {
        let gaze = self.shared.status.read().gaze;
        (gaze.x, gaze.y)
    }

    #[must_use]
    pub fn page(&self) -> DisplayPage {
        self.shared.status.read().page
    }

    #[must_use]
    pub fn fps(&self) -> f32 {
        self.shared.status.read().fps
    }

    #[must_use]
    pub fn is_dizzy(&self) -> bool {
        self.shared.status.read().dizzy
    }

    #[must_use]
    pub fn is_cat_mode(&self) -> bool {
        self.shared.status.read().cat_mode
    }

    /// Run `f` with the state lock held (blocks until acquired)
    ///
    /// Meant for hosts that need to pause rendering briefly, e.g. while the
    /// display is reconfigured. Frames and commands issued meanwhile are
    /// skipped or dropped.
    pub fn with_display_paused<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.shared.core.lock();
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ImmediateRenderer, RecordingCanvas, RecordingHost, RetainedRenderer};
    use pretty_assertions::assert_eq;

    fn config() -> EngineConfig {
        EngineConfig {
            rng_seed: Some(7),
            ..EngineConfig::default()
        }
    }

    fn engine() -> Engine {
        Engine::new(config(), ImmediateRenderer::new(RecordingCanvas::new())).unwrap()
    }

    fn run(engine: &Engine, ticks: usize) {
        for _ in 0..ticks {
            assert!(engine.tick(0.05));
        }
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        assert_eq!(engine.emotion(), EmotionId::Neutral);
        assert_eq!(engine.page(), DisplayPage::Face);
        assert_eq!(engine.gaze(), (0.5, 0.5));
        assert!(!engine.is_dizzy());
        assert!(!engine.is_cat_mode());
    }

    #[test]
    fn test_cat_mode_config() {
        let engine = Engine::new(
            EngineConfig {
                cat_mode: true,
                ..config()
            },
            ImmediateRenderer::new(RecordingCanvas::new()),
        )
        .unwrap();
        assert_eq!(engine.emotion(), EmotionId::Cat);
        assert!(engine.is_cat_mode());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Engine::new(
            EngineConfig {
                height: 0,
                ..config()
            },
            ImmediateRenderer::new(RecordingCanvas::new()),
        );
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_surface_failure_is_fatal() {
        let result = Engine::new(config(), RetainedRenderer::new(RecordingHost::failing("oom")));
        assert!(matches!(
            result,
            Err(EngineError::SurfaceUnavailable { .. })
        ));
    }

    #[test]
    fn test_commands_after_shutdown_are_noops() {
        let engine = engine();
        engine.shutdown();
        assert!(engine.is_shutdown());
        assert!(!engine.set_emotion(EmotionId::Happy));
        assert!(!engine.tick(0.05));
        assert_eq!(engine.emotion(), EmotionId::Neutral);
    }

    #[test]
    fn test_emotion_by_name_falls_back() {
        let engine = engine();
        engine.set_emotion_by_name("bogus");
        assert_eq!(engine.emotion(), EmotionId::EyesOnly);
    }

    #[test]
    fn test_pages_switch_and_clear() {
        let engine = engine();
        engine.show_weather("72°", WeatherIcon::Sunny, "Clear");
        assert_eq!(engine.page(), DisplayPage::Weather);
        assert_eq!(engine.hit_test_eye(0.0, 0.0), None);

        engine.clear_display();
        assert_eq!(engine.page(), DisplayPage::Face);
    }

    #[test]
    fn test_shake_only_on_face() {
        let engine = engine();
        engine.show_clock(9, 30, true, "");
        engine.on_shake(0.8);
        assert!(!engine.is_dizzy());

        engine.clear_display();
        engine.on_shake(0.8);
        assert!(engine.is_dizzy());
        assert_eq!(engine.emotion(), EmotionId::Dizzy);
    }

    #[test]
    fn test_hit_test_finds_eyes() {
        let engine = engine();
        run(&engine, 1);
        let eyes = engine.snapshot().eyes.unwrap();
        let [left, right] = eyes;
        assert_eq!(engine.hit_test_eye(left.cx, left.cy), Some(Eye::Left));
        assert_eq!(engine.hit_test_eye(right.cx, right.cy), Some(Eye::Right));
        assert_eq!(engine.hit_test_eye(left.cx, 400.0), None);
    }

    #[test]
    fn test_touch_on_eye_pokes() {
        let engine = engine();
        run(&engine, 1);
        let [left, _] = engine.snapshot().eyes.unwrap();
        engine.touch(true, left.cx, left.cy);
        let status = engine.snapshot();
        assert!(status.wink_left > 0.0);
        assert_eq!(status.wink_right, 0.0);
        assert_ne!(status.emotion, EmotionId::Cat);
        engine.touch(false, left.cx, left.cy);
    }

    #[test]
    fn test_touch_off_eye_pets() {
        let engine = engine();
        run(&engine, 1);
        engine.touch(true, 251.0, 380.0);
        assert_eq!(engine.emotion(), EmotionId::Cat);
        engine.touch(true, 251.0, 430.0);
        run(&engine, 5);
        assert!(engine.snapshot().petting_offset_y > 0.0);

        engine.touch(false, 251.0, 430.0);
        assert_eq!(engine.emotion(), EmotionId::Happy);
    }

    #[test]
    fn test_timer_commands() {
        let engine = engine();
        engine.timer_start();
        assert_eq!(engine.page(), DisplayPage::Face);

        engine.timer_reset(1);
        assert_eq!(engine.page(), DisplayPage::Timer);
        engine.timer_start();
        run(&engine, 40);
        engine.timer_pause();
        run(&engine, 40);
        assert_eq!(engine.page(), DisplayPage::Timer);
    }

    #[test]
    fn test_apply_unknown_is_ignored() {
        let engine = engine();
        assert!(!engine.apply(Command::Unknown));
        assert_eq!(engine.page(), DisplayPage::Face);
    }

    #[test]
    fn test_cat_mode_toggle() {
        let engine = engine();
        engine.set_cat_mode(true);
        assert_eq!(engine.emotion(), EmotionId::Cat);
        engine.set_cat_mode(false);
        assert_eq!(engine.emotion(), EmotionId::Neutral);
        assert!(!engine.is_cat_mode());
    }

    #[test]
    fn test_fps_is_reported() {
        let engine = engine();
        run(&engine, 21);
        assert!((engine.fps() - 20.0).abs() < 0.5);
    }
}

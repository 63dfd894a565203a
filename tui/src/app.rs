//! Main Application
//!
//! The App struct runs the terminal preview as a thin client of the engine:
//! - Event loop (keyboard, mouse)
//! - Engine + Scheduler running on their own task
//! - Raster copied into the terminal at the draw rate
//!
//! Keys stand in for the device's inputs: digits pick an expression, arrows
//! move the gaze, letters bring up pages, the mouse is the touch panel and
//! `s` shakes the device. `:` opens a prompt that accepts raw JSON commands.

use std::io;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use parking_lot::Mutex;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::Terminal;
use tokio::task::JoinHandle;

use luna_face_core::pages::CalendarEvent;
use luna_face_core::{
    EmotionId, Engine, EngineConfig, FontSize, ImmediateRenderer, InputSender, Pixel, Rgb,
    Scheduler, WeatherIcon,
};

use crate::canvas::{Raster, RasterView, TerminalCanvas, Viewport};
use crate::theme;

/// Rows kept for the status line
const STATUS_HEIGHT: u16 = 1;

/// Terminal redraw period
const DRAW_PERIOD: Duration = Duration::from_millis(50);

/// Gaze step per arrow key press
const GAZE_STEP: f32 = 0.1;

const WEATHER_DEMO: &[(&str, &str, &str)] = &[
    ("72°", "sunny", "Clear skies"),
    ("61°", "partly_cloudy", "Partly cloudy"),
    ("55°", "rainy", "Showers"),
    ("28°", "snowy", "Flurries"),
    ("66°", "stormy", "Thunderstorms"),
    ("50°", "foggy", "Fog"),
];

const ANIMATION_DEMO: &[&str] = &["rain", "snow", "stars", "matrix"];

/// 12x16 heart for the pixel art page
const HEART: &[&str] = &[
    "............",
    "............",
    "............",
    "..XX....XX..",
    ".XXXX..XXXX.",
    "XXXXXXXXXXXX",
    "XXXXXXXXXXXX",
    "XXXXXXXXXXXX",
    ".XXXXXXXXXX.",
    "..XXXXXXXX..",
    "...XXXXXX...",
    "....XXXX....",
    ".....XX.....",
];

/// Keyboard focus
#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Typing a JSON command
    Prompt(String),
}

/// Main application state
pub struct App {
    // === Core State ===
    running: bool,

    // === Engine ===
    engine: Engine,
    input: InputSender,
    scheduler: Option<JoinHandle<()>>,
    raster: Arc<Mutex<Raster>>,
    viewport: Viewport,

    // === Input State ===
    mode: Mode,
    /// Left button currently down on the preview
    touching: bool,
    last_error: Option<String>,

    // === Demo cycling ===
    weather_idx: usize,
    animation_idx: usize,
}

impl App {
    /// Start an engine sized to the current terminal
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        let (cols, rows) = crossterm::terminal::size()?;
        let canvas = TerminalCanvas::new(cols, rows.saturating_sub(STATUS_HEIGHT));
        let raster = canvas.front();
        let viewport = Viewport::new(
            cols,
            rows.saturating_sub(STATUS_HEIGHT),
            config.width,
            config.height,
        );

        let engine = Engine::new(config, ImmediateRenderer::new(canvas))?;
        let (scheduler, input) = Scheduler::new(engine.clone());
        let scheduler = scheduler.spawn();

        tracing::info!(cols, rows, "Preview started");

        Ok(Self {
            running: true,
            engine,
            input,
            scheduler: Some(scheduler),
            raster,
            viewport,
            mode: Mode::Normal,
            touching: false,
            last_error: None,
            weather_idx: 0,
            animation_idx: 0,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut redraw = tokio::time::interval(DRAW_PERIOD);

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                _ = redraw.tick() => {
                    self.render(terminal)?;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn shutdown(&mut self) {
        self.engine.shutdown();
        if let Some(handle) = self.scheduler.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Render loop ended abnormally");
            }
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        if let Mode::Prompt(buffer) = &mut self.mode {
            match key.code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Enter => {
                    let json = std::mem::take(buffer);
                    self.mode = Mode::Normal;
                    self.submit_json(&json);
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            // Quit
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            KeyCode::Char(':') => {
                self.last_error = None;
                self.mode = Mode::Prompt(String::new());
            }

            // Expressions
            KeyCode::Char(d @ '0'..='9') => {
                let index = d.to_digit(10).unwrap_or(0) as usize;
                self.engine.set_emotion(EmotionId::from_index(index));
            }
            KeyCode::Char('z') => {
                self.engine.set_dizzy(!self.engine.is_dizzy());
            }
            KeyCode::Char('c') => {
                self.engine.set_cat_mode(!self.engine.is_cat_mode());
            }
            KeyCode::Char('b') => {
                self.engine.blink();
            }
            KeyCode::Char('s') => {
                self.input.shake(1.0);
            }

            // Gaze
            KeyCode::Left => self.nudge_gaze(-GAZE_STEP, 0.0),
            KeyCode::Right => self.nudge_gaze(GAZE_STEP, 0.0),
            KeyCode::Up => self.nudge_gaze(0.0, -GAZE_STEP),
            KeyCode::Down => self.nudge_gaze(0.0, GAZE_STEP),

            // Pages
            KeyCode::Char('x') => {
                self.engine.clear_display();
            }
            KeyCode::Char('m') => {
                self.engine.show_text(
                    "Hello! I'm Luna.",
                    FontSize::Large,
                    Rgb::WHITE,
                    luna_face_core::color::BACKGROUND,
                );
            }
            KeyCode::Char('i') => {
                self.engine
                    .show_pixel_art(&heart_pixels(), luna_face_core::color::BACKGROUND);
            }
            KeyCode::Char('w') => {
                let (temp, icon, desc) = WEATHER_DEMO[self.weather_idx % WEATHER_DEMO.len()];
                self.weather_idx += 1;
                self.engine
                    .show_weather(temp, WeatherIcon::from_name(icon), desc);
            }
            KeyCode::Char('k') => {
                let (hour, minute) = utc_now();
                self.engine.show_clock(hour, minute, true, "UTC");
            }
            KeyCode::Char('t') => {
                self.engine.show_timer(25, 0, "Focus", true);
            }
            KeyCode::Char('p') => {
                self.engine.timer_pause();
            }
            KeyCode::Char('o') => {
                self.engine.timer_start();
            }
            KeyCode::Char('r') => {
                self.engine.timer_reset(25);
            }
            KeyCode::Char('g') => {
                self.engine.show_subway(
                    "A",
                    luna_face_core::color::SUBWAY_DEFAULT,
                    "Jay St-MetroTech",
                    "Uptown",
                    &[2, 9, 16],
                );
            }
            KeyCode::Char('l') => {
                self.engine.show_calendar(demo_events());
            }
            KeyCode::Char('a') => {
                let kind = ANIMATION_DEMO[self.animation_idx % ANIMATION_DEMO.len()];
                self.animation_idx += 1;
                self.input.command_json(&format!(r#"{{"cmd":"animation","type":"{kind}"}}"#));
            }

            _ => {}
        }
    }

    /// The mouse plays the touch panel
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.row >= self.viewport.rows || mouse.column >= self.viewport.cols {
            if self.touching {
                self.touching = false;
                self.input.touch(false, 0.0, 0.0);
            }
            return;
        }
        let (x, y) = self.viewport.cell_to_display(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                self.touching = true;
                self.input.touch(true, x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.touching = false;
                self.input.touch(false, x, y);
            }
            _ => {}
        }
    }

    fn nudge_gaze(&self, dx: f32, dy: f32) {
        let (x, y) = self.engine.gaze();
        self.engine.set_gaze(x + dx, y + dy);
    }

    fn submit_json(&mut self, json: &str) {
        if json.trim().is_empty() {
            return;
        }
        match luna_face_core::Command::parse(json) {
            Ok(command) => {
                self.input.command(command);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected prompt command");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let raster = self.raster.lock().clone();
        terminal.draw(|frame| {
            let area = frame.area();
            let preview = Rect::new(
                area.x,
                area.y,
                area.width,
                area.height.saturating_sub(STATUS_HEIGHT),
            );
            let status = Rect::new(
                area.x,
                area.y + preview.height,
                area.width,
                area.height.min(STATUS_HEIGHT),
            );
            frame.render_widget(RasterView::new(&raster), preview);
            self.render_status(frame.buffer_mut(), status);
        })?;
        Ok(())
    }

    /// Status line: page, expression, flags, fps, counters, key hints
    fn render_status(&self, buf: &mut Buffer, area: Rect) {
        if area.height == 0 {
            return;
        }
        let base = Style::default().bg(theme::STATUS_BG);
        buf.set_style(area, base);

        if let Mode::Prompt(text) = &self.mode {
            buf.set_string(area.x, area.y, format!(":{text}_"), base.fg(theme::PROMPT));
            return;
        }
        if let Some(error) = &self.last_error {
            buf.set_string(area.x, area.y, error, base.fg(theme::ERROR_RED));
            return;
        }

        let status = self.engine.snapshot();
        let mut x = area.x;
        let mut put = |text: String, style: Style| {
            buf.set_string(x, area.y, &text, style);
            x = x.saturating_add(text.chars().count() as u16 + 1);
        };
        put(format!(" {}", status.page), base.fg(theme::STATUS_ACCENT));
        put(status.emotion.to_string(), base.fg(theme::STATUS_ACCENT));
        if status.dizzy {
            put("dizzy".to_string(), base.fg(theme::STATUS_FLAG));
        }
        if status.cat_mode {
            put("cat".to_string(), base.fg(theme::STATUS_FLAG));
        }
        put(format!("{:.0} fps", status.fps), base.fg(theme::STATUS_DIM));
        if status.frames_skipped > 0 || status.commands_dropped > 0 {
            put(
                format!(
                    "skipped {} dropped {}",
                    status.frames_skipped, status.commands_dropped
                ),
                base.fg(theme::STATUS_DIM),
            );
        }
        put(
            KEY_HINTS.to_string(),
            base.fg(theme::STATUS_DIM),
        );
    }
}

fn heart_pixels() -> Vec<Pixel> {
    let red = Rgb::new(230, 50, 80);
    HEART
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'X')
                .map(move |(x, _)| Pixel {
                    x: x as u8,
                    y: y as u8,
                    color: red,
                })
        })
        .collect()
}

fn demo_events() -> Vec<CalendarEvent> {
    [
        ("09:30", "Standup", "Room 4"),
        ("12:00", "Lunch with Sam", ""),
        ("15:00", "Design review", "Zoom"),
    ]
    .into_iter()
    .map(|(time, title, location)| CalendarEvent {
        time_label: time.to_string(),
        title: title.to_string(),
        location: location.to_string(),
    })
    .collect()
}

/// Wall-clock hour and minute (UTC)
const KEY_HINTS: &str =
    "| 0-9 mood  arrows gaze  m i w k t g l a pages  o/p/r timer  x face  : json  q quit";

fn utc_now() -> (u32, u32) {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let day = secs % 86_400;
    ((day / 3600) as u32, ((day % 3600) / 60) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heart_fits_grid() {
        let pixels = heart_pixels();
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|p| p.x < 12 && p.y < 16));
        assert_eq!(pixels.iter().filter(|p| p.y == 12).count(), 2);
    }

    #[test]
    fn test_demo_events_fit_calendar() {
        assert_eq!(demo_events().len(), 3);
    }

    #[test]
    fn test_utc_now_in_range() {
        let (hour, minute) = utc_now();
        assert!(hour < 24);
        assert!(minute < 60);
    }
}

//! Luna Face Core - Headless Animated Face Engine
//!
//! This crate animates an expressive face on a small display and switches
//! between the face and a set of full-screen information pages (text, pixel
//! art, weather, clock, timer, transit arrivals, calendar, particles). It has
//! no idea what the display actually is: drawing goes through a [`Renderer`],
//! and input arrives as [`InputEvent`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Touch panel   Accelerometer   Network (JSON commands)       │
//! │       └──────────────┴──────────────┘                        │
//! │                      │ InputEvent                            │
//! │              ┌───────┴────────┐                              │
//! │              │   Scheduler    │  tokio interval, select!     │
//! │              └───────┬────────┘                              │
//! │                      │ tick(dt) / handle_input               │
//! │  ┌───────────────────┴────────────────────────────────────┐  │
//! │  │ Engine (one lock, short timeouts)                      │  │
//! │  │  AnimationState   PageRegistry   FaceLayout   StdRng   │  │
//! │  └───────────────────┬────────────────────────────────────┘  │
//! │                      │ Frame (keyed shapes)                  │
//! │          ┌───────────┴────────────┐                          │
//! │   RetainedRenderer          ImmediateRenderer                │
//! │   (WidgetHost)              (Canvas)                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Engine`]: handle to the face; every command and query lives here
//! - [`Scheduler`]: drives frames at the configured period
//! - [`EmotionId`]: the eleven expressions
//! - [`Page`] / [`DisplayPage`]: what fills the screen
//! - [`Command`]: the JSON wire protocol
//! - [`Frame`] / [`Shape`]: the scene handed to renderers
//!
//! # Quick Start
//!
//! ```ignore
//! use luna_face_core::{
//!     load_config, Engine, EmotionId, RecordingCanvas, ImmediateRenderer, Scheduler,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let engine = Engine::new(config, ImmediateRenderer::new(RecordingCanvas::new()))?;
//!     let (scheduler, input) = Scheduler::new(engine.clone());
//!     let handle = scheduler.spawn();
//!
//!     engine.set_emotion(EmotionId::Happy);
//!     input.command_json(r#"{"cmd":"timer","minutes":25,"label":"Focus"}"#);
//!
//!     engine.shutdown();
//!     handle.await?;
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod color;
pub mod command;
pub mod config;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod input;
pub mod pages;
pub mod render;
pub mod scene;
pub mod scheduler;

pub use animation::{AnimationState, Eye, Vec2};
pub use color::Rgb;
pub use command::Command;
pub use config::{load_config, load_config_from_path, AnimationTuning, EngineConfig};
pub use emotion::{EmotionId, EmotionParameters};
pub use engine::{Engine, EngineStatus};
pub use error::{ConfigError, EngineError, EngineResult};
pub use input::{input_channel, InputEvent, InputReceiver, InputSender};
pub use pages::{
    CalendarEvent, DisplayPage, FontSize, Page, ParticleKind, Pixel, WeatherIcon,
};
pub use render::{
    Canvas, Frame, ImmediateRenderer, RecordingCanvas, RecordingHost, Renderer,
    RetainedRenderer, Shape, TextAlign, WidgetHost,
};
pub use scene::FaceLayout;
pub use scheduler::{FpsCounter, FrameClock, Scheduler};

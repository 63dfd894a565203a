//! Luna TUI - Terminal preview for the Luna face engine
//!
//! Runs the real engine against a terminal instead of the device panel, so
//! expressions, pages and gestures can be tried without hardware.
//!
//! # Architecture
//!
//! - **Canvas**: half-block rasterizer implementing the engine's `Canvas`
//! - **App**: event loop mapping keys and mouse to engine input
//! - **Theme**: status line colours

pub mod app;
pub mod canvas;
pub mod theme;

pub use app::App;

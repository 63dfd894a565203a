//! Immediate-mode backend: clear and redraw every frame

use crate::color::{self, Rgb};
use crate::error::{EngineError, EngineResult};

use super::{Frame, Renderer, Shape};

/// A pixel surface that can draw primitives
pub trait Canvas: Send {
    /// Allocate the surface
    ///
    /// # Errors
    ///
    /// Returns a backend-specific reason when the surface cannot be created.
    fn init(&mut self, width: u16, height: u16) -> Result<(), String>;

    /// Fill the whole surface
    fn clear(&mut self, color: Rgb);

    /// Draw one primitive on top of what is there
    fn draw(&mut self, key: &str, shape: &Shape);

    /// Make the drawing visible
    fn flush(&mut self);
}

/// Full-redraw renderer over a [`Canvas`]
#[derive(Debug)]
pub struct ImmediateRenderer<C: Canvas> {
    canvas: C,
    background: Rgb,
    frames: u64,
}

impl<C: Canvas> ImmediateRenderer<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            background: color::BACKGROUND,
            frames: 0,
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Frames presented so far
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<C: Canvas> Renderer for ImmediateRenderer<C> {
    fn prepare(&mut self, width: u16, height: u16) -> EngineResult<()> {
        self.canvas
            .init(width, height)
            .map_err(|reason| EngineError::SurfaceUnavailable {
                width,
                height,
                reason,
            })?;
        self.canvas.clear(self.background);
        self.canvas.flush();
        Ok(())
    }

    fn present(&mut self, frame: &Frame) {
        self.background = frame.background;
        self.canvas.clear(frame.background);
        for (key, shape) in &frame.items {
            self.canvas.draw(key, shape);
        }
        self.canvas.flush();
        self.frames += 1;
    }

    fn hide_all(&mut self) {
        self.canvas.clear(self.background);
        self.canvas.flush();
    }

    fn invalidate(&mut self) {}
}

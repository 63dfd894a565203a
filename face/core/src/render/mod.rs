//! Rendering
//!
//! The engine describes each draw as a [`Frame`]: a background colour plus a
//! list of keyed [`Shape`]s. A [`Renderer`] turns frames into pixels on the
//! host graphics layer.
//!
//! Two backends implement the same contract:
//!
//! - [`ImmediateRenderer`] clears and redraws everything on a [`Canvas`]
//!   every frame.
//! - [`RetainedRenderer`] keeps one widget per key on a [`WidgetHost`] and
//!   only pushes geometry that changed, hiding widgets a frame leaves out.
//!
//! Both are driven by the same scene composition, so animation and timing
//! never depend on which backend is plugged in.

mod immediate;
mod recording;
mod retained;

pub use immediate::{Canvas, ImmediateRenderer};
pub use recording::{CanvasOp, RecordingCanvas, RecordingHost};
pub use retained::{PushStats, RetainedRenderer, WidgetHost};

use crate::color::Rgb;
use crate::error::EngineResult;

/// Horizontal text anchoring
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// A drawing primitive in display pixels
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Filled rectangle with rounded corners, `(x, y)` is the top-left corner
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: Rgb,
    },
    /// Filled circle
    Circle { cx: f32, cy: f32, radius: f32, color: Rgb },
    /// Stroked arc, angles in degrees clockwise from 3 o'clock
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start_deg: f32,
        end_deg: f32,
        width: f32,
        color: Rgb,
    },
    /// Stroked line segment
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    /// Single line of text anchored at `(x, y)` (vertical centre)
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
        color: Rgb,
        align: TextAlign,
    },
    /// Ellipse outline
    Ring {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        thickness: f32,
        color: Rgb,
    },
}

/// One draw of the active page
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub background: Rgb,
    pub items: Vec<(String, Shape)>,
}

impl Frame {
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, shape: Shape) {
        self.items.push((key.into(), shape));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Shape> {
        self.items.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Turns frames into visible output on the host graphics layer
pub trait Renderer: Send {
    /// Acquire the drawing surface
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SurfaceUnavailable`](crate::EngineError::SurfaceUnavailable)
    /// when the host cannot provide a surface of this size.
    fn prepare(&mut self, width: u16, height: u16) -> EngineResult<()>;

    /// Draw a frame
    fn present(&mut self, frame: &Frame);

    /// Remove every visible element
    fn hide_all(&mut self);

    /// Forget cached geometry so the next frame is a full rebuild
    fn invalidate(&mut self);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn prepare(&mut self, width: u16, height: u16) -> EngineResult<()> {
        (**self).prepare(width, height)
    }

    fn present(&mut self, frame: &Frame) {
        (**self).present(frame);
    }

    fn hide_all(&mut self) {
        (**self).hide_all();
    }

    fn invalidate(&mut self) {
        (**self).invalidate();
    }
}

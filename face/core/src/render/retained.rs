//! Retained-mode backend: one widget per shape key
//!
//! Widgets are created the first time a key appears and then only receive
//! updates when their geometry changes. Keys a frame leaves out are hidden,
//! not destroyed, so a page coming back reuses its widgets.
//!
//! # Full rebuilds
//!
//! The cache starts dirty. After [`Renderer::invalidate`] the next frame
//! pushes every shape again regardless of what the cache says.

use std::collections::{HashMap, HashSet};

use crate::color::Rgb;
use crate::error::{EngineError, EngineResult};

use super::{Frame, Renderer, Shape};

/// A host UI toolkit that owns positioned widgets
pub trait WidgetHost: Send {
    /// Create the screen
    ///
    /// # Errors
    ///
    /// Returns a backend-specific reason when the screen cannot be created.
    fn init(&mut self, width: u16, height: u16) -> Result<(), String>;

    fn set_background(&mut self, color: Rgb);

    /// Create a widget for `key`, initially visible
    fn create(&mut self, key: &str, shape: &Shape);

    /// Move, resize or restyle an existing widget
    fn update(&mut self, key: &str, shape: &Shape);

    fn set_visible(&mut self, key: &str, visible: bool);
}

/// Counts of host calls made by the last [`Renderer::present`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PushStats {
    pub created: usize,
    pub updated: usize,
    pub shown: usize,
    pub hidden: usize,
}

impl PushStats {
    /// Total host calls
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.shown + self.hidden
    }
}

#[derive(Debug)]
struct CachedWidget {
    shape: Shape,
    visible: bool,
}

/// Delta-tracking renderer over a [`WidgetHost`]
#[derive(Debug)]
pub struct RetainedRenderer<H: WidgetHost> {
    host: H,
    widgets: HashMap<String, CachedWidget>,
    background: Option<Rgb>,
    /// Every widget is stale (start-up, invalidation)
    full_dirty: bool,
    last_push: PushStats,
}

impl<H: WidgetHost> RetainedRenderer<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            widgets: HashMap::new(),
            background: None,
            full_dirty: true,
            last_push: PushStats::default(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host calls made by the last frame
    #[must_use]
    pub fn last_push(&self) -> PushStats {
        self.last_push
    }

    /// Whether the next frame will be a full rebuild
    #[must_use]
    pub fn is_full_dirty(&self) -> bool {
        self.full_dirty
    }

    /// Number of widgets created so far
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }
}

impl<H: WidgetHost> Renderer for RetainedRenderer<H> {
    fn prepare(&mut self, width: u16, height: u16) -> EngineResult<()> {
        self.host
            .init(width, height)
            .map_err(|reason| EngineError::SurfaceUnavailable {
                width,
                height,
                reason,
            })
    }

    fn present(&mut self, frame: &Frame) {
        let mut stats = PushStats::default();
        let rebuild = self.full_dirty;

        if rebuild || self.background != Some(frame.background) {
            self.host.set_background(frame.background);
            self.background = Some(frame.background);
        }

        let mut seen = HashSet::with_capacity(frame.items.len());
        for (key, shape) in &frame.items {
            seen.insert(key.as_str());
            match self.widgets.get_mut(key) {
                None => {
                    self.host.create(key, shape);
                    self.widgets.insert(
                        key.clone(),
                        CachedWidget {
                            shape: shape.clone(),
                            visible: true,
                        },
                    );
                    stats.created += 1;
                }
                Some(widget) => {
                    if rebuild || widget.shape != *shape {
                        self.host.update(key, shape);
                        widget.shape = shape.clone();
                        stats.updated += 1;
                    }
                    if !widget.visible {
                        self.host.set_visible(key, true);
                        widget.visible = true;
                        stats.shown += 1;
                    }
                }
            }
        }

        for (key, widget) in &mut self.widgets {
            if widget.visible && !seen.contains(key.as_str()) {
                self.host.set_visible(key, false);
                widget.visible = false;
                stats.hidden += 1;
            }
        }

        self.full_dirty = false;
        self.last_push = stats;
    }

    fn hide_all(&mut self) {
        for (key, widget) in &mut self.widgets {
            if widget.visible {
                self.host.set_visible(key, false);
                widget.visible = false;
            }
        }
    }

    fn invalidate(&mut self) {
        self.full_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingHost;
    use pretty_assertions::assert_eq;

    fn eye(x: f32) -> Shape {
        Shape::RoundedRect {
            x,
            y: 10.0,
            width: 40.0,
            height: 60.0,
            radius: 15.0,
            color: Rgb::WHITE,
        }
    }

    fn renderer() -> (RetainedRenderer<RecordingHost>, RecordingHost) {
        let host = RecordingHost::new();
        let handle = host.clone();
        let mut renderer = RetainedRenderer::new(host);
        renderer.prepare(502, 410).unwrap();
        (renderer, handle)
    }

    #[test]
    fn test_unchanged_frame_pushes_nothing() {
        let (mut renderer, _) = renderer();
        let mut frame = Frame::new(Rgb::BLACK);
        frame.push("eye.left", eye(10.0));
        frame.push("eye.right", eye(100.0));

        renderer.present(&frame);
        assert_eq!(renderer.last_push().created, 2);

        renderer.present(&frame);
        assert_eq!(renderer.last_push(), PushStats::default());
    }

    #[test]
    fn test_only_changed_widgets_update() {
        let (mut renderer, _) = renderer();
        let mut frame = Frame::new(Rgb::BLACK);
        frame.push("eye.left", eye(10.0));
        frame.push("eye.right", eye(100.0));
        renderer.present(&frame);

        let mut moved = Frame::new(Rgb::BLACK);
        moved.push("eye.left", eye(12.0));
        moved.push("eye.right", eye(100.0));
        renderer.present(&moved);
        assert_eq!(renderer.last_push().updated, 1);
        assert_eq!(renderer.last_push().total(), 1);
    }

    #[test]
    fn test_missing_keys_are_hidden_and_return() {
        let (mut renderer, host) = renderer();
        let mut both = Frame::new(Rgb::BLACK);
        both.push("mouth.line", eye(0.0));
        both.push("eye.left", eye(10.0));
        renderer.present(&both);

        let mut eyes_only = Frame::new(Rgb::BLACK);
        eyes_only.push("eye.left", eye(10.0));
        renderer.present(&eyes_only);
        assert_eq!(renderer.last_push().hidden, 1);
        assert_eq!(host.visible_keys(), vec!["eye.left".to_string()]);

        renderer.present(&both);
        assert_eq!(renderer.last_push().shown, 1);
        assert_eq!(renderer.widget_count(), 2);
    }

    #[test]
    fn test_invalidate_forces_full_rebuild() {
        let (mut renderer, _) = renderer();
        let mut frame = Frame::new(Rgb::BLACK);
        frame.push("eye.left", eye(10.0));
        frame.push("eye.right", eye(100.0));
        renderer.present(&frame);
        assert!(!renderer.is_full_dirty());

        renderer.invalidate();
        assert!(renderer.is_full_dirty());
        renderer.present(&frame);
        assert_eq!(renderer.last_push().updated, 2);
    }

    #[test]
    fn test_hide_all() {
        let (mut renderer, host) = renderer();
        let mut frame = Frame::new(Rgb::BLACK);
        frame.push("eye.left", eye(10.0));
        renderer.present(&frame);
        renderer.hide_all();
        assert!(host.visible_keys().is_empty());
    }
}

//! In-memory backends that record what they were asked to draw
//!
//! Clones share the same log, so a test can hand one clone to the engine and
//! inspect the other. Also usable as a headless surface.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::color::Rgb;

use super::{Canvas, Shape, WidgetHost};

/// One call made on a [`RecordingCanvas`]
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Clear(Rgb),
    Draw(String, Shape),
    Flush,
}

#[derive(Debug, Default)]
struct CanvasLog {
    ops: Vec<CanvasOp>,
    size: Option<(u16, u16)>,
}

/// [`Canvas`] that records every operation
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    log: Arc<Mutex<CanvasLog>>,
    fail_reason: Option<String>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose `init` always fails
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_reason: Some(reason.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ops(&self) -> Vec<CanvasOp> {
        self.log.lock().ops.clone()
    }

    #[must_use]
    pub fn size(&self) -> Option<(u16, u16)> {
        self.log.lock().size
    }

    /// Number of `Draw` operations so far
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.log
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::Draw(..)))
            .count()
    }

    /// Keys drawn since the last clear, i.e. what is on screen now
    #[must_use]
    pub fn visible_keys(&self) -> Vec<String> {
        let log = self.log.lock();
        let start = log
            .ops
            .iter()
            .rposition(|op| matches!(op, CanvasOp::Clear(_)))
            .map_or(0, |i| i + 1);
        log.ops[start..]
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Draw(key, _) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&self) {
        self.log.lock().ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn init(&mut self, width: u16, height: u16) -> Result<(), String> {
        if let Some(reason) = &self.fail_reason {
            return Err(reason.clone());
        }
        self.log.lock().size = Some((width, height));
        Ok(())
    }

    fn clear(&mut self, color: Rgb) {
        self.log.lock().ops.push(CanvasOp::Clear(color));
    }

    fn draw(&mut self, key: &str, shape: &Shape) {
        self.log
            .lock()
            .ops
            .push(CanvasOp::Draw(key.to_string(), shape.clone()));
    }

    fn flush(&mut self) {
        self.log.lock().ops.push(CanvasOp::Flush);
    }
}

#[derive(Debug, Default)]
struct HostState {
    widgets: BTreeMap<String, (Shape, bool)>,
    background: Option<Rgb>,
    calls: usize,
}

/// [`WidgetHost`] that keeps its widgets in a map
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    state: Arc<Mutex<HostState>>,
    fail_reason: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose `init` always fails
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_reason: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Keys of visible widgets, sorted
    #[must_use]
    pub fn visible_keys(&self) -> Vec<String> {
        self.state
            .lock()
            .widgets
            .iter()
            .filter(|(_, (_, visible))| *visible)
            .map(|(key, _)| key.clone())
            .collect()
    }

    #[must_use]
    pub fn widget(&self, key: &str) -> Option<Shape> {
        self.state.lock().widgets.get(key).map(|(s, _)| s.clone())
    }

    #[must_use]
    pub fn background(&self) -> Option<Rgb> {
        self.state.lock().background
    }

    /// Total create/update/visibility calls received
    #[must_use]
    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }
}

impl WidgetHost for RecordingHost {
    fn init(&mut self, _width: u16, _height: u16) -> Result<(), String> {
        match &self.fail_reason {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }

    fn set_background(&mut self, color: Rgb) {
        self.state.lock().background = Some(color);
    }

    fn create(&mut self, key: &str, shape: &Shape) {
        let mut state = self.state.lock();
        state.calls += 1;
        state.widgets.insert(key.to_string(), (shape.clone(), true));
    }

    fn update(&mut self, key: &str, shape: &Shape) {
        let mut state = self.state.lock();
        state.calls += 1;
        if let Some(entry) = state.widgets.get_mut(key) {
            entry.0 = shape.clone();
        }
    }

    fn set_visible(&mut self, key: &str, visible: bool) {
        let mut state = self.state.lock();
        state.calls += 1;
        if let Some(entry) = state.widgets.get_mut(key) {
            entry.1 = visible;
        }
    }
}

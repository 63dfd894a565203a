//! Terminal Canvas
//!
//! Rasterizes engine shapes into a grid of half-block cells. Each terminal
//! cell holds two vertically stacked "sub-pixels" (drawn as `▀` with the top
//! pixel as foreground and the bottom one as background), so a 100x40 cell
//! area gives a 100x80 preview of the display.
//!
//! # Design
//!
//! The engine owns the [`TerminalCanvas`] (inside its renderer) and draws on
//! the back buffer from the scheduler task. `flush` publishes the back buffer
//! to a shared front [`Raster`] that the draw loop copies into the ratatui
//! buffer. The two sides only meet at that swap.
//!
//! Text is not rasterized: glyphs at this resolution are unreadable, so text
//! shapes are kept as runs and written as real terminal characters on top.

use std::sync::Arc;

use parking_lot::Mutex;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use luna_face_core::{Canvas, Rgb, Shape, TextAlign};

use crate::theme;

/// A text label positioned in cells
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub col: u16,
    pub row: u16,
    pub content: String,
    pub color: Rgb,
}

/// One rasterized frame
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    /// Size in cells
    pub cols: u16,
    pub rows: u16,
    /// `cols * rows * 2` sub-pixels, row-major
    pub pixels: Vec<Rgb>,
    pub texts: Vec<TextRun>,
}

impl Raster {
    fn new(cols: u16, rows: u16, fill: Rgb) -> Self {
        Self {
            cols,
            rows,
            pixels: vec![fill; cols as usize * rows as usize * 2],
            texts: Vec::new(),
        }
    }

    /// Sub-pixel at `(x, sy)` where `sy` counts half-cells
    #[must_use]
    pub fn pixel(&self, x: u16, sy: u16) -> Option<Rgb> {
        if x >= self.cols || sy >= self.rows * 2 {
            return None;
        }
        self.pixels
            .get(sy as usize * self.cols as usize + x as usize)
            .copied()
    }
}

/// Mapping between display pixels and terminal cells
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    /// Display pixels per sub-pixel column
    scale_x: f32,
    /// Display pixels per sub-pixel row
    scale_y: f32,
}

impl Viewport {
    /// `cols` x `rows` cells showing a `width` x `height` display
    #[must_use]
    pub fn new(cols: u16, rows: u16, width: u16, height: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            scale_x: f32::from(width) / f32::from(cols),
            scale_y: f32::from(height) / (f32::from(rows) * 2.0),
        }
    }

    /// Display point under the centre of a terminal cell
    #[must_use]
    pub fn cell_to_display(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (f32::from(col) + 0.5) * self.scale_x,
            (f32::from(row) * 2.0 + 1.0) * self.scale_y,
        )
    }
}

/// [`Canvas`] backed by a half-block raster
#[derive(Clone, Debug)]
pub struct TerminalCanvas {
    back: Raster,
    front: Arc<Mutex<Raster>>,
    viewport: Viewport,
}

impl TerminalCanvas {
    /// Canvas covering `cols` x `rows` terminal cells
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let blank = Raster::new(cols, rows, Rgb::BLACK);
        Self {
            back: blank.clone(),
            front: Arc::new(Mutex::new(blank)),
            viewport: Viewport::new(cols, rows, cols, rows * 2),
        }
    }

    /// Shared handle to the most recently flushed raster
    #[must_use]
    pub fn front(&self) -> Arc<Mutex<Raster>> {
        Arc::clone(&self.front)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fill every sub-pixel whose centre satisfies `inside`
    fn fill<F>(&mut self, bounds: (f32, f32, f32, f32), color: Rgb, inside: F)
    where
        F: Fn(f32, f32) -> bool,
    {
        let (x0, y0, x1, y1) = bounds;
        let (sx, sy) = (self.viewport.scale_x, self.viewport.scale_y);
        let cols = self.back.cols as usize;
        let sub_rows = self.back.rows as usize * 2;

        let first_col = (x0 / sx).floor().max(0.0) as usize;
        let last_col = ((x1 / sx).ceil().max(0.0) as usize).min(cols);
        let first_row = (y0 / sy).floor().max(0.0) as usize;
        let last_row = ((y1 / sy).ceil().max(0.0) as usize).min(sub_rows);

        for row in first_row..last_row {
            let py = (row as f32 + 0.5) * sy;
            for col in first_col..last_col {
                let px = (col as f32 + 0.5) * sx;
                if inside(px, py) {
                    self.back.pixels[row * cols + col] = color;
                }
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, content: &str, color: Rgb, align: TextAlign) {
        let len = content.chars().count() as f32;
        let cell_w = self.viewport.scale_x;
        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - len * cell_w / 2.0,
            TextAlign::Right => x - len * cell_w,
        };
        let col = (left / cell_w).round().max(0.0) as u16;
        let row = (y / (self.viewport.scale_y * 2.0)).floor().max(0.0) as u16;
        if row >= self.back.rows {
            return;
        }
        self.back.texts.push(TextRun {
            col,
            row,
            content: content.to_string(),
            color,
        });
    }
}

impl Canvas for TerminalCanvas {
    fn init(&mut self, width: u16, height: u16) -> Result<(), String> {
        if width == 0 || height == 0 {
            return Err(format!("cannot preview a {width}x{height} display"));
        }
        self.viewport = Viewport::new(self.back.cols, self.back.rows, width, height);
        Ok(())
    }

    fn clear(&mut self, color: Rgb) {
        self.back.pixels.fill(color);
        self.back.texts.clear();
    }

    fn draw(&mut self, _key: &str, shape: &Shape) {
        match *shape {
            Shape::RoundedRect {
                x,
                y,
                width,
                height,
                radius,
                color,
            } => {
                let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
                self.fill((x, y, x + width, y + height), color, |px, py| {
                    inside_rounded_rect(px, py, x, y, width, height, r)
                });
            }
            Shape::Circle {
                cx,
                cy,
                radius,
                color,
            } => {
                self.fill(
                    (cx - radius, cy - radius, cx + radius, cy + radius),
                    color,
                    |px, py| (px - cx).hypot(py - cy) <= radius,
                );
            }
            Shape::Arc {
                cx,
                cy,
                radius,
                start_deg,
                end_deg,
                width,
                color,
            } => {
                let outer = radius + width / 2.0;
                self.fill(
                    (cx - outer, cy - outer, cx + outer, cy + outer),
                    color,
                    |px, py| {
                        let dist = (px - cx).hypot(py - cy);
                        (dist - radius).abs() <= width / 2.0
                            && angle_within(py - cy, px - cx, start_deg, end_deg)
                    },
                );
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                let min_scale = self.viewport.scale_x.min(self.viewport.scale_y);
                let half = (width / 2.0).max(min_scale / 2.0);
                self.fill(
                    (
                        x1.min(x2) - half,
                        y1.min(y2) - half,
                        x1.max(x2) + half,
                        y1.max(y2) + half,
                    ),
                    color,
                    |px, py| segment_distance(px, py, x1, y1, x2, y2) <= half,
                );
            }
            Shape::Ring {
                cx,
                cy,
                rx,
                ry,
                thickness,
                color,
            } => {
                let pad = thickness / 2.0;
                self.fill(
                    (cx - rx - pad, cy - ry - pad, cx + rx + pad, cy + ry + pad),
                    color,
                    |px, py| {
                        if rx <= 0.0 || ry <= 0.0 {
                            return false;
                        }
                        let norm = ((px - cx) / rx).hypot((py - cy) / ry);
                        ((norm - 1.0) * rx.min(ry)).abs() <= pad
                    },
                );
            }
            Shape::Text {
                x,
                y,
                ref content,
                color,
                align,
                ..
            } => self.text(x, y, content, color, align),
        }
    }

    fn flush(&mut self) {
        self.front.lock().clone_from(&self.back);
    }
}

fn inside_rounded_rect(px: f32, py: f32, x: f32, y: f32, w: f32, h: f32, r: f32) -> bool {
    if px < x || py < y || px > x + w || py > y + h {
        return false;
    }
    let nx = px.clamp(x + r, x + w - r);
    let ny = py.clamp(y + r, y + h - r);
    (px - nx).hypot(py - ny) <= r
}

/// Whether the direction `(dy, dx)` lies on the clockwise sweep from `start`
/// to `end` (degrees, 0 = 3 o'clock)
fn angle_within(dy: f32, dx: f32, start: f32, end: f32) -> bool {
    let sweep = end - start;
    if sweep >= 360.0 {
        return true;
    }
    if sweep <= 0.0 {
        return false;
    }
    let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
    (angle - start).rem_euclid(360.0) <= sweep
}

fn segment_distance(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return (px - x1).hypot(py - y1);
    }
    let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
    (px - (x1 + t * dx)).hypot(py - (y1 + t * dy))
}

/// Draws a [`Raster`] with half-block cells
pub struct RasterView<'a> {
    raster: &'a Raster,
}

impl<'a> RasterView<'a> {
    pub fn new(raster: &'a Raster) -> Self {
        Self { raster }
    }
}

impl Widget for RasterView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let raster = self.raster;
        let cols = area.width.min(raster.cols);
        let rows = area.height.min(raster.rows);

        for row in 0..rows {
            for col in 0..cols {
                let (Some(top), Some(bottom)) =
                    (raster.pixel(col, row * 2), raster.pixel(col, row * 2 + 1))
                else {
                    continue;
                };
                let style = Style::default()
                    .fg(theme::to_color(top))
                    .bg(theme::to_color(bottom));
                buf.set_string(area.x + col, area.y + row, "▀", style);
            }
        }

        for run in &raster.texts {
            if run.row >= rows {
                continue;
            }
            let y = area.y + run.row;
            for (i, ch) in run.content.chars().enumerate() {
                let col = run.col.saturating_add(i as u16);
                if col >= cols {
                    break;
                }
                let bg = raster
                    .pixel(col, run.row * 2 + 1)
                    .map_or(ratatui::style::Color::Reset, theme::to_color);
                let style = Style::default().fg(theme::to_color(run.color)).bg(bg);
                buf.set_string(area.x + col, y, ch.to_string(), style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn canvas() -> TerminalCanvas {
        // 1 sub-pixel per 10x10 display pixels
        let mut canvas = TerminalCanvas::new(10, 5);
        canvas.init(100, 100).unwrap();
        canvas.clear(Rgb::BLACK);
        canvas
    }

    #[test]
    fn test_init_rejects_empty_display() {
        let mut canvas = TerminalCanvas::new(10, 5);
        assert!(canvas.init(0, 100).is_err());
    }

    #[test]
    fn test_circle_fills_centre_only() {
        let mut canvas = canvas();
        canvas.draw(
            "dot",
            &Shape::Circle {
                cx: 50.0,
                cy: 50.0,
                radius: 12.0,
                color: RED,
            },
        );
        canvas.flush();
        let raster = canvas.front().lock().clone();
        assert_eq!(raster.pixel(4, 4), Some(RED));
        assert_eq!(raster.pixel(5, 5), Some(RED));
        assert_eq!(raster.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(raster.pixel(9, 9), Some(Rgb::BLACK));
    }

    #[test]
    fn test_arc_sweep() {
        assert!(angle_within(1.0, 0.0, 0.0, 180.0));
        assert!(!angle_within(-1.0, 0.0, 0.0, 180.0));
        assert!(angle_within(-1.0, 0.0, 180.0, 360.0));
        assert!(angle_within(-1.0, 0.0, 270.0, 400.0));
        assert!(!angle_within(1.0, 0.0, 270.0, 270.0));
    }

    #[test]
    fn test_flush_publishes() {
        let mut canvas = canvas();
        let front = canvas.front();
        canvas.clear(RED);
        assert_eq!(front.lock().pixel(0, 0), Some(Rgb::BLACK));
        canvas.flush();
        assert_eq!(front.lock().pixel(0, 0), Some(RED));
    }

    #[test]
    fn test_text_is_centred() {
        let mut canvas = canvas();
        canvas.draw(
            "label",
            &Shape::Text {
                x: 50.0,
                y: 45.0,
                content: "ab".to_string(),
                size: 12.0,
                color: RED,
                align: TextAlign::Center,
            },
        );
        canvas.flush();
        let raster = canvas.front().lock().clone();
        assert_eq!(
            raster.texts,
            vec![TextRun {
                col: 4,
                row: 2,
                content: "ab".to_string(),
                color: RED,
            }]
        );
    }

    #[test]
    fn test_cell_to_display() {
        let viewport = canvas().viewport();
        assert_eq!(viewport, Viewport::new(10, 5, 100, 100));
        assert_eq!(viewport.cell_to_display(0, 0), (5.0, 10.0));
        assert_eq!(viewport.cell_to_display(9, 4), (95.0, 90.0));
    }

    #[test]
    fn test_view_renders_half_blocks() {
        let mut canvas = canvas();
        canvas.clear(RED);
        canvas.flush();
        let raster = canvas.front().lock().clone();
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        RasterView::new(&raster).render(area, &mut buf);
        assert_eq!(buf[(3, 2)].symbol(), "▀");
        assert_eq!(buf[(3, 2)].fg, theme::to_color(RED));
    }
}

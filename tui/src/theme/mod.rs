//! Theme and Colors
//!
//! Chrome colours for the preview window. The face itself brings its own
//! palette from the engine; these only style the status line and help text.

use ratatui::style::Color;

use luna_face_core::Rgb;

/// Engine colour as a terminal true-colour
#[must_use]
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

// ============================================================================
// Status line
// ============================================================================

/// Status line background, a shade darker than the face background
pub const STATUS_BG: Color = Color::Rgb(20, 20, 28);

/// Page and emotion labels
pub const STATUS_ACCENT: Color = Color::Rgb(150, 180, 255);

/// Counters and hints
pub const STATUS_DIM: Color = Color::Rgb(100, 100, 100);

/// Dizzy / cat flags
pub const STATUS_FLAG: Color = Color::Rgb(255, 223, 128);

/// Command prompt text
pub const PROMPT: Color = Color::Rgb(130, 220, 130);

/// Rejected command
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

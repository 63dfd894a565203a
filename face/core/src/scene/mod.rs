//! Scene Composition
//!
//! Turns engine state into a [`Frame`]. Face geometry is designed on a
//! 240x320 portrait reference and stretched to the display with separate
//! horizontal and vertical scale factors.

mod face;
mod pages;

pub use face::{compose_face, eye_geometry, EyeGeometry, FaceView};
pub use pages::compose_page;

/// Reference width the face was designed on
pub const REFERENCE_WIDTH: f32 = 240.0;
/// Reference height the face was designed on
pub const REFERENCE_HEIGHT: f32 = 320.0;

/// Display-dependent anchor points of the face
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceLayout {
    pub width: f32,
    pub height: f32,
    /// Horizontal reference-to-pixel scale
    pub scale_x: f32,
    /// Vertical reference-to-pixel scale
    pub scale_y: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub eye_spacing: f32,
    pub eye_y: f32,
    pub mouth_y: f32,
}

impl FaceLayout {
    pub fn new(width: u16, height: u16) -> Self {
        let width = f32::from(width);
        let height = f32::from(height);
        let scale_x = width / REFERENCE_WIDTH;
        let scale_y = height / REFERENCE_HEIGHT;
        let center_x = width / 2.0;
        let center_y = height / 2.0 - 50.0 * scale_y;

        Self {
            width,
            height,
            scale_x,
            scale_y,
            center_x,
            center_y,
            eye_spacing: 50.0 * scale_x,
            eye_y: center_y - 10.0 * scale_y,
            mouth_y: center_y + 50.0 * scale_y,
        }
    }

    /// Reference units to pixels, horizontally
    #[inline]
    #[must_use]
    pub fn sx(&self, v: f32) -> f32 {
        v * self.scale_x
    }

    /// Reference units to pixels, vertically
    #[inline]
    #[must_use]
    pub fn sy(&self, v: f32) -> f32 {
        v * self.scale_y
    }

    #[must_use]
    pub fn left_eye_x(&self) -> f32 {
        self.center_x - self.eye_spacing
    }

    #[must_use]
    pub fn right_eye_x(&self) -> f32 {
        self.center_x + self.eye_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_display_scale() {
        let layout = FaceLayout::new(502, 410);
        assert!((layout.scale_x - 2.0917).abs() < 1e-3);
        assert!((layout.scale_y - 1.2813).abs() < 1e-3);
        assert_eq!(layout.center_x, 251.0);
        assert!(layout.left_eye_x() < layout.center_x);
        assert!(layout.right_eye_x() > layout.center_x);
        assert!(layout.eye_y < layout.mouth_y);
    }
}

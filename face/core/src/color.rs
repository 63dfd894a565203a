//! RGB colours and the face palette

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 24-bit colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packed `0xRRGGBB`
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse `"#RRGGBB"` or `"RRGGBB"`
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }

    /// Parse a hex colour, falling back to `default` when malformed or absent
    #[must_use]
    pub fn parse_or(s: Option<&str>, default: Rgb) -> Self {
        s.and_then(Self::parse_hex).unwrap_or(default)
    }

    /// Scale brightness (0 = black, 1 = unchanged)
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (f32::from(self.r) * f).round() as u8,
            g: (f32::from(self.g) * f).round() as u8,
            b: (f32::from(self.b) * f).round() as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour: {s}")))
    }
}

/// Face background
pub const BACKGROUND: Rgb = Rgb::new(0x1E, 0x1E, 0x28);
/// Eyes, mouth and brows
pub const FACE: Rgb = Rgb::WHITE;
/// Default text colour
pub const TEXT_DEFAULT: Rgb = Rgb::WHITE;
/// Dimmed secondary text
pub const TEXT_DIM: Rgb = Rgb::new(0x88, 0x88, 0x99);
/// Timer ring while running
pub const TIMER_RUNNING: Rgb = Rgb::new(0xE8, 0x5D, 0x4A);
/// Timer ring while paused
pub const TIMER_PAUSED: Rgb = Rgb::new(0x6A, 0x6A, 0x7A);
/// Timer ring track
pub const TIMER_TRACK: Rgb = Rgb::new(0x3A, 0x3A, 0x48);
/// Calendar accent bar
pub const CALENDAR_ACCENT: Rgb = Rgb::new(0x4A, 0x90, 0xE2);
/// Weather icon tint
pub const WEATHER_ACCENT: Rgb = Rgb::new(0xFF, 0xC8, 0x3D);
/// Rain drops
pub const RAIN: Rgb = Rgb::new(0x64, 0x96, 0xFF);
/// Matrix code
pub const MATRIX: Rgb = Rgb::new(0x00, 0xFF, 0x46);
/// Default subway line bullet
pub const SUBWAY_DEFAULT: Rgb = Rgb::new(0x00, 0x39, 0xA6);

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
}

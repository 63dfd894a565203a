//! Static page payloads
//!
//! Text, pixel art, weather, clock, subway arrivals and calendar cards. These
//! pages hold what they were given; only the clock moves on its own.

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};

/// Longest text the text page keeps
pub const MAX_TEXT_CHARS: usize = 511;
/// Pixel art grid columns
pub const PIXEL_GRID_COLS: usize = 12;
/// Pixel art grid rows
pub const PIXEL_GRID_ROWS: usize = 16;
/// Subway arrivals shown at once
pub const MAX_ARRIVALS: usize = 3;
/// Calendar cards shown at once
pub const MAX_EVENTS: usize = 3;

/// Text size on the text page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
}

impl FontSize {
    /// Unknown names fall back to [`FontSize::Medium`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "small" => Self::Small,
            "large" => Self::Large,
            "xlarge" => Self::XLarge,
            _ => Self::Medium,
        }
    }

    /// Glyph height in pixels on a display `height` pixels tall
    #[must_use]
    pub fn pixel_height(self, height: u16) -> f32 {
        let h = f32::from(height);
        match self {
            Self::Small => h * 0.08,
            Self::Medium => h * 0.13,
            Self::Large => h * 0.18,
            Self::XLarge => h * 0.27,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextState {
    pub content: String,
    pub size: FontSize,
    pub color: Rgb,
    pub background: Rgb,
}

impl TextState {
    pub fn new(content: &str, size: FontSize, color: Rgb, background: Rgb) -> Self {
        Self {
            content: content.chars().take(MAX_TEXT_CHARS).collect(),
            size,
            color,
            background,
        }
    }
}

impl Default for TextState {
    fn default() -> Self {
        Self::new("", FontSize::Medium, color::TEXT_DEFAULT, color::BACKGROUND)
    }
}

/// One lit cell of pixel art
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub x: u8,
    pub y: u8,
    pub color: Rgb,
}

/// 12x16 pixel art grid
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGridState {
    /// Row-major, `None` shows the background
    pub cells: Vec<Option<Rgb>>,
    pub background: Rgb,
}

impl PixelGridState {
    /// Build a grid; pixels outside the grid are dropped
    pub fn new(pixels: &[Pixel], background: Rgb) -> Self {
        let mut cells = vec![None; PIXEL_GRID_COLS * PIXEL_GRID_ROWS];
        let mut dropped = 0usize;
        for pixel in pixels {
            let (x, y) = (usize::from(pixel.x), usize::from(pixel.y));
            if x < PIXEL_GRID_COLS && y < PIXEL_GRID_ROWS {
                cells[y * PIXEL_GRID_COLS + x] = Some(pixel.color);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Ignored pixels outside the grid");
        }
        Self { cells, background }
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= PIXEL_GRID_COLS || y >= PIXEL_GRID_ROWS {
            return None;
        }
        self.cells[y * PIXEL_GRID_COLS + x]
    }

    /// Number of lit cells
    #[must_use]
    pub fn lit(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sunny,
    #[default]
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Foggy,
    PartlyCloudy,
}

impl WeatherIcon {
    /// Case-insensitive; unknown names fall back to [`WeatherIcon::Cloudy`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "sunny" | "clear" => Self::Sunny,
            "rainy" | "rain" => Self::Rainy,
            "snowy" | "snow" => Self::Snowy,
            "stormy" | "storm" | "thunderstorm" => Self::Stormy,
            "foggy" | "fog" => Self::Foggy,
            "partly_cloudy" => Self::PartlyCloudy,
            _ => Self::Cloudy,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub temp_label: String,
    pub icon: WeatherIcon,
    pub description: String,
}

/// Wall clock face
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    /// 0..24
    pub hour: u8,
    /// 0..60
    pub minute: u8,
    pub is_24h: bool,
    pub date_label: String,
    /// Engine clock reading when the minute last rolled
    pub last_tick_ms: u64,
}

impl ClockState {
    /// Out-of-range readings wrap onto the dial
    pub fn new(hour: u32, minute: u32, is_24h: bool, date_label: &str, now_ms: u64) -> Self {
        Self {
            hour: (hour % 24) as u8,
            minute: (minute % 60) as u8,
            is_24h,
            date_label: date_label.to_string(),
            last_tick_ms: now_ms,
        }
    }

    /// Keep time between updates from the producer
    pub fn update(&mut self, now_ms: u64) {
        while now_ms.saturating_sub(self.last_tick_ms) >= 60_000 {
            self.last_tick_ms += 60_000;
            self.minute += 1;
            if self.minute == 60 {
                self.minute = 0;
                self.hour = (self.hour + 1) % 24;
            }
        }
    }

    /// `"HH:MM"` (24h) or `"H:MM"` with an AM/PM suffix
    #[must_use]
    pub fn time_label(&self) -> (String, Option<&'static str>) {
        if self.is_24h {
            return (format!("{:02}:{:02}", self.hour, self.minute), None);
        }
        let suffix = if self.hour < 12 { "AM" } else { "PM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        (format!("{}:{:02}", hour, self.minute), Some(suffix))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubwayState {
    pub line_id: String,
    pub line_color: Rgb,
    pub station: String,
    pub direction: String,
    /// Next arrivals in minutes (at most three)
    pub arrivals_minutes: Vec<u32>,
}

impl SubwayState {
    pub fn new(
        line_id: &str,
        line_color: Rgb,
        station: &str,
        direction: &str,
        arrivals: &[u32],
    ) -> Self {
        Self {
            line_id: line_id.to_string(),
            line_color,
            station: station.to_string(),
            direction: direction.to_string(),
            arrivals_minutes: arrivals.iter().copied().take(MAX_ARRIVALS).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub time_label: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarState {
    /// At most three upcoming events
    pub events: Vec<CalendarEvent>,
}

impl CalendarState {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        let mut events = events;
        events.truncate(MAX_EVENTS);
        Self { events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_font_size_fallback() {
        assert_eq!(FontSize::from_name("XLARGE"), FontSize::XLarge);
        assert_eq!(FontSize::from_name("small"), FontSize::Small);
        assert_eq!(FontSize::from_name("huge"), FontSize::Medium);
    }

    #[test]
    fn test_text_truncated() {
        let long = "a".repeat(2000);
        let text = TextState::new(&long, FontSize::Small, Rgb::WHITE, Rgb::BLACK);
        assert_eq!(text.content.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_out_of_grid_pixels_dropped() {
        let pixels = [
            Pixel { x: 0, y: 0, color: Rgb::WHITE },
            Pixel { x: 11, y: 15, color: Rgb::BLACK },
            Pixel { x: 12, y: 0, color: Rgb::WHITE },
            Pixel { x: 0, y: 16, color: Rgb::WHITE },
        ];
        let grid = PixelGridState::new(&pixels, color::BACKGROUND);
        assert_eq!(grid.lit(), 2);
        assert_eq!(grid.cell(11, 15), Some(Rgb::BLACK));
        assert_eq!(grid.cell(12, 0), None);
    }

    #[test]
    fn test_weather_icon_names() {
        assert_eq!(WeatherIcon::from_name("Partly Cloudy"), WeatherIcon::PartlyCloudy);
        assert_eq!(WeatherIcon::from_name("SUNNY"), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::from_name("volcanic"), WeatherIcon::Cloudy);
    }

    #[test]
    fn test_clock_keeps_time() {
        let mut clock = ClockState::new(23, 59, true, "MON JAN 05", 0);
        clock.update(59_999);
        assert_eq!((clock.hour, clock.minute), (23, 59));
        clock.update(60_000);
        assert_eq!((clock.hour, clock.minute), (0, 0));
    }

    #[test]
    fn test_clock_wraps_out_of_range_readings() {
        let clock = ClockState::new(300, 75, true, "", 0);
        assert_eq!((clock.hour, clock.minute), (12, 15));
    }

    #[test]
    fn test_clock_labels() {
        let clock = ClockState::new(0, 5, false, "", 0);
        assert_eq!(clock.time_label(), ("12:05".to_string(), Some("AM")));
        let clock = ClockState::new(13, 30, false, "", 0);
        assert_eq!(clock.time_label(), ("1:30".to_string(), Some("PM")));
        let clock = ClockState::new(7, 0, true, "", 0);
        assert_eq!(clock.time_label(), ("07:00".to_string(), None));
    }

    #[test]
    fn test_lists_truncated() {
        let subway = SubwayState::new("1", Rgb::WHITE, "110 St", "Downtown", &[3, 8, 12, 20]);
        assert_eq!(subway.arrivals_minutes, vec![3, 8, 12]);

        let events = (0..5)
            .map(|i| CalendarEvent {
                time_label: format!("{i}:00"),
                title: "Standup".to_string(),
                location: String::new(),
            })
            .collect();
        assert_eq!(CalendarState::new(events).events.len(), MAX_EVENTS);
    }
}

//! Display Page Registry
//!
//! Exactly one page is active at a time. The face is the home page; every
//! other page replaces it until the display is cleared.

mod content;
mod particles;
mod timer;

pub use content::{
    CalendarEvent, CalendarState, ClockState, FontSize, Pixel, PixelGridState, SubwayState,
    TextState, WeatherIcon, WeatherState, MAX_ARRIVALS, MAX_EVENTS, MAX_TEXT_CHARS,
    PIXEL_GRID_COLS, PIXEL_GRID_ROWS,
};
pub use particles::{Particle, ParticleKind, ParticleSystemState};
pub use timer::TimerState;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which page is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPage {
    #[default]
    Face,
    Text,
    PixelArt,
    Weather,
    Clock,
    Timer,
    Subway,
    Calendar,
    Animation,
}

impl DisplayPage {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::Text => "text",
            Self::PixelArt => "pixel_art",
            Self::Weather => "weather",
            Self::Clock => "clock",
            Self::Timer => "timer",
            Self::Subway => "subway",
            Self::Calendar => "calendar",
            Self::Animation => "animation",
        }
    }
}

impl fmt::Display for DisplayPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The active page with its payload
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Page {
    #[default]
    Face,
    Text(TextState),
    PixelArt(PixelGridState),
    Weather(WeatherState),
    Clock(ClockState),
    Timer(TimerState),
    Subway(SubwayState),
    Calendar(CalendarState),
    Animation(ParticleSystemState),
}

impl Page {
    #[must_use]
    pub fn kind(&self) -> DisplayPage {
        match self {
            Self::Face => DisplayPage::Face,
            Self::Text(_) => DisplayPage::Text,
            Self::PixelArt(_) => DisplayPage::PixelArt,
            Self::Weather(_) => DisplayPage::Weather,
            Self::Clock(_) => DisplayPage::Clock,
            Self::Timer(_) => DisplayPage::Timer,
            Self::Subway(_) => DisplayPage::Subway,
            Self::Calendar(_) => DisplayPage::Calendar,
            Self::Animation(_) => DisplayPage::Animation,
        }
    }
}

/// Holds the single active page
#[derive(Debug, Default)]
pub struct PageRegistry {
    active: Page,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> &Page {
        &self.active
    }

    #[must_use]
    pub fn kind(&self) -> DisplayPage {
        self.active.kind()
    }

    #[must_use]
    pub fn is_face(&self) -> bool {
        matches!(self.active, Page::Face)
    }

    /// Replace the active page; returns the page that was showing
    pub fn show(&mut self, page: Page) -> DisplayPage {
        let previous = self.kind();
        self.active = page;
        tracing::info!(from = %previous, to = %self.kind(), "Page changed");
        previous
    }

    /// The timer payload, if the timer page is active
    pub fn timer_mut(&mut self) -> Option<&mut TimerState> {
        match &mut self.active {
            Page::Timer(timer) => Some(timer),
            _ => None,
        }
    }

    /// Advance the active non-face page
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: u64, dt: f32, rng: &mut R) {
        match &mut self.active {
            Page::Timer(timer) => timer.update(now_ms),
            Page::Clock(clock) => clock.update(now_ms),
            Page::Animation(system) => system.update(dt, rng),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_starts_on_face() {
        let registry = PageRegistry::new();
        assert_eq!(registry.kind(), DisplayPage::Face);
        assert!(registry.is_face());
    }

    #[test]
    fn test_show_replaces_page() {
        let mut registry = PageRegistry::new();
        let previous = registry.show(Page::Timer(TimerState::new(25, 0, "Focus", true, 0)));
        assert_eq!(previous, DisplayPage::Face);
        assert!(registry.timer_mut().is_some());

        let previous = registry.show(Page::Clock(ClockState::new(9, 41, false, "", 0)));
        assert_eq!(previous, DisplayPage::Timer);
        assert_eq!(registry.kind(), DisplayPage::Clock);
        assert!(registry.timer_mut().is_none());
    }

    #[test]
    fn test_update_ticks_active_page_only() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut registry = PageRegistry::new();
        registry.show(Page::Timer(TimerState::new(0, 10, "", true, 0)));
        registry.update(3000, 0.05, &mut rng);
        match registry.active() {
            Page::Timer(timer) => assert_eq!(timer.remaining_seconds(), 7),
            other => panic!("unexpected page {other:?}"),
        }
    }

    #[test]
    fn test_page_names() {
        assert_eq!(DisplayPage::PixelArt.to_string(), "pixel_art");
        assert_eq!(Page::Face.kind(), DisplayPage::Face);
    }
}

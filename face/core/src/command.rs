//! Wire Commands
//!
//! One JSON object per message, tagged by `cmd`. Parsing is lenient the way
//! the device protocol is: missing fields take defaults, malformed colours
//! fall back to the field default and unknown command names become
//! [`Command::Unknown`] instead of an error.
//!
//! ```json
//! {"cmd": "emotion", "value": "happy"}
//! {"cmd": "timer", "minutes": 25, "label": "Focus"}
//! {"cmd": "subway", "line": "1", "color": "#EE352E", "station": "110 St",
//!  "direction": "Downtown", "times": [3, 8, 12]}
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::pages::{CalendarEvent, Pixel};

fn half() -> f32 {
    0.5
}

fn yes() -> bool {
    true
}

fn twelve() -> u32 {
    12
}

fn pomodoro() -> u32 {
    25
}

/// One pixel as sent on the wire
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WirePixel {
    pub x: i64,
    pub y: i64,
    /// Hex colour
    pub c: String,
}

/// One calendar card as sent on the wire
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireEvent {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
}

/// A display command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Emotion {
        #[serde(default)]
        value: String,
    },
    Gaze {
        #[serde(default = "half")]
        x: f32,
        #[serde(default = "half")]
        y: f32,
    },
    Text {
        #[serde(default)]
        content: String,
        #[serde(default)]
        size: Option<String>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        bg: Option<String>,
    },
    TextClear,
    PixelArt {
        #[serde(default)]
        pixels: Vec<WirePixel>,
        #[serde(default)]
        bg: Option<String>,
    },
    PixelArtClear,
    Weather {
        #[serde(default)]
        temp: String,
        #[serde(default)]
        icon: String,
        #[serde(default)]
        desc: String,
    },
    Timer {
        #[serde(default)]
        minutes: u32,
        #[serde(default)]
        seconds: u32,
        #[serde(default)]
        label: String,
        #[serde(default = "yes")]
        running: bool,
    },
    Clock {
        #[serde(default = "twelve")]
        hours: u32,
        #[serde(default)]
        minutes: u32,
        #[serde(default)]
        is_24h: bool,
        #[serde(default)]
        date: String,
    },
    Animation {
        #[serde(rename = "type", default)]
        kind: String,
    },
    ClearDisplay,
    Subway {
        #[serde(default)]
        line: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        station: String,
        #[serde(default)]
        direction: String,
        #[serde(default)]
        times: Vec<u32>,
    },
    Calendar {
        #[serde(default)]
        events: Vec<WireEvent>,
    },
    TimerStart,
    TimerPause,
    TimerReset {
        #[serde(default = "pomodoro")]
        minutes: u32,
    },
    Blink,
    Dizzy {
        #[serde(default = "yes")]
        value: bool,
    },
    CatMode {
        #[serde(default = "yes")]
        value: bool,
    },
    /// Any command name this engine does not know
    #[serde(other)]
    Unknown,
}

impl Command {
    /// Parse one JSON message
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON, a missing `cmd` tag or fields of the
    /// wrong type. Unknown command names are not an error.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Wire name of the command
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Emotion { .. } => "emotion",
            Self::Gaze { .. } => "gaze",
            Self::Text { .. } => "text",
            Self::TextClear => "text_clear",
            Self::PixelArt { .. } => "pixel_art",
            Self::PixelArtClear => "pixel_art_clear",
            Self::Weather { .. } => "weather",
            Self::Timer { .. } => "timer",
            Self::Clock { .. } => "clock",
            Self::Animation { .. } => "animation",
            Self::ClearDisplay => "clear_display",
            Self::Subway { .. } => "subway",
            Self::Calendar { .. } => "calendar",
            Self::TimerStart => "timer_start",
            Self::TimerPause => "timer_pause",
            Self::TimerReset { .. } => "timer_reset",
            Self::Blink => "blink",
            Self::Dizzy { .. } => "dizzy",
            Self::CatMode { .. } => "cat_mode",
            Self::Unknown => "unknown",
        }
    }
}

/// Decode wire pixels, skipping any with a bad colour or coordinate
#[must_use]
pub fn decode_pixels(pixels: &[WirePixel]) -> Vec<Pixel> {
    pixels
        .iter()
        .filter_map(|p| {
            let x = u8::try_from(p.x).ok()?;
            let y = u8::try_from(p.y).ok()?;
            let color = Rgb::parse_hex(&p.c)?;
            Some(Pixel { x, y, color })
        })
        .collect()
}

/// Decode wire calendar events
#[must_use]
pub fn decode_events(events: &[WireEvent]) -> Vec<CalendarEvent> {
    events
        .iter()
        .map(|e| CalendarEvent {
            time_label: e.time.clone(),
            title: e.title.clone(),
            location: e.location.clone(),
        })
        .collect()
}

/// Parse an optional colour field with its default
#[must_use]
pub fn color_or(value: Option<&String>, default: Rgb) -> Rgb {
    Rgb::parse_or(value.map(String::as_str), default)
}

/// Default subway bullet colour
#[must_use]
pub fn subway_color(value: Option<&String>) -> Rgb {
    color_or(value, color::SUBWAY_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emotion() {
        let cmd = Command::parse(r#"{"cmd":"emotion","value":"happy"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Emotion {
                value: "happy".to_string()
            }
        );
    }

    #[test]
    fn test_gaze_defaults_to_centre() {
        let cmd = Command::parse(r#"{"cmd":"gaze","x":0.9}"#).unwrap();
        assert_eq!(cmd, Command::Gaze { x: 0.9, y: 0.5 });
    }

    #[test]
    fn test_unknown_command() {
        let cmd = Command::parse(r#"{"cmd":"audio_start"}"#).unwrap();
        assert_eq!(cmd, Command::Unknown);
        let cmd = Command::parse(r#"{"cmd":"notification","id":"x","title":"hi"}"#).unwrap();
        assert_eq!(cmd, Command::Unknown);
    }

    #[test]
    fn test_missing_tag_is_error() {
        assert!(Command::parse(r#"{"value":"happy"}"#).is_err());
        assert!(Command::parse("not json").is_err());
    }

    #[test]
    fn test_timer_defaults() {
        let cmd = Command::parse(r#"{"cmd":"timer","minutes":25}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Timer {
                minutes: 25,
                seconds: 0,
                label: String::new(),
                running: true,
            }
        );
    }

    #[test]
    fn test_clock_defaults() {
        let cmd = Command::parse(r#"{"cmd":"clock","date":"MON JAN 05"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Clock {
                hours: 12,
                minutes: 0,
                is_24h: false,
                date: "MON JAN 05".to_string(),
            }
        );
    }

    #[test]
    fn test_clock_accepts_out_of_range_values() {
        let cmd = Command::parse(r#"{"cmd":"clock","hours":300,"minutes":75}"#).unwrap();
        assert!(matches!(cmd, Command::Clock { hours: 300, minutes: 75, .. }));
    }

    #[test]
    fn test_animation_type_field() {
        let cmd = Command::parse(r#"{"cmd":"animation","type":"snow"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Animation {
                kind: "snow".to_string()
            }
        );
    }

    #[test]
    fn test_pixels_skip_bad_entries() {
        let cmd = Command::parse(
            r##"{"cmd":"pixel_art","bg":"#000000","pixels":[
                {"x":1,"y":2,"c":"#FF0000"},
                {"x":-1,"y":2,"c":"#FF0000"},
                {"x":3,"y":4,"c":"red"}
            ]}"##,
        )
        .unwrap();
        let Command::PixelArt { pixels, bg } = cmd else {
            panic!("expected pixel_art");
        };
        assert_eq!(bg.as_deref(), Some("#000000"));
        let decoded = decode_pixels(&pixels);
        assert_eq!(
            decoded,
            vec![Pixel {
                x: 1,
                y: 2,
                color: Rgb::new(255, 0, 0)
            }]
        );
    }

    #[test]
    fn test_supplementary_commands() {
        assert_eq!(
            Command::parse(r#"{"cmd":"timer_reset"}"#).unwrap(),
            Command::TimerReset { minutes: 25 }
        );
        assert_eq!(
            Command::parse(r#"{"cmd":"dizzy"}"#).unwrap(),
            Command::Dizzy { value: true }
        );
        assert_eq!(Command::parse(r#"{"cmd":"blink"}"#).unwrap(), Command::Blink);

        let cmd = Command::parse(
            r#"{"cmd":"calendar","events":[{"time":"10:00","title":"Standup"}]}"#,
        )
        .unwrap();
        let Command::Calendar { events } = cmd else {
            panic!("expected calendar");
        };
        let decoded = decode_events(&events);
        assert_eq!(decoded[0].title, "Standup");
        assert_eq!(decoded[0].location, "");
    }

    #[test]
    fn test_color_fallbacks() {
        assert_eq!(subway_color(None), color::SUBWAY_DEFAULT);
        assert_eq!(
            color_or(Some(&"00FF00".to_string()), Rgb::WHITE),
            Rgb::new(0, 255, 0)
        );
        assert_eq!(color_or(Some(&"green".to_string()), Rgb::WHITE), Rgb::WHITE);
    }

    #[test]
    fn test_names_match_wire_tags() {
        let cmd = Command::TimerReset { minutes: 5 };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["cmd"], cmd.name());
    }
}

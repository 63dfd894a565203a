//! Emotion Model
//!
//! A static table of named expressions plus a deterministic interpolation
//! between any two of them. Geometry is expressed in reference units of a
//! 240x320 portrait face; the scene layout scales it to the display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Parameter vector describing one facial expression
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionParameters {
    /// Taller = more alert
    pub eye_height: f32,
    /// Wider = more surprised
    pub eye_width: f32,
    /// Openness multiplier (nominal 0-1.2)
    pub eye_openness: f32,
    /// Positive = smile, negative = frown (-1..1)
    pub mouth_curve: f32,
    /// "O" mouth amount (0..1)
    pub mouth_open: f32,
    /// Mouth horizontal size
    pub mouth_width: f32,
    /// Angled eyebrows
    pub angry_brows: bool,
    /// Eyes glance sideways
    pub look_side: bool,
    /// One eye higher than the other
    pub tilt_eyes: bool,
    /// Highlight dot in each eye
    pub sparkle: bool,
    /// ":3" mouth with whiskers
    pub cat_face: bool,
    /// Eyes only
    pub no_mouth: bool,
}

impl EmotionParameters {
    const fn base(
        eye_height: f32,
        eye_width: f32,
        eye_openness: f32,
        mouth_curve: f32,
        mouth_open: f32,
        mouth_width: f32,
    ) -> Self {
        Self {
            eye_height,
            eye_width,
            eye_openness,
            mouth_curve,
            mouth_open,
            mouth_width,
            angry_brows: false,
            look_side: false,
            tilt_eyes: false,
            sparkle: false,
            cat_face: false,
            no_mouth: false,
        }
    }
}

/// Named expressions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmotionId {
    /// Just eyes, no mouth (the fallback)
    #[default]
    EyesOnly,
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Thinking,
    Confused,
    Excited,
    Cat,
    /// Shaken: wide wobbly eyes, woozy mouth
    Dizzy,
}

impl EmotionId {
    /// Every expression in table order
    pub const ALL: [EmotionId; 11] = [
        Self::EyesOnly,
        Self::Neutral,
        Self::Happy,
        Self::Sad,
        Self::Angry,
        Self::Surprised,
        Self::Thinking,
        Self::Confused,
        Self::Excited,
        Self::Cat,
        Self::Dizzy,
    ];

    /// Map a raw table index to an expression, falling back to [`EmotionId::EyesOnly`]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Table index of this expression
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive lookup; unknown names fall back to [`EmotionId::EyesOnly`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// Wire name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EyesOnly => "eyes_only",
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::Thinking => "thinking",
            Self::Confused => "confused",
            Self::Excited => "excited",
            Self::Cat => "cat",
            Self::Dizzy => "dizzy",
        }
    }

    /// Parameters for this expression
    #[must_use]
    pub fn parameters(self) -> EmotionParameters {
        EMOTIONS[self.index()]
    }
}

impl fmt::Display for EmotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmotionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

static EMOTIONS: [EmotionParameters; 11] = [
    // EyesOnly
    EmotionParameters {
        no_mouth: true,
        ..EmotionParameters::base(60.0, 40.0, 1.0, 0.0, 0.0, 0.0)
    },
    // Neutral
    EmotionParameters::base(60.0, 40.0, 1.0, 0.0, 0.0, 40.0),
    // Happy
    EmotionParameters::base(55.0, 40.0, 0.85, 0.8, 0.0, 50.0),
    // Sad
    EmotionParameters::base(55.0, 38.0, 0.8, -0.9, 0.0, 55.0),
    // Angry
    EmotionParameters {
        angry_brows: true,
        ..EmotionParameters::base(45.0, 45.0, 0.5, -0.5, 0.0, 45.0)
    },
    // Surprised
    EmotionParameters::base(65.0, 45.0, 1.15, 0.0, 0.6, 35.0),
    // Thinking
    EmotionParameters {
        look_side: true,
        ..EmotionParameters::base(55.0, 40.0, 0.9, 0.3, 0.0, 35.0)
    },
    // Confused
    EmotionParameters {
        tilt_eyes: true,
        ..EmotionParameters::base(60.0, 40.0, 1.0, -0.3, 0.0, 35.0)
    },
    // Excited
    EmotionParameters {
        sparkle: true,
        ..EmotionParameters::base(65.0, 48.0, 1.2, 1.0, 0.2, 55.0)
    },
    // Cat
    EmotionParameters {
        cat_face: true,
        ..EmotionParameters::base(60.0, 40.0, 1.0, 0.5, 0.0, 40.0)
    },
    // Dizzy
    EmotionParameters {
        tilt_eyes: true,
        ..EmotionParameters::base(65.0, 45.0, 1.1, -0.2, 0.3, 40.0)
    },
];

/// Parameters for an expression
#[must_use]
pub fn parameters(id: EmotionId) -> EmotionParameters {
    id.parameters()
}

/// Linear interpolation
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate between two expressions
///
/// `t` is clamped to `[0, 1]`. Numeric fields blend linearly; flags snap from
/// `from` to `to` at exactly `t = 0.5`.
#[must_use]
pub fn interpolate(from: &EmotionParameters, to: &EmotionParameters, t: f32) -> EmotionParameters {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let flags = if t >= 0.5 { to } else { from };

    EmotionParameters {
        eye_height: lerp(from.eye_height, to.eye_height, t),
        eye_width: lerp(from.eye_width, to.eye_width, t),
        eye_openness: lerp(from.eye_openness, to.eye_openness, t),
        mouth_curve: lerp(from.mouth_curve, to.mouth_curve, t),
        mouth_open: lerp(from.mouth_open, to.mouth_open, t),
        mouth_width: lerp(from.mouth_width, to.mouth_width, t),
        angry_brows: flags.angry_brows,
        look_side: flags.look_side,
        tilt_eyes: flags.tilt_eyes,
        sparkle: flags.sparkle,
        cat_face: flags.cat_face,
        no_mouth: flags.no_mouth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        assert_eq!(EmotionId::from_index(42), EmotionId::EyesOnly);
        assert_eq!(EmotionId::from_index(2), EmotionId::Happy);
        assert!(EmotionId::from_index(usize::MAX).parameters().no_mouth);
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        assert_eq!(EmotionId::from_name("HAPPY"), EmotionId::Happy);
        assert_eq!(EmotionId::from_name("Cat"), EmotionId::Cat);
        assert_eq!(EmotionId::from_name(" surprised "), EmotionId::Surprised);
        assert_eq!(EmotionId::from_name("grumpy"), EmotionId::EyesOnly);
        assert_eq!("dizzy".parse::<EmotionId>().unwrap(), EmotionId::Dizzy);
    }

    #[test]
    fn test_names_round_trip_through_table() {
        for id in EmotionId::ALL {
            assert_eq!(EmotionId::from_name(id.name()), id);
            assert_eq!(EmotionId::from_index(id.index()), id);
        }
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = EmotionId::Sad.parameters();
        let b = EmotionId::Excited.parameters();
        assert_eq!(interpolate(&a, &b, 0.0), a);
        assert_eq!(interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn test_interpolate_numeric_fields_are_linear() {
        let a = EmotionId::Angry.parameters();
        let b = EmotionId::Surprised.parameters();
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            let mid = interpolate(&a, &b, t);
            assert!(approx(mid.eye_height, a.eye_height + (b.eye_height - a.eye_height) * t));
            assert!(approx(mid.eye_width, a.eye_width + (b.eye_width - a.eye_width) * t));
            assert!(approx(
                mid.eye_openness,
                a.eye_openness + (b.eye_openness - a.eye_openness) * t
            ));
            assert!(approx(
                mid.mouth_curve,
                a.mouth_curve + (b.mouth_curve - a.mouth_curve) * t
            ));
            assert!(approx(mid.mouth_open, a.mouth_open + (b.mouth_open - a.mouth_open) * t));
            assert!(approx(
                mid.mouth_width,
                a.mouth_width + (b.mouth_width - a.mouth_width) * t
            ));
        }
    }

    #[test]
    fn test_flags_snap_at_midpoint() {
        let a = EmotionId::Angry.parameters();
        let b = EmotionId::Cat.parameters();

        let before = interpolate(&a, &b, 0.49);
        assert!(before.angry_brows);
        assert!(!before.cat_face);

        let at = interpolate(&a, &b, 0.5);
        assert!(!at.angry_brows);
        assert!(at.cat_face);
    }

    #[test]
    fn test_t_is_clamped() {
        let a = EmotionId::Neutral.parameters();
        let b = EmotionId::Happy.parameters();
        assert_eq!(interpolate(&a, &b, -3.0), a);
        assert_eq!(interpolate(&a, &b, 7.5), b);
        assert_eq!(interpolate(&a, &b, f32::NAN), a);
    }
}

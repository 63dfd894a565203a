//! Engine Configuration
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. Environment variables (`LUNA_*`)
//! 2. TOML configuration file (`$XDG_CONFIG_HOME/luna/face.toml`)
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! width = 502
//! height = 410
//! frame_period_ms = 50
//! command_timeout_ms = 100
//!
//! [animation]
//! transition_rate = 4.0
//! blink_min_interval_ms = 2000
//! blink_max_interval_ms = 5000
//! dizzy_duration_ms = 3000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default display width after the 90° landscape rotation
pub const DEFAULT_WIDTH: u16 = 502;
/// Default display height after the 90° landscape rotation
pub const DEFAULT_HEIGHT: u16 = 410;

/// Tunables for the Face-mode animation
///
/// Rates are per second. Distances are in reference units of the 240x320
/// portrait face and are scaled to the display by the scene layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTuning {
    /// Emotion transition progress per second
    pub transition_rate: f32,
    /// Gaze smoothing rate
    pub gaze_rate: f32,
    /// Face offset smoothing rate
    pub face_shift_rate: f32,
    /// Distance from an edge (in gaze units) where the face starts leaning
    pub edge_threshold: f32,
    /// Maximum horizontal face lean
    pub max_face_shift_x: f32,
    /// Maximum vertical face lean
    pub max_face_shift_y: f32,
    /// Shortest gap between automatic blinks
    pub blink_min_interval_ms: u64,
    /// Longest gap between automatic blinks
    pub blink_max_interval_ms: u64,
    /// Blink progress per second
    pub blink_rate: f32,
    /// How long a poked eye stays shut
    pub wink_hold_ms: u64,
    /// Wink easing rate
    pub wink_rate: f32,
    /// Petting offset per pixel of vertical drag
    pub petting_sensitivity: f32,
    /// Petting offset limit (both directions)
    pub petting_max_offset: f32,
    /// Easing rate while the face is being touched
    pub petting_press_rate: f32,
    /// Easing rate after release
    pub petting_release_rate: f32,
    /// Dizzy lifetime after a shake
    pub dizzy_duration_ms: u64,
    /// Wobble phase advance (radians per second)
    pub dizzy_wobble_rate: f32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            transition_rate: 4.0,
            gaze_rate: 10.0,
            face_shift_rate: 6.0,
            edge_threshold: 0.25,
            max_face_shift_x: 25.0,
            max_face_shift_y: 15.0,
            blink_min_interval_ms: 2000,
            blink_max_interval_ms: 5000,
            blink_rate: 10.0,
            wink_hold_ms: 600,
            wink_rate: 12.0,
            petting_sensitivity: 0.5,
            petting_max_offset: 20.0,
            petting_press_rate: 15.0,
            petting_release_rate: 5.0,
            dizzy_duration_ms: 3000,
            dizzy_wobble_rate: 12.0,
        }
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display width in pixels
    pub width: u16,
    /// Display height in pixels
    pub height: u16,
    /// Render period (50ms ~ 20 FPS)
    pub frame_period_ms: u64,
    /// How long a frame waits for the state lock before being skipped
    pub frame_lock_timeout_ms: u64,
    /// How long a command waits for the state lock before being dropped
    pub command_timeout_ms: u64,
    /// Bounded input channel size
    pub input_channel_capacity: usize,
    /// Start with the cat expression
    pub cat_mode: bool,
    /// Fixed RNG seed (None = seeded from entropy)
    pub rng_seed: Option<u64>,
    /// Animation tunables
    pub animation: AnimationTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_period_ms: 50,
            frame_lock_timeout_ms: 20,
            command_timeout_ms: 100,
            input_channel_capacity: 64,
            cat_mode: false,
            rng_seed: None,
            animation: AnimationTuning::default(),
        }
    }
}

impl EngineConfig {
    /// Create configuration from defaults overridden by environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        apply_env_config(&mut config);
        config
    }

    /// Render period as a [`Duration`]
    #[must_use]
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }

    /// Frame lock timeout as a [`Duration`]
    #[must_use]
    pub fn frame_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_lock_timeout_ms)
    }

    /// Command lock timeout as a [`Duration`]
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Target frames per second implied by the render period
    #[must_use]
    pub fn target_fps(&self) -> f32 {
        if self.frame_period_ms == 0 {
            return 0.0;
        }
        1000.0 / self.frame_period_ms as f32
    }

    /// Check that the configuration can drive an engine
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(format!(
                "display size must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.frame_period_ms == 0 {
            return Err(ConfigError::ValidationError(
                "frame_period_ms must be greater than zero".to_string(),
            ));
        }
        if self.frame_lock_timeout_ms >= self.frame_period_ms {
            return Err(ConfigError::ValidationError(format!(
                "frame_lock_timeout_ms ({}) must be shorter than frame_period_ms ({})",
                self.frame_lock_timeout_ms, self.frame_period_ms
            )));
        }
        if self.input_channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "input_channel_capacity must be greater than zero".to_string(),
            ));
        }
        let anim = &self.animation;
        if anim.blink_min_interval_ms > anim.blink_max_interval_ms {
            return Err(ConfigError::ValidationError(format!(
                "blink interval range is inverted ({}..{})",
                anim.blink_min_interval_ms, anim.blink_max_interval_ms
            )));
        }
        if !(anim.edge_threshold > 0.0 && anim.edge_threshold < 0.5) {
            return Err(ConfigError::ValidationError(format!(
                "edge_threshold must be in (0, 0.5), got {}",
                anim.edge_threshold
            )));
        }
        Ok(())
    }
}

/// Default configuration file path (`$XDG_CONFIG_HOME/luna/face.toml`)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("luna").join("face.toml"))
}

/// Load configuration from the default location
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    let path = std::env::var("LUNA_CONFIG")
        .ok()
        .map(PathBuf::from)
        .or_else(default_config_path);
    load_config_from_path(path.as_deref())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the merged
/// configuration fails validation.
pub fn load_config_from_path(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let mut config = EngineConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;
            config = toml::from_str(&toml_content)?;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;
    Ok(config)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Apply `LUNA_*` environment overrides
fn apply_env_config(config: &mut EngineConfig) {
    if let Some(width) = env_parse("LUNA_DISPLAY_WIDTH") {
        config.width = width;
    }
    if let Some(height) = env_parse("LUNA_DISPLAY_HEIGHT") {
        config.height = height;
    }
    if let Some(fps) = env_parse::<u32>("LUNA_FPS") {
        if fps > 0 {
            config.frame_period_ms = u64::from(1000 / fps).max(1);
        }
    }
    if let Some(period) = env_parse("LUNA_FRAME_PERIOD_MS") {
        config.frame_period_ms = period;
    }
    if let Some(timeout) = env_parse("LUNA_COMMAND_TIMEOUT_MS") {
        config.command_timeout_ms = timeout;
    }
    if let Ok(v) = std::env::var("LUNA_CAT_MODE") {
        config.cat_mode = v == "1" || v.eq_ignore_ascii_case("true");
    }
    if let Some(seed) = env_parse("LUNA_RNG_SEED") {
        config.rng_seed = Some(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_fps(), 20.0);
        assert_eq!(config.frame_period(), Duration::from_millis(50));
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = EngineConfig {
            width: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_lock_timeout_must_fit_in_frame() {
        let config = EngineConfig {
            frame_period_ms: 20,
            frame_lock_timeout_ms: 20,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_blink_range_rejected() {
        let mut config = EngineConfig::default();
        config.animation.blink_min_interval_ms = 6000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            frame_period_ms = 33

            [animation]
            dizzy_duration_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(parsed.frame_period_ms, 33);
        assert_eq!(parsed.width, DEFAULT_WIDTH);
        assert_eq!(parsed.animation.dizzy_duration_ms, 1500);
        assert_eq!(parsed.animation.blink_rate, 10.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 320\nheight = 240\ncat_mode = true").unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 240);
        assert!(config.cat_mode);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            load_config_from_path(Some(Path::new("/nonexistent/luna/face.toml"))).unwrap();
        assert_eq!(config.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = \"wide\"").unwrap();

        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}

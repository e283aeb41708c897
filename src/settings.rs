//! Game settings and tuning
//!
//! Every game's timings and dimensions are data-driven so the shell can
//! match its screen size. Durations are in milliseconds here and converted
//! to simulation ticks by the engines.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Viewport;

/// Balloon game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonSettings {
    /// Balloons per round
    pub count: usize,
    /// Placement grid columns
    pub columns: u32,
    /// Placement grid rows
    pub rows: u32,
    /// Margin kept between a balloon and its cell edge (px)
    pub padding: f32,
    /// Largest balloon width (px); actual width is min(screen / 6, this)
    pub max_width: f32,
    /// Largest balloon height (px); actual height is min(screen / 6, this)
    pub max_height: f32,
    /// How long the explosion animation shows after a pop
    pub explosion_ms: u32,
    /// Delay between the last pop and the win message
    pub win_delay_ms: u32,
    /// How long the win message stays up before the round resets
    pub win_display_ms: u32,
}

impl Default for BalloonSettings {
    fn default() -> Self {
        Self {
            count: 8,
            columns: 4,
            rows: 2,
            padding: 20.0,
            max_width: 100.0,
            max_height: 150.0,
            explosion_ms: 600,
            win_delay_ms: 1000,
            win_display_ms: 1500,
        }
    }
}

/// Block stacking tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackingSettings {
    /// Rows the screen height is divided into (block size = height / rows)
    pub rows: u32,
    /// Horizontal pan distance per tick (px)
    pub pan_step: f32,
    /// Vertical fall distance per tick (px)
    pub fall_step: f32,
    /// How long the fireworks show before the board resets
    pub celebration_ms: u32,
}

impl Default for StackingSettings {
    fn default() -> Self {
        Self {
            rows: 7,
            pan_step: 2.0,
            fall_step: 8.0,
            celebration_ms: 3000,
        }
    }
}

/// Shape matching tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Highlight cycle period
    pub cycle_ms: u32,
    /// Duration of the target's move onto the chosen option
    pub move_ms: u32,
    /// Celebration time after a match before shapes are reshuffled
    pub match_delay_ms: u32,
    /// Pause after a wrong choice before cycling resumes
    pub mismatch_delay_ms: u32,
    /// Target shape size (px)
    pub target_size: f32,
    /// Option shape size (px)
    pub option_size: f32,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            cycle_ms: 1500,
            move_ms: 300,
            match_delay_ms: 1500,
            mismatch_delay_ms: 200,
            target_size: 180.0,
            option_size: 200.0,
        }
    }
}

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all sound
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// All arcade settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Screen size shared by every game
    pub viewport: Viewport,
    pub balloon: BalloonSettings,
    pub stacking: StackingSettings,
    pub matching: MatchingSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Default settings for a given screen size
    pub fn for_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::default()
        }
    }

    /// Parse settings from a JSON string (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_tuning() {
        let settings = Settings::default();
        assert_eq!(settings.balloon.count, 8);
        assert_eq!((settings.balloon.columns, settings.balloon.rows), (4, 2));
        assert_eq!(settings.stacking.rows, 7);
        assert_eq!(settings.matching.cycle_ms, 1500);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "viewport": { "width": 800, "height": 600 }, "stacking": { "rows": 9 } }"#)
                .expect("valid json");
        assert_eq!(settings.viewport, Viewport::new(800.0, 600.0));
        assert_eq!(settings.stacking.rows, 9);
        assert_eq!(settings.stacking.pan_step, 2.0);
        assert_eq!(settings.balloon, BalloonSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::for_viewport(1024.0, 768.0);
        settings.audio.muted = true;
        let json = settings.to_json().expect("serialize");
        let back = Settings::from_json(&json).expect("parse");
        assert_eq!(settings, back);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("pocket_arcade_settings_{}.json", std::process::id()));
        let settings = Settings::for_viewport(640.0, 480.0);
        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(settings, loaded);
    }
}

//! Settings persistence using TOML
//!
//! Stored in ~/.config/pivotris/settings.toml (or platform equivalent)

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, MAX_DIMENSION, MIN_DIMENSION};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key bindings
    pub keys: KeyBindings,
    /// Board dimensions
    pub board: BoardSettings,
    /// Gravity curve
    pub speed: SpeedSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each command can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub help: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a key name or a list of key names")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys.as_slice() {
        [single] => serializer.serialize_str(single),
        many => serializer.collect_seq(many),
    }
}

/// Board dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

/// Gravity: `interval = base * (1 - level * speed_factor)`, never below the minimum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    /// Fall interval at level 0
    pub base_interval_ms: u64,
    /// Fraction of the base interval removed per level
    pub speed_factor: f64,
    /// Floor for the fall interval
    pub min_interval_ms: u64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string(), "a".to_string()],
            move_right: vec!["Right".to_string(), "d".to_string()],
            move_down: vec!["Down".to_string(), "s".to_string()],
            rotate: vec!["Up".to_string(), "w".to_string()],
            hard_drop: vec!["Space".to_string()],
            restart: vec!["r".to_string()],
            help: vec!["i".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            base_interval_ms: 500,
            speed_factor: 0.1,
            min_interval_ms: 50,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "pivotris", "pivotris").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };
        self.save_to(&path)
    }

    /// Save settings to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(path, contents).map_err(|e| format!("Failed to write settings: {}", e))
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if !range.contains(&self.board.width) || !range.contains(&self.board.height) {
            return Err(format!(
                "Board size {}x{} is outside {}..={}",
                self.board.width, self.board.height, MIN_DIMENSION, MAX_DIMENSION
            ));
        }
        if self.speed.base_interval_ms == 0 || self.speed.min_interval_ms == 0 {
            return Err("Fall intervals must be positive".to_string());
        }
        if !(self.speed.speed_factor.is_finite() && self.speed.speed_factor >= 0.0) {
            return Err(format!("Invalid speed factor {}", self.speed.speed_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.board, BoardSettings { width: 10, height: 24 });
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [board]
            height = 30

            [keys]
            rotate = "x"
            quit = ["q", "Q"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.board.width, 10);
        assert_eq!(settings.board.height, 30);
        assert_eq!(settings.keys.rotate, vec!["x"]);
        assert_eq!(settings.keys.quit, vec!["q", "Q"]);
        assert_eq!(settings.keys.hard_drop, vec!["Space"]);
        assert_eq!(settings.speed, SpeedSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("pivotris-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        let mut settings = Settings::default();
        settings.speed.speed_factor = 0.05;
        settings.keys.hard_drop = vec!["Enter".to_string()];

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pivotris-does-not-exist/settings.toml");
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let mut settings = Settings::default();
        settings.board.width = 2;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.speed.min_interval_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.speed.speed_factor = f64::NAN;
        assert!(settings.validate().is_err());
    }
}

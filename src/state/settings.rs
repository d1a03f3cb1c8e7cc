/// User settings
///
/// Stored as JSON in the platform config directory:
/// - Linux: ~/.config/instafilter/settings.json
/// - macOS: ~/Library/Application Support/instafilter/settings.json
/// - Windows: %APPDATA%\instafilter\settings.json
///
/// Missing fields fall back to their defaults, so older files keep working.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::filter::{FilterKind, Intensity};

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("could not access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Filter active when the app starts
    pub default_filter: FilterKind,

    /// Slider position when the app starts (0.0 to 1.0)
    pub default_intensity: Intensity,

    /// Imported pictures are reduced so their longest side fits this many pixels
    /// - Keeps recomputation fast enough to run on every slider move
    /// - 0 disables downsizing
    pub working_size: u32,

    /// Duration of each half of the import fade, in milliseconds
    pub fade_millis: u64,

    /// Where saved photos are written (None = platform pictures directory)
    pub album_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_filter: FilterKind::default(),
            default_intensity: Intensity::default(),
            working_size: 1280,
            fade_millis: 500,
            album_dir: None,
        }
    }
}

impl Settings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_millis)
    }

    /// Get the path where the settings file should be stored
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("instafilter");
        path.push("settings.json");
        path
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load settings, writing a default file on first launch
    ///
    /// Never fails: an unreadable file is reported and defaults are used.
    pub fn load_or_init(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            match settings.write_to(path) {
                Ok(()) => log::info!("Wrote default settings to {}", path.display()),
                Err(e) => log::warn!("Could not write default settings: {}", e),
            }
            return settings;
        }

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let mut settings = Settings::default();
        settings.default_filter = FilterKind::Vignette;
        settings.default_intensity = Intensity::new(0.75);
        settings.album_dir = Some(PathBuf::from("/tmp/album"));

        let json = settings.to_json().unwrap();
        let restored = Settings::from_json(&json).unwrap();

        assert_eq!(settings, restored);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = Settings::from_json(r#"{ "default_filter": "pixellate" }"#).unwrap();
        assert_eq!(settings.default_filter, FilterKind::Pixellate);
        assert_eq!(settings.working_size, 1280);
        assert_eq!(settings.fade_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_out_of_range_intensity_is_clamped() {
        let settings = Settings::from_json(r#"{ "default_intensity": 3.0 }"#).unwrap();
        assert_eq!(settings.default_intensity, Intensity::MAX);
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let first = Settings::load_or_init(&path);
        assert!(path.exists());
        assert_eq!(first, Settings::default());

        let second = Settings::load_or_init(&path);
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_or_init(&path), Settings::default());
    }
}

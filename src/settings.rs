use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_LEVEL_DIR, DEFAULT_LEVELS, DEFAULT_NAP_TIME_MS, MAX_NAP_TIME_MS};
use crate::error::WormError;

const APP_DIR_NAME: &str = "terminal-worm";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// User configuration persisted between runs.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause between two frames in milliseconds.
    pub nap_time_ms: u64,
    /// Directory the level list is resolved against.
    pub level_dir: PathBuf,
    /// Level files played in order when no level is named on the command line.
    pub levels: Vec<String>,
    /// Start every run in single-step mode.
    pub start_single_step: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nap_time_ms: DEFAULT_NAP_TIME_MS,
            level_dir: PathBuf::from(DEFAULT_LEVEL_DIR),
            levels: DEFAULT_LEVELS.iter().map(|&name| name.to_owned()).collect(),
            start_single_step: false,
        }
    }
}

impl Settings {
    /// Rejects values the game cannot run with.
    pub fn validate(&self) -> Result<(), WormError> {
        if self.nap_time_ms > MAX_NAP_TIME_MS {
            return Err(WormError::Settings(format!(
                "nap_time_ms must be at most {MAX_NAP_TIME_MS}, got {}",
                self.nap_time_ms
            )));
        }
        if self.levels.is_empty() {
            return Err(WormError::Settings("levels must not be empty".to_owned()));
        }
        Ok(())
    }
}

/// Returns the platform-correct settings file path.
#[must_use]
pub fn settings_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    base
}

/// Loads settings from disk.
///
/// Returns the defaults when the settings file does not exist yet.
/// Returns `Err` when the file exists but cannot be read, parsed or
/// validated, so the caller can warn before falling back to defaults.
pub fn load_settings() -> Result<Settings, WormError> {
    load_settings_from_path(&settings_path())
}

/// Saves settings to disk, creating parent directories when needed.
pub fn save_settings(settings: &Settings) -> io::Result<()> {
    save_settings_to_path(&settings_path(), settings)
}

fn load_settings_from_path(path: &Path) -> Result<Settings, WormError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(WormError::Settings(format!("{}: {e}", path.display()))),
    };

    let settings = serde_json::from_str::<Settings>(&raw)
        .map_err(|e| WormError::Settings(format!("{}: {e}", path.display())))?;
    settings.validate()?;
    Ok(settings)
}

fn save_settings_to_path(path: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{Settings, load_settings_from_path, save_settings_to_path};
    use crate::error::WormError;

    #[test]
    fn settings_serialization_round_trip() {
        let path = unique_test_path("round_trip");
        let settings = Settings {
            nap_time_ms: 40,
            start_single_step: true,
            ..Settings::default()
        };

        save_settings_to_path(&path, &settings).expect("settings save should succeed");
        let loaded = load_settings_from_path(&path).expect("load should succeed");

        assert_eq!(loaded, settings);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_settings_file_returns_defaults() {
        let path = unique_test_path("missing");
        // Deliberately do not create the file.
        let loaded = load_settings_from_path(&path).expect("missing file should return defaults");
        assert_eq!(loaded, Settings::default());
        assert_eq!(loaded.levels.len(), 3);
    }

    #[test]
    fn partial_settings_file_fills_in_defaults() {
        let path = unique_test_path("partial");
        write_test_file(&path, r#"{ "nap_time_ms": 250 }"#);

        let loaded = load_settings_from_path(&path).expect("partial file should load");

        assert_eq!(loaded.nap_time_ms, 250);
        assert_eq!(loaded.levels, Settings::default().levels);
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_settings_file_returns_error() {
        let path = unique_test_path("malformed");
        write_test_file(&path, "not-json");

        assert!(
            matches!(load_settings_from_path(&path), Err(WormError::Settings(_))),
            "malformed file should return Err"
        );

        cleanup_test_path(&path);
    }

    #[test]
    fn unreadable_settings_file_names_the_path() {
        let path = unique_test_path("unreadable");
        // A directory in place of the file cannot be read as text.
        fs::create_dir_all(&path).expect("test directory should be creatable");

        let error = load_settings_from_path(&path).expect_err("directory should not load");

        assert!(matches!(error, WormError::Settings(_)));
        assert!(error.to_string().contains("unreadable-"));
        let _ = fs::remove_dir(&path);
        cleanup_test_path(&path);
    }

    #[test]
    fn out_of_range_nap_time_is_rejected() {
        let settings = Settings {
            nap_time_ms: 60_000,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn empty_level_list_is_rejected() {
        let settings = Settings {
            levels: Vec::new(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("worm-settings-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}

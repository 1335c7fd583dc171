//! Configuration management

use crate::speech::SpeechSettings;
use crate::{Result, VoiceActionsError};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Default target locale for phrases and voices
pub const DEFAULT_LANGUAGE: &str = "es-ES";

/// Application configuration
///
/// Holds the speech settings read from `~/.voiceactions.cfg`. The voice
/// choice itself is not stored here; see [`crate::prefs`].
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.voiceactions.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path).map_err(|e| {
                VoiceActionsError::IniParse(format!("Failed to load config: {}", e))
            })?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default.write_to_file(&path).map_err(|e| {
                VoiceActionsError::IniParse(format!("Failed to write config: {}", e))
            })?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Get config file path (~/.voiceactions.cfg)
    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".voiceactions.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory for state the app writes itself (~/.voiceactions)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".voiceactions")
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("language", DEFAULT_LANGUAGE)
            .set("rate", "-1")
            .set("volume", "-1");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Target locale; its primary subtag decides which voices are listed
    pub fn language(&self) -> String {
        let language = self.get_string("speech", "language", DEFAULT_LANGUAGE);
        if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        }
    }

    /// Speech rate (0-100)
    pub fn rate(&self) -> Option<u8> {
        self.get_int("speech", "rate", -1)
            .try_into()
            .ok()
            .filter(|&r| r <= 100)
    }

    /// Speech volume (0-100)
    pub fn volume(&self) -> Option<u8> {
        self.get_int("speech", "volume", -1)
            .try_into()
            .ok()
            .filter(|&v| v <= 100)
    }

    /// Everything the speech controller needs from the file
    pub fn speech_settings(&self) -> SpeechSettings {
        SpeechSettings {
            language: self.language(),
            rate: self.rate(),
            volume: self.volume(),
        }
    }
}

//! Persisted preferences
//!
//! A tiny namespaced key-value store. The only thing the app keeps in it
//! is the name of the chosen voice.

use crate::{Result, VoiceActionsError};
use ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Namespace holding the app's preferences
pub const DEFAULT_NAMESPACE: &str = "default";

/// Key under which the chosen voice name is stored
pub const VOICE_KEY: &str = "voice_name";

/// Namespaced key-value store
pub trait PreferenceStore: Send {
    /// Read a value; a missing key is `None`, not an error
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// INI-file store: one section per namespace, written through on every set
///
/// Values are stored as JSON strings so that surrounding whitespace,
/// quotes and backslashes come back exactly as they were saved; the INI
/// parser would otherwise trim and unquote them.
pub struct IniStore {
    ini: Ini,
    path: PathBuf,
    namespace: String,
}

impl IniStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. An unreadable one is logged and
    /// treated as empty; it is rewritten on the next `set`.
    pub fn open(path: impl Into<PathBuf>, namespace: &str) -> Self {
        let path = path.into();
        let ini = if path.exists() {
            match Ini::load_from_file_opt(&path, Self::parse_option()) {
                Ok(ini) => ini,
                Err(e) => {
                    warn!("Ignoring unreadable preferences {:?}: {}", path, e);
                    Ini::new()
                }
            }
        } else {
            debug!("No preferences at {:?} yet", path);
            Ini::new()
        };

        Self {
            ini,
            path,
            namespace: namespace.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read values verbatim; decoding is done by `get`
    fn parse_option() -> ParseOption {
        ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        }
    }

    fn write_option() -> WriteOption {
        WriteOption {
            escape_policy: EscapePolicy::Nothing,
            ..WriteOption::default()
        }
    }
}

impl PreferenceStore for IniStore {
    fn get(&self, key: &str) -> Option<String> {
        let raw = self.ini.get_from(Some(self.namespace.as_str()), key)?;
        // Hand-edited files may hold a bare value
        Some(serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        debug!("Preference [{}] {} = {:?}", self.namespace, key, value);
        let encoded = serde_json::to_string(value)?;
        self.ini
            .with_section(Some(self.namespace.as_str()))
            .set(key, encoded);

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        self.ini
            .write_to_file_opt(&self.path, Self::write_option())
            .map_err(|e| {
                VoiceActionsError::Preferences(format!("Failed to write {:?}: {}", self.path, e))
            })
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The saved voice choice
pub struct VoicePreference {
    store: Box<dyn PreferenceStore>,
}

impl VoicePreference {
    pub fn new(store: Box<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Persist the chosen voice name
    pub fn save(&mut self, voice_name: &str) -> Result<()> {
        self.store.set(VOICE_KEY, voice_name)
    }

    /// Saved voice name, if any
    pub fn load(&self) -> Option<String> {
        self.store.get(VOICE_KEY).filter(|name| !name.is_empty())
    }
}

//! Suspended dialog sessions
//!
//! When the app is torn down with the voice dialog open, the unconfirmed
//! pick is written to disk so the next run can reopen the dialog where the
//! user left it.

use crate::speech::Voice;
use crate::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Voices needed to resume a dialog session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Voice active when the dialog first opened (the cancel target)
    pub original: Option<Voice>,
    /// Last previewed voice, not yet confirmed
    pub selected: Option<Voice>,
}

impl SessionSnapshot {
    /// Write the snapshot as JSON, replacing any previous one
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!("Saved dialog session to {:?}", path);
        Ok(())
    }

    /// Read and remove a saved snapshot
    ///
    /// A snapshot is only ever resumed once. Missing or corrupt files
    /// yield `None`.
    pub fn take_from(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove dialog session {:?}: {}", path, e);
        }

        match serde_json::from_str(&contents) {
            Ok(snapshot) => {
                debug!("Loaded dialog session from {:?}", path);
                Some(snapshot)
            }
            Err(e) => {
                warn!("Discarding corrupt dialog session {:?}: {}", path, e);
                None
            }
        }
    }
}

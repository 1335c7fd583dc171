//! Voice selection dialog
//!
//! A modal session over the filtered voice list. Tapping an entry makes
//! it the live voice and speaks a short preview, so the user hears each
//! candidate without leaving the dialog. Accepting persists the last
//! preview; cancelling puts back the voice that was active on open.

pub mod snapshot;

pub use snapshot::SessionSnapshot;

use crate::prefs::VoicePreference;
use crate::speech::{display_titles, preview_phrase, Voice, VoiceControl};
use crate::Result;
use log::{debug, info, warn};

/// Title shown above the voice list
pub const DIALOG_TITLE: &str = "Voices available on this device";

/// Notification handed to the dialog's owner when a voice is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfirmed {
    /// The voice now active and persisted
    pub voice: Voice,
    /// Its position in the voice list
    pub index: usize,
}

/// One open voice selection session
#[derive(Debug, Clone)]
pub struct VoiceDialog {
    voices: Vec<Voice>,
    titles: Vec<String>,
    /// Voice to restore on cancel
    original: Option<Voice>,
    /// Last previewed voice
    selected: Option<Voice>,
    /// Position of the last previewed voice
    highlighted: Option<usize>,
}

impl VoiceDialog {
    /// Open a session over the control's voice list
    ///
    /// Returns `None` when there is nothing to choose from.
    pub fn open(control: &dyn VoiceControl) -> Option<Self> {
        let voices = control.list_voices().to_vec();
        if voices.is_empty() {
            debug!("No voices to choose from, not opening dialog");
            return None;
        }

        let original = control.current_voice();
        debug!(
            "Voice dialog open with {} voices, original {:?}",
            voices.len(),
            original.as_ref().map(|v| &v.name)
        );

        Some(Self {
            titles: display_titles(voices.len()),
            voices,
            original,
            selected: None,
            highlighted: None,
        })
    }

    /// Reopen a session suspended with [`VoiceDialog::snapshot`]
    ///
    /// The original voice is carried over so cancelling still returns to
    /// the voice active when the dialog was first opened. A saved pick
    /// that is no longer in the list is dropped; one that is still there
    /// is re-applied to the engine without a preview.
    pub fn restore(control: &mut dyn VoiceControl, snapshot: &SessionSnapshot) -> Option<Self> {
        let mut dialog = Self::open(control)?;

        if let Some(original) = &snapshot.original {
            dialog.original = Some(original.clone());
        }

        if let Some(saved) = &snapshot.selected {
            match dialog.voices.iter().position(|v| v == saved) {
                Some(index) => {
                    let voice = dialog.voices[index].clone();
                    if let Err(e) = control.set_voice(&voice) {
                        warn!("Failed to re-apply voice {}: {}", voice.name, e);
                    }
                    dialog.selected = Some(voice);
                    dialog.highlighted = Some(index);
                }
                None => debug!("Suspended pick '{}' no longer listed", saved.name),
            }
        }

        info!("Voice dialog restored");
        Some(dialog)
    }

    /// Preview the entry at `index`
    ///
    /// Makes it the live voice and speaks its number. Out-of-range taps
    /// are ignored and return false.
    pub fn tap(&mut self, control: &mut dyn VoiceControl, index: usize) -> bool {
        let Some(voice) = self.voices.get(index).cloned() else {
            debug!("Ignoring tap on entry {} of {}", index + 1, self.voices.len());
            return false;
        };

        debug!("Previewing {} ({})", self.titles[index], voice.name);
        if let Err(e) = control.set_voice(&voice) {
            warn!("Failed to preview voice {}: {}", voice.name, e);
        }
        self.selected = Some(voice);
        self.highlighted = Some(index);
        control.speak(&preview_phrase(index));
        true
    }

    /// Preview the entry after the highlighted one, wrapping around
    pub fn tap_next(&mut self, control: &mut dyn VoiceControl) -> bool {
        let len = self.voices.len();
        let index = match self.highlighted {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.tap(control, index)
    }

    /// Preview the entry before the highlighted one, wrapping around
    pub fn tap_prev(&mut self, control: &mut dyn VoiceControl) -> bool {
        let len = self.voices.len();
        let index = match self.highlighted {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.tap(control, index)
    }

    /// Accept the last preview
    ///
    /// Persists the selected voice and hands `on_confirmed` the result.
    /// With nothing selected this only closes the dialog: the engine keeps
    /// whatever voice it has.
    pub fn confirm(
        self,
        preference: &mut VoicePreference,
        on_confirmed: impl FnOnce(VoiceConfirmed),
    ) -> Result<()> {
        let (Some(voice), Some(index)) = (self.selected, self.highlighted) else {
            debug!("Dialog accepted without a pick");
            return Ok(());
        };

        preference.save(&voice.name)?;
        info!("Voice confirmed: {}", voice.name);
        on_confirmed(VoiceConfirmed { voice, index });
        Ok(())
    }

    /// Close without saving, putting the original voice back
    pub fn cancel(self, control: &mut dyn VoiceControl) {
        match &self.original {
            Some(original) => {
                debug!("Dialog cancelled, reverting to {}", original.name);
                if let Err(e) = control.set_voice(original) {
                    warn!("Failed to revert voice to {}: {}", original.name, e);
                }
            }
            None => debug!("Dialog cancelled, no original voice to revert to"),
        }
    }

    /// Capture what is needed to resume this session later
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            original: self.original.clone(),
            selected: self.selected.clone(),
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn selected(&self) -> Option<&Voice> {
        self.selected.as_ref()
    }

    pub fn original(&self) -> Option<&Voice> {
        self.original.as_ref()
    }
}

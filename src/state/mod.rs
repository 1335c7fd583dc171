//! Application state management
//!
//! The State struct is the central data structure of the phrase board:
//! configuration, the speech controller, the saved voice, the modal
//! handler stack and the voice dialog when it is open.

pub mod config;

use crate::dialog::{SessionSnapshot, VoiceConfirmed, VoiceDialog};
use crate::input::{HandlerStack, VoiceDialogHandler};
use crate::phrases::Phrase;
use crate::prefs::VoicePreference;
use crate::speech::{display_title, EngineState, InitCallback, InitStatus, SpeechController};
use config::Config;
use log::{debug, error, info, warn};
use std::path::PathBuf;

/// Main application state
///
/// Lives for the whole run of the event loop. Everything that speaks or
/// touches voices goes through the one `SpeechController` owned here.
pub struct State {
    /// Configuration loaded from ~/.voiceactions.cfg
    pub config: Config,

    /// Owner of the speech engine
    pub speech: SpeechController,

    /// Saved voice choice
    pub preference: VoicePreference,

    /// Key handler stack for modal input
    /// The voice dialog pushes its handler here while open
    pub handlers: HandlerStack,

    /// Open voice selection session, if any
    pub dialog: Option<VoiceDialog>,

    /// Transient message on the status line, cleared by the next key
    pub notice: Option<String>,

    /// Title of the active voice, when it is one of the listed voices
    pub voice_title: Option<String>,

    /// Where an open dialog is saved on teardown
    snapshot_path: Option<PathBuf>,

    /// Suspended dialog waiting for the engine to come up
    pending_restore: Option<SessionSnapshot>,
}

impl State {
    /// Create state around an engine that has not been started yet
    pub fn new(config: Config, speech: SpeechController, preference: VoicePreference) -> Self {
        info!("Initializing state, config from {:?}", config.path());
        Self {
            config,
            speech,
            preference,
            handlers: HandlerStack::new(),
            dialog: None,
            notice: None,
            voice_title: None,
            snapshot_path: None,
            pending_restore: None,
        }
    }

    /// Save an open dialog to `path` on teardown
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Start the speech engine
    ///
    /// The init status must come back through [`State::on_engine_init`].
    pub fn start(&mut self, on_init: InitCallback) {
        self.speech.initialize(on_init);
    }

    /// Deliver the engine's init result
    ///
    /// A failure is shown as a notice; phrase keys stay inert.
    pub fn on_engine_init(&mut self, status: InitStatus) {
        self.speech.handle_init(status, &self.preference);

        match self.speech.state() {
            EngineState::Failed(code) => {
                self.notice = Some(format!("Error: {}", code));
            }
            EngineState::Ready => {
                self.refresh_voice_title();
                if let Some(snapshot) = self.pending_restore.take() {
                    self.restore_voice_dialog(&snapshot);
                }
            }
            _ => {}
        }
    }

    /// Resume a dialog suspended by a previous run
    ///
    /// Waits for the engine if it is not ready yet.
    pub fn resume_dialog(&mut self, snapshot: SessionSnapshot) {
        if self.speech.is_ready() {
            self.restore_voice_dialog(&snapshot);
        } else {
            self.pending_restore = Some(snapshot);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.speech.is_ready()
    }

    /// Speak a phrase from the board
    pub fn speak_phrase(&mut self, phrase: &Phrase) {
        if !self.is_ready() {
            debug!("Phrase '{}' ignored, engine not ready", phrase.label);
            return;
        }
        debug!("Phrase: {} -> {}", phrase.label, phrase.text);
        self.speech.speak(phrase.text);
    }

    /// Stop current speech
    pub fn silence(&mut self) {
        self.speech.silence();
    }

    /// Can the voice settings be opened at all?
    ///
    /// False when the engine is not ready, cannot list voices, or lists
    /// none for the target language.
    pub fn voice_settings_available(&self) -> bool {
        self.is_ready() && !self.speech.voices().is_empty()
    }

    /// Open the voice dialog
    ///
    /// Returns false, doing nothing, when the dialog is already open or
    /// voice settings are unavailable.
    pub fn open_voice_dialog(&mut self) -> bool {
        if self.dialog.is_some() {
            debug!("Voice dialog already open");
            return false;
        }
        if !self.voice_settings_available() {
            debug!("Voice settings unavailable");
            return false;
        }

        match VoiceDialog::open(&self.speech) {
            Some(dialog) => {
                self.dialog = Some(dialog);
                self.handlers.push(Box::new(VoiceDialogHandler::new()));
                true
            }
            None => false,
        }
    }

    fn restore_voice_dialog(&mut self, snapshot: &SessionSnapshot) {
        if self.dialog.is_some() || !self.voice_settings_available() {
            debug!("Not restoring voice dialog");
            return;
        }

        if let Some(dialog) = VoiceDialog::restore(&mut self.speech, snapshot) {
            self.dialog = Some(dialog);
            self.handlers.push(Box::new(VoiceDialogHandler::new()));
        }
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// Preview entry `index` of the open dialog
    pub fn dialog_tap(&mut self, index: usize) -> bool {
        match self.dialog.as_mut() {
            Some(dialog) => dialog.tap(&mut self.speech, index),
            None => false,
        }
    }

    /// Preview the next entry of the open dialog
    pub fn dialog_next(&mut self) -> bool {
        match self.dialog.as_mut() {
            Some(dialog) => dialog.tap_next(&mut self.speech),
            None => false,
        }
    }

    /// Preview the previous entry of the open dialog
    pub fn dialog_prev(&mut self) -> bool {
        match self.dialog.as_mut() {
            Some(dialog) => dialog.tap_prev(&mut self.speech),
            None => false,
        }
    }

    /// Accept the dialog, persisting the previewed voice
    pub fn confirm_voice_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };

        let mut confirmed = None;
        if let Err(e) = dialog.confirm(&mut self.preference, |c| confirmed = Some(c)) {
            error!("Failed to save voice: {}", e);
            self.notice = Some("Could not save voice".to_string());
        }

        if let Some(confirmed) = confirmed {
            self.on_voice_confirmed(confirmed);
        }
    }

    /// Cancel the dialog, putting the original voice back
    pub fn cancel_voice_dialog(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            dialog.cancel(&mut self.speech);
            self.refresh_voice_title();
        }
    }

    fn on_voice_confirmed(&mut self, confirmed: VoiceConfirmed) {
        info!("Active voice is now {}", confirmed.voice.name);
        self.voice_title = Some(display_title(confirmed.index));
    }

    fn refresh_voice_title(&mut self) {
        self.voice_title = self.speech.voice().and_then(|current| {
            self.speech
                .voices()
                .iter()
                .position(|v| *v == current)
                .map(display_title)
        });
    }

    /// Clear the status line notice
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Save an open dialog so the next run can resume it
    ///
    /// Called when the app is being torn down.
    pub fn suspend(&mut self) {
        let (Some(dialog), Some(path)) = (self.dialog.as_ref(), self.snapshot_path.as_ref()) else {
            return;
        };

        match dialog.snapshot().save_to(path) {
            Ok(()) => info!("Voice dialog suspended to {:?}", path),
            Err(e) => warn!("Failed to suspend voice dialog: {}", e),
        }
    }

    /// Stop speech and release the engine
    pub fn shutdown(&mut self) {
        self.speech.shutdown();
    }
}

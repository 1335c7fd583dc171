//! Speech controller
//!
//! Owns the one speech engine the app uses for its whole lifetime.
//! Phrase playback and voice selection both go through here, and
//! nothing can be spoken until the engine has reported `Ready`.

use super::{
    preview_phrase, InitCallback, InitStatus, SpeechEngine, Voice, VoiceFilter, VoiceList,
};
use crate::prefs::VoicePreference;
use crate::{Result, VoiceActionsError};
use log::{debug, error, info, warn};

/// Engine settings taken from the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSettings {
    /// Target locale (e.g. "es-ES")
    pub language: String,
    /// Speech rate (0-100), engine default when unset
    pub rate: Option<u8>,
    /// Speech volume (0-100), engine default when unset
    pub volume: Option<u8>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "es-ES".to_string(),
            rate: None,
            volume: None,
        }
    }
}

/// Lifecycle of the engine as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// `initialize` has not been called
    Uninitialized,
    /// Waiting for the init callback
    Initializing,
    /// Engine is up; phrases can be spoken
    Ready,
    /// Engine failed to start with this code; nothing will be spoken
    Failed(i32),
    /// Engine has been released
    ShutDown,
}

/// Whether voices can be listed on this engine, decided once at ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSupport {
    /// Voices are listed; holds the filtered list
    Supported(VoiceList),
    /// The engine does not expose voice metadata
    Unsupported,
}

/// The operations the voice dialog needs from the speech side
pub trait VoiceControl {
    /// Speak text, interrupting whatever is playing
    fn speak(&mut self, text: &str);

    /// Filtered voice list (empty when unavailable)
    fn list_voices(&self) -> &[Voice];

    /// Make `voice` the active voice
    fn set_voice(&mut self, voice: &Voice) -> Result<()>;

    /// Currently active voice, if known
    fn current_voice(&self) -> Option<Voice>;
}

/// Owner of the speech engine
pub struct SpeechController {
    engine: Box<dyn SpeechEngine>,
    settings: SpeechSettings,
    filter: VoiceFilter,
    state: EngineState,
    support: VoiceSupport,
    /// Last voice this controller put on the engine; stands in for the
    /// active voice on platforms that cannot report it
    applied: Option<Voice>,
}

impl SpeechController {
    /// Wrap an engine that has not been started yet
    pub fn new(engine: Box<dyn SpeechEngine>, settings: SpeechSettings) -> Self {
        let filter = VoiceFilter::for_locale(&settings.language);
        Self {
            engine,
            settings,
            filter,
            state: EngineState::Uninitialized,
            support: VoiceSupport::Unsupported,
            applied: None,
        }
    }

    /// Start the engine
    ///
    /// `on_init` is invoked once, possibly from another thread. The caller
    /// must hand the status back through [`SpeechController::handle_init`]
    /// on the UI thread. Calling this twice is a no-op.
    pub fn initialize(&mut self, on_init: InitCallback) {
        if self.state != EngineState::Uninitialized {
            warn!("Speech controller already started ({:?})", self.state);
            return;
        }
        info!("Starting speech engine");
        self.state = EngineState::Initializing;
        self.engine.initialize(on_init);
    }

    /// Process the engine's init result
    ///
    /// On `Ready`: list and filter voices, set the target language,
    /// restore the saved voice and unlock playback. On `Failed` playback
    /// stays disabled; there is no retry.
    pub fn handle_init(&mut self, status: InitStatus, preference: &VoicePreference) {
        if self.state != EngineState::Initializing {
            warn!(
                "Ignoring engine init result {:?} in state {:?}",
                status, self.state
            );
            return;
        }

        match status {
            InitStatus::Failed(code) => {
                error!("Speech engine failed to start (code {})", code);
                self.state = EngineState::Failed(code);
            }
            InitStatus::Ready => {
                info!("Speech engine ready");
                self.support = self.discover_voices();

                match self.engine.set_language(&self.settings.language) {
                    Ok(picked) => self.applied = picked,
                    Err(e) => warn!("Failed to set language {}: {}", self.settings.language, e),
                }

                self.restore_voice(preference);
                self.apply_settings();
                self.state = EngineState::Ready;
            }
        }
    }

    fn discover_voices(&self) -> VoiceSupport {
        if !self.engine.supports_voices() {
            info!("Engine does not list voices, voice selection disabled");
            return VoiceSupport::Unsupported;
        }

        match self.engine.voices() {
            Ok(catalog) => {
                let list = VoiceList::from_catalog(catalog, &self.filter);
                info!("{} selectable voices", list.len());
                VoiceSupport::Supported(list)
            }
            Err(e) => {
                warn!("Failed to list voices: {}", e);
                VoiceSupport::Unsupported
            }
        }
    }

    /// Apply the persisted voice if it is still in the list
    fn restore_voice(&mut self, preference: &VoicePreference) {
        let Some(name) = preference.load() else {
            debug!("No saved voice, keeping engine default");
            return;
        };

        let saved = match &self.support {
            VoiceSupport::Supported(list) => list.find(&name).cloned(),
            VoiceSupport::Unsupported => None,
        };

        match saved {
            Some(voice) => {
                info!("Restoring saved voice {}", voice.name);
                match self.engine.set_voice(&voice) {
                    Ok(()) => self.applied = Some(voice),
                    Err(e) => warn!("Failed to restore voice {}: {}", voice.name, e),
                }
            }
            None => debug!("Saved voice '{}' not available, keeping engine default", name),
        }
    }

    fn apply_settings(&mut self) {
        if let Some(rate) = self.settings.rate {
            if let Err(e) = self.engine.set_rate(rate) {
                warn!("Failed to set rate {}: {}", rate, e);
            }
        }
        if let Some(volume) = self.settings.volume {
            if let Err(e) = self.engine.set_volume(volume) {
                warn!("Failed to set volume {}: {}", volume, e);
            }
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EngineState::Ready
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.settings
    }

    /// Voice listing capability, decided when the engine became ready
    pub fn voice_support(&self) -> &VoiceSupport {
        &self.support
    }

    /// Filtered voice list (empty before ready or when unsupported)
    pub fn voices(&self) -> &[Voice] {
        match &self.support {
            VoiceSupport::Supported(list) => list.voices(),
            VoiceSupport::Unsupported => &[],
        }
    }

    /// Display titles parallel to [`SpeechController::voices`]
    pub fn titles(&self) -> &[String] {
        match &self.support {
            VoiceSupport::Supported(list) => list.titles(),
            VoiceSupport::Unsupported => &[],
        }
    }

    /// Speak text, cutting off whatever is playing
    ///
    /// Fire-and-forget: failures are logged, and nothing is spoken
    /// before the engine is ready.
    pub fn speak(&mut self, text: &str) {
        if !self.is_ready() {
            debug!("Engine not ready, dropping speech: {}", text);
            return;
        }
        if let Err(e) = self.engine.speak(text, true) {
            warn!("Speech failed: {}", e);
        }
    }

    /// Stop current speech
    pub fn silence(&mut self) {
        if !self.is_ready() {
            return;
        }
        if let Err(e) = self.engine.stop() {
            warn!("Failed to stop speech: {}", e);
        }
    }

    /// Make `voice` the active voice for subsequent speech
    pub fn set_voice(&mut self, voice: &Voice) -> Result<()> {
        if !self.is_ready() {
            return Err(VoiceActionsError::Speech(
                "speech engine not ready".to_string(),
            ));
        }
        debug!("Active voice -> {}", voice.name);
        self.engine.set_voice(voice)?;
        self.applied = Some(voice.clone());
        Ok(())
    }

    /// Active voice
    ///
    /// Asks the engine first. When it cannot tell (Speech Dispatcher
    /// never reports one), this is the last voice the controller applied.
    pub fn voice(&self) -> Option<Voice> {
        if !self.is_ready() {
            return None;
        }
        match self.engine.voice() {
            Ok(Some(voice)) => Some(voice),
            Ok(None) => self.applied.clone(),
            Err(e) => {
                warn!("Failed to read active voice: {}", e);
                self.applied.clone()
            }
        }
    }

    /// Speak the preview phrase for the voice at `index`
    pub fn preview(&mut self, index: usize) {
        self.speak(&preview_phrase(index));
    }

    /// Stop speech and release the engine
    ///
    /// Safe before initialization completed and when called again.
    pub fn shutdown(&mut self) {
        if self.state == EngineState::ShutDown {
            return;
        }
        info!("Shutting down speech engine");
        self.engine.shutdown();
        self.state = EngineState::ShutDown;
        self.support = VoiceSupport::Unsupported;
        self.applied = None;
    }
}

impl VoiceControl for SpeechController {
    fn speak(&mut self, text: &str) {
        SpeechController::speak(self, text)
    }

    fn list_voices(&self) -> &[Voice] {
        self.voices()
    }

    fn set_voice(&mut self, voice: &Voice) -> Result<()> {
        SpeechController::set_voice(self, voice)
    }

    fn current_voice(&self) -> Option<Voice> {
        self.voice()
    }
}

impl Drop for SpeechController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

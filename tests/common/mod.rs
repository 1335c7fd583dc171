//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::mpsc;
use tempfile::TempDir;
use voiceactions::input::{create_default_keymap, dispatch, BoardHandler, HandlerAction};
use voiceactions::prefs::{IniStore, PreferenceStore, VoicePreference, DEFAULT_NAMESPACE, VOICE_KEY};
use voiceactions::speech::backends::{MemoryEngine, MemoryHandle};
use voiceactions::speech::{InitStatus, SpeechController, Voice};
use voiceactions::state::config::Config;
use voiceactions::state::State;

pub fn voice(name: &str, lang: &str) -> Voice {
    Voice::new(format!("id-{}", name), name, lang)
}

/// Engine default voice, not part of the filtered list
pub fn default_voice() -> Voice {
    voice("es-female-0", "es-ES")
}

/// Catalog whose filtered list is es-male-1, es-male-2, es-male-3
pub fn spanish_catalog() -> Vec<Voice> {
    vec![
        default_voice(),
        voice("es-male-1", "es-ES"),
        voice("en-male-9", "en-US"),
        voice("es-male-2", "es-MX"),
        voice("es-female-5", "es-ES"),
        voice("es-male-3", "es-ES"),
    ]
}

pub fn spanish_engine() -> MemoryEngine {
    MemoryEngine::new(spanish_catalog()).with_default_voice(default_voice())
}

/// A State wired to a memory engine and on-disk stores in a temp dir
pub struct Harness {
    pub state: State,
    pub engine: MemoryHandle,
    pub board: BoardHandler,
    pub dir: TempDir,
    init_rx: mpsc::Receiver<InitStatus>,
}

impl Harness {
    /// Build without starting the engine
    pub fn build(engine: MemoryEngine, saved_voice: Option<&str>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs_path = dir.path().join("preferences.ini");

        if let Some(name) = saved_voice {
            IniStore::open(&prefs_path, DEFAULT_NAMESPACE)
                .set(VOICE_KEY, name)
                .expect("seed preference");
        }

        let config = Config::load_from(dir.path().join("voiceactions.cfg")).expect("config");
        let handle = engine.handle();
        let speech = SpeechController::new(Box::new(engine), config.speech_settings());
        let preference = VoicePreference::new(Box::new(IniStore::open(&prefs_path, DEFAULT_NAMESPACE)));
        let mut state = State::new(config, speech, preference)
            .with_snapshot_path(dir.path().join("dialog.json"));

        let (tx, init_rx) = mpsc::channel();
        state.start(Box::new(move |status| {
            let _ = tx.send(status);
        }));

        Self {
            state,
            engine: handle,
            board: BoardHandler::new(create_default_keymap()),
            dir,
            init_rx,
        }
    }

    /// Build and deliver the engine's init result
    pub fn ready(engine: MemoryEngine, saved_voice: Option<&str>) -> Self {
        let mut harness = Self::build(engine, saved_voice);
        harness.deliver_init();
        harness
    }

    /// Hand any pending init result to the state, as the UI loop does
    pub fn deliver_init(&mut self) -> bool {
        match self.init_rx.try_recv() {
            Ok(status) => {
                self.state.on_engine_init(status);
                true
            }
            Err(_) => false,
        }
    }

    pub fn press(&mut self, key: &[u8]) -> HandlerAction {
        dispatch(key, &mut self.state, &mut self.board).expect("dispatch")
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.dir.path().join("preferences.ini")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("dialog.json")
    }

    /// Voice name currently persisted on disk
    pub fn saved_voice(&self) -> Option<String> {
        IniStore::open(self.prefs_path(), DEFAULT_NAMESPACE).get(VOICE_KEY)
    }

    pub fn current_voice_name(&self) -> Option<String> {
        self.engine.current_voice().map(|v| v.name)
    }
}

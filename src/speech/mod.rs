//! Speech synthesis system

pub mod backends;
pub mod controller;
pub mod engine;
pub mod voice;

pub use controller::{EngineState, SpeechController, SpeechSettings, VoiceControl, VoiceSupport};
pub use engine::{InitCallback, InitStatus, SpeechEngine, INIT_ERROR};
pub use voice::{
    display_title, display_titles, preview_phrase, primary_subtag, Voice, VoiceFilter, VoiceList,
};

//! Speech controller tests
//!
//! Startup sequence, voice filtering, saved voice restore and
//! flush-then-speak playback against the in-memory engine.

mod common;

use common::{default_voice, spanish_engine, voice, Harness};
use voiceactions::phrases::PHRASES;
use voiceactions::speech::backends::{InitBehavior, MemoryEngine};
use voiceactions::speech::{EngineState, InitStatus, VoiceSupport};

#[test]
fn test_voice_list_scenario() {
    let engine = MemoryEngine::new(vec![
        voice("es-female-1", "es-ES"),
        voice("es-male-1", "es-ES"),
        voice("en-male-1", "en-US"),
    ]);
    let harness = Harness::ready(engine, None);

    let voices = harness.state.speech.voices();
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].name, "es-male-1");
    assert_eq!(harness.state.speech.titles(), &["Voice #1".to_string()]);
}

#[test]
fn test_voice_list_keeps_engine_order() {
    let harness = Harness::ready(spanish_engine(), None);

    let names: Vec<&str> = harness
        .state
        .speech
        .voices()
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["es-male-1", "es-male-2", "es-male-3"]);

    let titles = harness.state.speech.titles();
    assert_eq!(titles, &["Voice #1", "Voice #2", "Voice #3"].map(String::from));
}

#[test]
fn test_ready_sets_target_language() {
    let harness = Harness::ready(spanish_engine(), None);
    assert_eq!(harness.engine.language().as_deref(), Some("es-ES"));
    assert!(harness.state.is_ready());
}

#[test]
fn test_saved_voice_is_restored() {
    let harness = Harness::ready(spanish_engine(), Some("es-male-2"));
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-2"));
    assert_eq!(harness.state.voice_title.as_deref(), Some("Voice #2"));
}

#[test]
fn test_unknown_saved_voice_keeps_default() {
    let harness = Harness::ready(spanish_engine(), Some("es-male-42"));
    assert_eq!(harness.engine.current_voice(), Some(default_voice()));
    assert_eq!(harness.state.voice_title, None);
}

#[test]
fn test_saved_voice_outside_filter_is_not_applied() {
    // Present in the catalog but filtered out of the list
    let harness = Harness::ready(spanish_engine(), Some("en-male-9"));
    assert_eq!(harness.engine.current_voice(), Some(default_voice()));
}

#[test]
fn test_phrases_inert_until_ready() {
    let engine = spanish_engine().with_init(InitBehavior::Deferred);
    let mut harness = Harness::build(engine, None);

    harness.press(b"1");
    assert!(harness.engine.spoken().is_empty());
    assert_eq!(harness.state.speech.state(), EngineState::Initializing);

    assert!(harness.engine.complete_init(InitStatus::Ready));
    assert!(harness.deliver_init());

    harness.press(b"1");
    assert_eq!(harness.engine.spoken(), vec!["Sí"]);
}

#[test]
fn test_init_failure_shows_notice_and_stays_inert() {
    let engine = spanish_engine().with_init(InitBehavior::Fail(-3));
    let mut harness = Harness::ready(engine, Some("es-male-1"));

    assert_eq!(harness.state.speech.state(), EngineState::Failed(-3));
    assert_eq!(harness.state.notice.as_deref(), Some("Error: -3"));
    assert!(!harness.state.voice_settings_available());

    // Next key dismisses the notice but still speaks nothing
    harness.press(b"v");
    assert!(harness.state.notice.is_none());
    assert!(harness.engine.spoken().is_empty());
}

#[test]
fn test_phrase_keys_speak_phrases() {
    let mut harness = Harness::ready(spanish_engine(), None);

    for phrase in PHRASES.iter() {
        let key = phrase.key.to_string();
        harness.press(key.as_bytes());
        assert_eq!(harness.engine.playing().as_deref(), Some(phrase.text));
    }
    assert_eq!(harness.engine.spoken().len(), PHRASES.len());
}

#[test]
fn test_new_phrase_interrupts_current_one() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"r"); // "Quiero ver televisión"
    harness.press(b"v"); // "Tengo una emergencia"

    assert_eq!(harness.engine.interrupted(), vec!["Quiero ver televisión"]);
    assert_eq!(harness.engine.playing().as_deref(), Some("Tengo una emergencia"));

    harness.engine.finish_current();
    assert_eq!(harness.engine.completed(), vec!["Tengo una emergencia"]);
}

#[test]
fn test_silence_stops_speech() {
    let mut harness = Harness::ready(spanish_engine(), None);
    harness.press(b"3");
    harness.press(b"\x1bx");
    assert_eq!(harness.engine.playing(), None);
    assert_eq!(harness.engine.interrupted(), vec!["Comida"]);
}

#[test]
fn test_unsupported_voice_listing_hides_settings() {
    let engine = spanish_engine().without_voice_support();
    let mut harness = Harness::ready(engine, Some("es-male-1"));

    assert_eq!(harness.state.speech.voice_support(), &VoiceSupport::Unsupported);
    assert!(!harness.state.voice_settings_available());
    assert_eq!(harness.engine.current_voice(), Some(default_voice()));

    // Opening settings is a silent no-op; phrases still work
    harness.press(b"\x1bv");
    assert!(!harness.state.dialog_open());
    harness.press(b"2");
    assert_eq!(harness.engine.spoken(), vec!["No"]);
}

#[test]
fn test_shutdown_releases_engine_once() {
    let mut harness = Harness::ready(spanish_engine(), None);
    harness.press(b"1");
    harness.state.shutdown();
    harness.state.shutdown();

    assert_eq!(harness.engine.shutdowns(), 1);
    assert_eq!(harness.engine.playing(), None);
    assert_eq!(harness.state.speech.state(), EngineState::ShutDown);
}

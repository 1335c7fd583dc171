//! Voice dialog tests
//!
//! Preview, confirm and cancel flows driven through key presses, plus
//! suspending and resuming an unconfirmed pick.

mod common;

use common::{default_voice, spanish_engine, Harness};
use voiceactions::dialog::SessionSnapshot;
use voiceactions::input::{split_keys, HandlerAction};
use voiceactions::speech::backends::InitBehavior;
use voiceactions::speech::InitStatus;

#[test]
fn test_cancel_reverts_to_original_voice() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    assert!(harness.state.dialog_open());

    harness.press(b"2");
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-2"));
    assert_eq!(harness.engine.playing().as_deref(), Some("Voice number 2"));

    harness.press(b"\x1b");
    assert!(!harness.state.dialog_open());
    assert_eq!(harness.engine.current_voice(), Some(default_voice()));
    assert_eq!(harness.saved_voice(), None);
}

#[test]
fn test_confirm_persists_and_keeps_voice() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    harness.press(b"1");
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-1"));

    harness.press(b"\r");
    assert!(!harness.state.dialog_open());
    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-1"));
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-1"));
    assert_eq!(harness.state.voice_title.as_deref(), Some("Voice #1"));
}

#[test]
fn test_confirm_overwrites_previous_choice() {
    let mut harness = Harness::ready(spanish_engine(), Some("es-male-1"));

    harness.press(b"\x1bv");
    harness.press(b"3");
    harness.press(b"y");

    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-3"));
}

#[test]
fn test_last_preview_wins() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    harness.press(b"1");
    harness.press(b"3");
    harness.press(b"2");
    harness.press(b"\r");

    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-2"));
    assert_eq!(
        harness.engine.spoken(),
        vec!["Voice number 1", "Voice number 3", "Voice number 2"]
    );
}

#[test]
fn test_accept_without_pick_changes_nothing() {
    let mut harness = Harness::ready(spanish_engine(), Some("es-male-3"));

    harness.press(b"\x1bv");
    harness.press(b"\r");

    assert!(!harness.state.dialog_open());
    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-3"));
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-3"));
}

#[test]
fn test_arrow_keys_preview_in_order() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    harness.press(b"\x1b[B");
    harness.press(b"\x1b[B");
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-2"));

    harness.press(b"\x1b[A");
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-1"));
    assert_eq!(harness.state.dialog.as_ref().unwrap().highlighted(), Some(0));
}

#[test]
fn test_out_of_range_digit_is_ignored() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    harness.press(b"9");

    assert!(harness.state.dialog_open());
    assert!(harness.engine.spoken().is_empty());
    assert_eq!(harness.engine.current_voice(), Some(default_voice()));
}

#[test]
fn test_dialog_captures_phrase_keys() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    // "w" would speak "Quiero bañarme" on the board
    harness.press(b"w");

    assert!(harness.state.dialog_open());
    assert!(harness.engine.spoken().is_empty());
}

#[test]
fn test_reopening_is_a_noop() {
    let mut harness = Harness::ready(spanish_engine(), None);

    assert!(harness.state.open_voice_dialog());
    harness.state.dialog_tap(1);
    assert!(!harness.state.open_voice_dialog());

    // The open session keeps its pick and its single handler
    assert_eq!(harness.state.handlers.len(), 1);
    assert_eq!(harness.state.dialog.as_ref().unwrap().highlighted(), Some(1));
}

#[test]
fn test_dialog_needs_ready_engine() {
    let engine = spanish_engine().with_init(InitBehavior::Deferred);
    let mut harness = Harness::build(engine, None);

    harness.press(b"\x1bv");
    assert!(!harness.state.dialog_open());
}

#[test]
fn test_quit_inside_dialog_suspends_session() {
    let mut harness = Harness::ready(spanish_engine(), None);

    harness.press(b"\x1bv");
    harness.press(b"3");
    assert_eq!(harness.press(b"\x04"), HandlerAction::Exit);

    harness.state.suspend();
    let snapshot = SessionSnapshot::take_from(&harness.snapshot_path()).expect("snapshot");
    assert_eq!(snapshot.original, Some(default_voice()));
    assert_eq!(snapshot.selected.map(|v| v.name).as_deref(), Some("es-male-3"));
    assert_eq!(harness.saved_voice(), None);
}

#[test]
fn test_suspend_without_dialog_writes_nothing() {
    let mut harness = Harness::ready(spanish_engine(), None);
    harness.state.suspend();
    assert!(!harness.snapshot_path().exists());
}

#[test]
fn test_resumed_dialog_cancels_to_first_original() {
    // First run: pick voice 3, then get torn down
    let mut first = Harness::ready(spanish_engine(), None);
    first.press(b"\x1bv");
    first.press(b"3");
    first.state.suspend();
    let snapshot = SessionSnapshot::take_from(&first.snapshot_path()).expect("snapshot");

    // Second run starts on a saved voice; the snapshot waits for ready
    let engine = spanish_engine().with_init(InitBehavior::Deferred);
    let mut second = Harness::build(engine, Some("es-male-1"));
    second.state.resume_dialog(snapshot);
    assert!(!second.state.dialog_open());

    second.engine.complete_init(InitStatus::Ready);
    second.deliver_init();

    assert!(second.state.dialog_open());
    assert_eq!(second.current_voice_name().as_deref(), Some("es-male-3"));
    assert_eq!(second.state.dialog.as_ref().unwrap().highlighted(), Some(2));

    second.press(b"n");
    assert_eq!(second.engine.current_voice(), Some(default_voice()));
}

#[test]
fn test_resumed_dialog_can_confirm_pick() {
    let snapshot = SessionSnapshot {
        original: Some(default_voice()),
        selected: Some(common::voice("es-male-2", "es-MX")),
    };

    let mut harness = Harness::ready(spanish_engine(), None);
    harness.state.resume_dialog(snapshot);
    assert!(harness.state.dialog_open());

    harness.press(b"\r");
    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-2"));
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-2"));
}

#[test]
fn test_resumed_pick_no_longer_listed_is_dropped() {
    let snapshot = SessionSnapshot {
        original: Some(default_voice()),
        selected: Some(common::voice("es-male-77", "es-ES")),
    };

    let mut harness = Harness::ready(spanish_engine(), None);
    harness.state.resume_dialog(snapshot);

    let dialog = harness.state.dialog.as_ref().expect("dialog");
    assert!(dialog.selected().is_none());
    assert_eq!(harness.engine.current_voice(), Some(default_voice()));
}

#[test]
fn test_cancel_reverts_when_engine_cannot_report_voice() {
    let engine = spanish_engine().without_get_voice();
    let mut harness = Harness::ready(engine, Some("es-male-1"));
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-1"));
    assert_eq!(harness.state.voice_title.as_deref(), Some("Voice #1"));

    harness.press(b"\x1bv");
    harness.press(b"3");
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-3"));

    harness.press(b"\x1b");
    assert_eq!(harness.current_voice_name().as_deref(), Some("es-male-1"));
    assert_eq!(harness.state.voice_title.as_deref(), Some("Voice #1"));
}

#[test]
fn test_cancel_reverts_to_language_voice_without_saved_choice() {
    let engine = spanish_engine().without_get_voice();
    let mut harness = Harness::ready(engine, None);

    harness.press(b"\x1bv");
    harness.press(b"2");
    harness.press(b"n");

    assert_eq!(harness.engine.current_voice(), Some(default_voice()));
}

#[test]
fn test_confirm_updates_title_when_engine_cannot_report_voice() {
    let engine = spanish_engine().without_get_voice();
    let mut harness = Harness::ready(engine, None);

    harness.press(b"\x1bv");
    harness.press(b"2");
    harness.press(b"\r");

    assert_eq!(harness.state.voice_title.as_deref(), Some("Voice #2"));
    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-2"));
}

#[test]
fn test_fast_typing_in_one_read() {
    let mut harness = Harness::ready(spanish_engine(), None);

    // Open, preview the first voice, step down and accept, all in one read
    for key in split_keys(b"\x1bv1\x1b[B\r") {
        harness.press(key);
    }

    assert!(!harness.state.dialog_open());
    assert_eq!(harness.saved_voice().as_deref(), Some("es-male-2"));
    assert_eq!(harness.engine.spoken(), vec!["Voice number 1", "Voice number 2"]);
}

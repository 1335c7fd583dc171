//! Input system tests
//!
//! Tests the key handler stack, key bindings, key splitting and
//! what the screen shows for each mode

mod common;

use common::{spanish_engine, Harness};
use std::cell::Cell;
use std::rc::Rc;
use voiceactions::dialog::DIALOG_TITLE;
use voiceactions::input::{
    create_default_keymap, create_dialog_keymap, split_keys, DialogAction, HandlerAction,
    HandlerStack, KeyAction, KeyHandler,
};
use voiceactions::phrases::PHRASES;
use voiceactions::state::State;
use voiceactions::terminal::render;
use voiceactions::Result;

struct TestHandler {
    seen: Rc<Cell<usize>>,
}

impl KeyHandler for TestHandler {
    fn process(&mut self, key: &[u8], _state: &mut State) -> Result<HandlerAction> {
        self.seen.set(self.seen.get() + 1);
        if key == b"x" {
            Ok(HandlerAction::Remove)
        } else {
            Ok(HandlerAction::Passthrough)
        }
    }
}

#[test]
fn test_handler_stack() {
    let mut stack = HandlerStack::new();
    assert!(stack.is_empty());

    stack.push(Box::new(TestHandler { seen: Rc::default() }));
    assert_eq!(stack.len(), 1);
    assert!(stack.pop().is_some());
    assert!(stack.pop().is_none());
}

#[test]
fn test_dispatch_through_modal_handler() {
    let mut harness = Harness::ready(spanish_engine(), None);
    let seen = Rc::new(Cell::new(0));
    harness.state.handlers.push(Box::new(TestHandler { seen: Rc::clone(&seen) }));

    // Passed through to the board, handler stays
    assert_eq!(harness.press(b"a"), HandlerAction::Handled);
    assert_eq!(harness.engine.spoken(), vec!["Tengo calor"]);
    assert_eq!(harness.state.handlers.len(), 1);

    // Handler removes itself and swallows the key
    assert_eq!(harness.press(b"x"), HandlerAction::Handled);
    assert!(harness.state.handlers.is_empty());
    assert_eq!(harness.engine.spoken(), vec!["Tengo calor"]);
    assert_eq!(seen.get(), 2);
}

#[test]
fn test_keymap_creation() {
    let keymap = create_default_keymap();

    // Every phrase in board order, lower and upper case
    for (i, phrase) in PHRASES.iter().enumerate() {
        let key = phrase.key.to_string();
        assert_eq!(keymap.get(key.as_bytes()), Some(&KeyAction::Phrase(i)));
        let upper = phrase.key.to_ascii_uppercase().to_string();
        assert_eq!(keymap.get(upper.as_bytes()), Some(&KeyAction::Phrase(i)));
    }

    assert_eq!(keymap.get(&b"\x1bv".to_vec()), Some(&KeyAction::VoiceSettings));
    assert_eq!(keymap.get(&b"\x1bx".to_vec()), Some(&KeyAction::Silence));
    assert_eq!(keymap.get(&b"\x1bq".to_vec()), Some(&KeyAction::Quit));
    assert_eq!(keymap.get(&b"\x03".to_vec()), Some(&KeyAction::Quit));
    assert_eq!(keymap.get(&b"p".to_vec()), None);
}

#[test]
fn test_dialog_keymap_creation() {
    let keymap = create_dialog_keymap();

    assert_eq!(keymap.get(&b"1".to_vec()), Some(&DialogAction::Tap(0)));
    assert_eq!(keymap.get(&b"9".to_vec()), Some(&DialogAction::Tap(8)));
    assert_eq!(keymap.get(&b"0".to_vec()), None);
    assert_eq!(keymap.get(&b"\x1b[B".to_vec()), Some(&DialogAction::Next));
    assert_eq!(keymap.get(&b"\x1bOA".to_vec()), Some(&DialogAction::Prev));
    assert_eq!(keymap.get(&b"\r".to_vec()), Some(&DialogAction::Accept));
    assert_eq!(keymap.get(&b"\x1b".to_vec()), Some(&DialogAction::Cancel));
    assert_eq!(keymap.get(&b"\x04".to_vec()), Some(&DialogAction::Quit));
}

#[test]
fn test_split_keys() {
    assert_eq!(split_keys(b"12q"), vec![&b"1"[..], &b"2"[..], &b"q"[..]]);
    assert_eq!(split_keys(b"\x1b[A"), vec![&b"\x1b[A"[..]]);
    assert_eq!(split_keys("ñ1".as_bytes()), vec!["ñ".as_bytes(), &b"1"[..]]);
    assert!(split_keys(b"").is_empty());
}

#[test]
fn test_board_ignores_unbound_keys() {
    let mut harness = Harness::ready(spanish_engine(), None);
    assert_eq!(harness.press(b"p"), HandlerAction::Passthrough);
    assert_eq!(harness.press(b"\x1bq"), HandlerAction::Exit);
    assert!(harness.engine.spoken().is_empty());
}

#[test]
fn test_dialog_handler_leaves_stack_on_close() {
    let mut harness = Harness::ready(spanish_engine(), None);

    assert_eq!(harness.press(b"\x1bv"), HandlerAction::Handled);
    assert_eq!(harness.state.handlers.len(), 1);
    assert_eq!(harness.press(b"z"), HandlerAction::Handled);

    assert_eq!(harness.press(b"q"), HandlerAction::Handled);
    assert!(harness.state.handlers.is_empty());

    // Back on the board, "q" speaks again
    harness.press(b"q");
    assert_eq!(harness.engine.playing().as_deref(), Some("Baño"));
}

#[test]
fn test_render_board() {
    let harness = Harness::ready(spanish_engine(), None);
    let screen = render(&harness.state, 120);

    for phrase in PHRASES.iter() {
        assert!(screen.contains(phrase.label), "missing {}", phrase.label);
        assert!(screen.contains(phrase.text), "missing {}", phrase.text);
    }
    assert!(screen.contains("[alt+v] Voices"));
    assert!(screen.contains("Voice: default"));
}

#[test]
fn test_render_narrow_terminal() {
    let harness = Harness::ready(spanish_engine(), None);
    let screen = render(&harness.state, 20);
    assert!(screen.contains("[1] Yes - Sí\r\n"));
}

#[test]
fn test_render_dialog() {
    let mut harness = Harness::ready(spanish_engine(), None);
    harness.press(b"\x1bv");
    harness.press(b"2");

    let screen = render(&harness.state, 80);
    assert!(screen.contains(DIALOG_TITLE));
    assert!(screen.contains("  > Voice #2"));
    assert!(screen.contains("    Voice #1"));
    assert!(!screen.contains(PHRASES[0].text));
}

#[test]
fn test_render_failed_engine() {
    let engine = spanish_engine().with_init(voiceactions::speech::backends::InitBehavior::Fail(-1));
    let mut harness = Harness::ready(engine, None);

    assert!(render(&harness.state, 80).contains("Error: -1"));
    harness.press(b"1");
    let screen = render(&harness.state, 80);
    assert!(screen.contains("Speech unavailable"));
    assert!(!screen.contains("[alt+v] Voices"));
}

//! Key bindings for the board and the voice dialog

use crate::phrases::PHRASES;
use std::collections::HashMap;

/// Key sequence type
pub type KeySequence = Vec<u8>;

/// Board commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Speak the phrase at this board position
    Phrase(usize),
    /// Open the voice dialog
    VoiceSettings,
    /// Stop current speech
    Silence,
    /// Leave the program
    Quit,
}

/// Commands inside the voice dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    /// Preview the entry at this 0-based position
    Tap(usize),
    Next,
    Prev,
    /// Keep the previewed voice ("Use")
    Accept,
    /// Revert and close ("Cancel")
    Cancel,
    Quit,
}

/// Create the board keymap
pub fn create_default_keymap() -> HashMap<KeySequence, KeyAction> {
    let mut map = HashMap::new();

    // Phrase grid, with caps lock variants
    for (i, phrase) in PHRASES.iter().enumerate() {
        let mut buf = [0u8; 4];
        map.insert(
            phrase.key.encode_utf8(&mut buf).as_bytes().to_vec(),
            KeyAction::Phrase(i),
        );
        let upper = phrase.key.to_ascii_uppercase();
        if upper != phrase.key {
            map.insert(
                upper.encode_utf8(&mut buf).as_bytes().to_vec(),
                KeyAction::Phrase(i),
            );
        }
    }

    // alt+v voices, alt+x silence
    map.insert(b"\x1bv".to_vec(), KeyAction::VoiceSettings);
    map.insert(b"\x1bx".to_vec(), KeyAction::Silence);

    // alt+q, ctrl+c, ctrl+d
    map.insert(b"\x1bq".to_vec(), KeyAction::Quit);
    map.insert(b"\x03".to_vec(), KeyAction::Quit);
    map.insert(b"\x04".to_vec(), KeyAction::Quit);

    map
}

/// Create the voice dialog keymap
pub fn create_dialog_keymap() -> HashMap<KeySequence, DialogAction> {
    let mut map = HashMap::new();

    for digit in 1..=9u8 {
        map.insert(vec![b'0' + digit], DialogAction::Tap(digit as usize - 1));
    }

    // Arrow keys, normal and application mode
    map.insert(b"\x1b[A".to_vec(), DialogAction::Prev);
    map.insert(b"\x1b[B".to_vec(), DialogAction::Next);
    map.insert(b"\x1bOA".to_vec(), DialogAction::Prev);
    map.insert(b"\x1bOB".to_vec(), DialogAction::Next);

    map.insert(b"\r".to_vec(), DialogAction::Accept);
    map.insert(b"\n".to_vec(), DialogAction::Accept);
    map.insert(b"y".to_vec(), DialogAction::Accept);

    map.insert(b"\x1b".to_vec(), DialogAction::Cancel);
    map.insert(b"n".to_vec(), DialogAction::Cancel);
    map.insert(b"q".to_vec(), DialogAction::Cancel);

    map.insert(b"\x03".to_vec(), DialogAction::Quit);
    map.insert(b"\x04".to_vec(), DialogAction::Quit);

    map
}

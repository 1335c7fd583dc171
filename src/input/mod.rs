//! Input handling and key bindings
//!
//! The input system uses a stack-based handler architecture where handlers
//! can be pushed/popped to create modal interfaces (the voice dialog).
//! With nothing on the stack, keys go to the board.

pub mod board_handler;
pub mod handler;
pub mod keymap;
pub mod voice_dialog;

pub use board_handler::BoardHandler;
pub use handler::{HandlerAction, HandlerStack, KeyHandler};
pub use keymap::{create_default_keymap, create_dialog_keymap, DialogAction, KeyAction};
pub use voice_dialog::VoiceDialogHandler;

use crate::state::State;
use crate::Result;

/// Route one key press to the active handler
///
/// The top of the handler stack sees the key first; with an empty
/// stack, or when the modal handler passes it on, the board handles it.
/// Any key press clears a pending notice.
pub fn dispatch(key: &[u8], state: &mut State, board: &mut BoardHandler) -> Result<HandlerAction> {
    state.dismiss_notice();

    // Temporarily pop the handler so it can borrow state mutably
    if let Some(mut handler) = state.handlers.pop() {
        let action = handler.process(key, state)?;
        match action {
            HandlerAction::Remove => return Ok(HandlerAction::Handled),
            HandlerAction::Handled | HandlerAction::Exit => {
                state.handlers.push(handler);
                return Ok(action);
            }
            HandlerAction::Passthrough => state.handlers.push(handler),
        }
    }

    board.process_key(key, state)
}

/// Split one read from stdin into individual key presses
///
/// Escape sequences (arrows, alt+key) are kept whole; anything else is
/// split per character so typing ahead or pasting triggers each key in
/// turn.
pub fn split_keys(input: &[u8]) -> Vec<&[u8]> {
    let mut keys = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let len = if rest[0] == ESC {
            escape_len(rest)
        } else {
            char_len(rest[0])
        }
        .min(rest.len());
        let (key, tail) = rest.split_at(len);
        keys.push(key);
        rest = tail;
    }
    keys
}

const ESC: u8 = 0x1b;

/// Byte length of a UTF-8 character from its lead byte
fn char_len(lead: u8) -> usize {
    match lead {
        0xf0..=0xf7 => 4,
        0xe0..=0xef => 3,
        0xc0..=0xdf => 2,
        _ => 1,
    }
}

/// Byte length of the escape sequence at the start of `input`
fn escape_len(input: &[u8]) -> usize {
    match input.get(1) {
        // Bare escape key
        None | Some(&ESC) => 1,
        // CSI: parameter bytes up to the final byte
        Some(b'[') => input[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(input.len(), |i| i + 3),
        // SS3: exactly one more byte
        Some(b'O') => 3,
        // alt+key
        Some(&next) => 1 + char_len(next),
    }
}

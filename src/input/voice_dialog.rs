//! Voice dialog handler
//!
//! Modal handler active while the voice dialog is open. It only
//! translates keys; the session itself lives in `State::dialog`.

use super::keymap::{create_dialog_keymap, DialogAction, KeySequence};
use super::{HandlerAction, KeyHandler};
use crate::state::State;
use crate::Result;
use log::debug;
use std::collections::HashMap;

/// Voice dialog key handler
///
/// - 1-9: preview that voice
/// - Up/Down: preview the previous/next voice
/// - Enter or y: use the previewed voice
/// - Esc, n or q: cancel and revert
pub struct VoiceDialogHandler {
    keymap: HashMap<KeySequence, DialogAction>,
}

impl Default for VoiceDialogHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceDialogHandler {
    /// Create a new voice dialog handler
    pub fn new() -> Self {
        Self {
            keymap: create_dialog_keymap(),
        }
    }
}

impl KeyHandler for VoiceDialogHandler {
    fn process(&mut self, key: &[u8], state: &mut State) -> Result<HandlerAction> {
        // Dialog closed behind our back
        if !state.dialog_open() {
            return Ok(HandlerAction::Remove);
        }

        let Some(action) = self.keymap.get(key).cloned() else {
            debug!("Dialog: unknown key");
            return Ok(HandlerAction::Handled);
        };

        match action {
            DialogAction::Tap(index) => {
                state.dialog_tap(index);
                Ok(HandlerAction::Handled)
            }
            DialogAction::Next => {
                state.dialog_next();
                Ok(HandlerAction::Handled)
            }
            DialogAction::Prev => {
                state.dialog_prev();
                Ok(HandlerAction::Handled)
            }
            DialogAction::Accept => {
                debug!("Dialog: accept");
                state.confirm_voice_dialog();
                Ok(HandlerAction::Remove)
            }
            DialogAction::Cancel => {
                debug!("Dialog: cancel");
                state.cancel_voice_dialog();
                Ok(HandlerAction::Remove)
            }
            // Leave the session open so it is suspended, not cancelled
            DialogAction::Quit => Ok(HandlerAction::Exit),
        }
    }
}

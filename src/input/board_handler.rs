//! Board key handler
//!
//! Handles keys when no modal handler is active: phrase keys speak their
//! phrase, and a few alt+key combinations reach settings and silence.

use super::{HandlerAction, KeyAction};
use crate::phrases::PHRASES;
use crate::state::State;
use crate::Result;
use log::{debug, trace};
use std::collections::HashMap;

/// Key handler for the phrase board
pub struct BoardHandler {
    /// Key bindings map
    keymap: HashMap<Vec<u8>, KeyAction>,
}

impl BoardHandler {
    /// Create a new board handler
    pub fn new(keymap: HashMap<Vec<u8>, KeyAction>) -> Self {
        debug!("Creating board handler with {} bindings", keymap.len());
        Self { keymap }
    }

    /// Process a key with the board's key bindings
    ///
    /// Unbound keys are ignored.
    pub fn process_key(&mut self, key: &[u8], state: &mut State) -> Result<HandlerAction> {
        match self.keymap.get(key).cloned() {
            Some(action) => {
                trace!("Key action: {:?}", action);
                self.execute_action(&action, state)
            }
            None => {
                trace!("Unbound key {:?}", key);
                Ok(HandlerAction::Passthrough)
            }
        }
    }

    fn execute_action(&mut self, action: &KeyAction, state: &mut State) -> Result<HandlerAction> {
        match action {
            KeyAction::Phrase(index) => {
                if let Some(phrase) = PHRASES.get(*index) {
                    state.speak_phrase(phrase);
                }
                Ok(HandlerAction::Handled)
            }

            // Voice dialog pushes its own handler onto the stack
            KeyAction::VoiceSettings => {
                if state.open_voice_dialog() {
                    debug!("Entering voice dialog");
                }
                Ok(HandlerAction::Handled)
            }

            KeyAction::Silence => {
                state.silence();
                Ok(HandlerAction::Handled)
            }

            KeyAction::Quit => Ok(HandlerAction::Exit),
        }
    }
}

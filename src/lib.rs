//! voiceactions - spoken phrase board
//!
//! A console communication aid: sixteen keys, each speaking a short
//! request aloud through the platform text-to-speech engine, plus a
//! dialog for choosing among the installed voices for the target
//! language.

pub mod dialog;
pub mod error;
pub mod input;
pub mod phrases;
pub mod prefs;
pub mod speech;
pub mod state;
pub mod terminal;

pub use error::{Result, VoiceActionsError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "voiceactions";

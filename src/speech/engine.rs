//! Speech engine abstraction
//!
//! The engine is the platform text-to-speech service. The app never
//! synthesizes anything itself; it drives an engine through this trait.

use super::Voice;
use crate::Result;

/// Generic failure code reported when an engine cannot start
pub const INIT_ERROR: i32 = -1;

/// Outcome of engine initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// Engine is up and can speak
    Ready,
    /// Engine failed to start, with the platform error code
    Failed(i32),
}

/// One-shot callback invoked when initialization finishes
pub type InitCallback = Box<dyn FnOnce(InitStatus) + Send>;

/// Text-to-speech engine
///
/// All backends implement this. Only `initialize` may be called before
/// the engine reports `Ready`; the rest are expected to fail until then.
pub trait SpeechEngine: Send {
    /// Start the engine, invoking `on_init` exactly once when done
    ///
    /// The callback may run on another thread.
    fn initialize(&mut self, on_init: InitCallback);

    /// Speak text, interrupting current speech first when `interrupt` is set
    fn speak(&mut self, text: &str, interrupt: bool) -> Result<()>;

    /// Stop current speech
    fn stop(&mut self) -> Result<()>;

    /// Does this engine expose per-voice metadata?
    fn supports_voices(&self) -> bool;

    /// Full voice catalog in engine enumeration order
    fn voices(&self) -> Result<Vec<Voice>>;

    /// Make `voice` the active voice
    fn set_voice(&mut self, voice: &Voice) -> Result<()>;

    /// Currently active voice, if the engine can report it
    fn voice(&self) -> Result<Option<Voice>>;

    /// Set the output language (BCP 47 tag)
    ///
    /// Returns the voice now speaking that language, when the engine
    /// picked one.
    fn set_language(&mut self, locale: &str) -> Result<Option<Voice>>;

    /// Set speech rate (0-100, where 50 is normal)
    fn set_rate(&mut self, rate: u8) -> Result<()>;

    /// Set speech volume (0-100)
    fn set_volume(&mut self, volume: u8) -> Result<()>;

    /// Stop speaking and release engine resources
    ///
    /// Must be safe to call more than once, and before initialization
    /// has completed.
    fn shutdown(&mut self);
}

//! Speech engine backends

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

// Recording backend for tests and silent runs
pub mod memory;

pub use memory::{InitBehavior, MemoryEngine, MemoryHandle};
pub use native::NativeEngine;

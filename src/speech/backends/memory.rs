//! In-memory speech engine
//!
//! Records everything it is asked to do instead of producing audio.
//! Used by the test suite and by `--silent` runs on machines without
//! a speech service.

use crate::speech::{primary_subtag, InitCallback, InitStatus, SpeechEngine, Voice};
use crate::{Result, VoiceActionsError};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};

/// How the engine answers `initialize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitBehavior {
    /// Report `Ready` immediately
    Ready,
    /// Report `Failed(code)` immediately
    Fail(i32),
    /// Hold the callback until [`MemoryHandle::complete_init`]
    Deferred,
}

#[derive(Default)]
struct Inner {
    catalog: Vec<Voice>,
    supports_voices: bool,
    reports_voice: bool,
    ready: bool,
    current: Option<Voice>,
    language: Option<String>,
    rate: Option<u8>,
    volume: Option<u8>,
    playing: Option<String>,
    queued: Vec<String>,
    interrupted: Vec<String>,
    completed: Vec<String>,
    spoken: Vec<String>,
    pending_init: Option<InitCallback>,
    init_calls: usize,
    shutdowns: usize,
}

/// Engine that keeps its state in memory
pub struct MemoryEngine {
    inner: Arc<Mutex<Inner>>,
    behavior: InitBehavior,
}

/// Inspection handle sharing state with a [`MemoryEngine`]
#[derive(Clone)]
pub struct MemoryHandle {
    inner: Arc<Mutex<Inner>>,
}

fn lock(inner: &Arc<Mutex<Inner>>) -> MutexGuard<'_, Inner> {
    // A panic while holding the lock only happens in a failing test
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl MemoryEngine {
    /// Create an engine offering `catalog`, with voice listing supported
    pub fn new(catalog: Vec<Voice>) -> Self {
        let inner = Inner {
            catalog,
            supports_voices: true,
            reports_voice: true,
            ..Inner::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            behavior: InitBehavior::Ready,
        }
    }

    /// Change how `initialize` responds
    pub fn with_init(mut self, behavior: InitBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Start with `voice` active, as the engine default
    pub fn with_default_voice(self, voice: Voice) -> Self {
        lock(&self.inner).current = Some(voice);
        self
    }

    /// Pretend the platform cannot enumerate voices
    pub fn without_voice_support(self) -> Self {
        lock(&self.inner).supports_voices = false;
        self
    }

    /// Pretend the platform cannot report the active voice
    ///
    /// Voices can still be listed and set; `voice()` answers `None`.
    pub fn without_get_voice(self) -> Self {
        lock(&self.inner).reports_voice = false;
        self
    }

    /// Handle for inspecting the engine after it has been moved
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        if lock(&self.inner).ready {
            Ok(())
        } else {
            Err(VoiceActionsError::Speech(
                "memory engine not initialized".to_string(),
            ))
        }
    }
}

impl SpeechEngine for MemoryEngine {
    fn initialize(&mut self, on_init: InitCallback) {
        let status = {
            let mut inner = lock(&self.inner);
            inner.init_calls += 1;
            match self.behavior {
                InitBehavior::Ready => {
                    inner.ready = true;
                    InitStatus::Ready
                }
                InitBehavior::Fail(code) => InitStatus::Failed(code),
                InitBehavior::Deferred => {
                    inner.pending_init = Some(on_init);
                    return;
                }
            }
        };
        on_init(status);
    }

    fn speak(&mut self, text: &str, interrupt: bool) -> Result<()> {
        self.ensure_ready()?;
        if text.is_empty() {
            return Ok(());
        }

        let mut inner = lock(&self.inner);
        debug!("Memory engine speaking: {}", text);
        inner.spoken.push(text.to_string());

        if interrupt {
            inner.queued.clear();
            if let Some(prior) = inner.playing.take() {
                inner.interrupted.push(prior);
            }
            inner.playing = Some(text.to_string());
        } else if inner.playing.is_some() {
            inner.queued.push(text.to_string());
        } else {
            inner.playing = Some(text.to_string());
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.ensure_ready()?;
        let mut inner = lock(&self.inner);
        inner.queued.clear();
        if let Some(prior) = inner.playing.take() {
            inner.interrupted.push(prior);
        }
        Ok(())
    }

    fn supports_voices(&self) -> bool {
        lock(&self.inner).supports_voices
    }

    fn voices(&self) -> Result<Vec<Voice>> {
        self.ensure_ready()?;
        Ok(lock(&self.inner).catalog.clone())
    }

    fn set_voice(&mut self, voice: &Voice) -> Result<()> {
        self.ensure_ready()?;
        lock(&self.inner).current = Some(voice.clone());
        Ok(())
    }

    fn voice(&self) -> Result<Option<Voice>> {
        self.ensure_ready()?;
        let inner = lock(&self.inner);
        if !inner.reports_voice {
            return Ok(None);
        }
        Ok(inner.current.clone())
    }

    fn set_language(&mut self, locale: &str) -> Result<Option<Voice>> {
        self.ensure_ready()?;
        let mut inner = lock(&self.inner);
        inner.language = Some(locale.to_string());

        // Keep the current voice when it already speaks the language,
        // otherwise switch to the first catalog voice that does
        let primary = primary_subtag(locale);
        let speaks = |v: &Voice| primary_subtag(&v.language) == primary;
        if inner.current.as_ref().is_some_and(|v| speaks(v)) {
            return Ok(inner.current.clone());
        }
        let picked = inner.catalog.iter().find(|v| speaks(*v)).cloned();
        if let Some(voice) = &picked {
            debug!("Memory engine switched to {} for {}", voice.name, locale);
            inner.current = Some(voice.clone());
        }
        Ok(picked)
    }

    fn set_rate(&mut self, rate: u8) -> Result<()> {
        self.ensure_ready()?;
        lock(&self.inner).rate = Some(rate);
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.ensure_ready()?;
        lock(&self.inner).volume = Some(volume);
        Ok(())
    }

    fn shutdown(&mut self) {
        let mut inner = lock(&self.inner);
        inner.shutdowns += 1;
        inner.ready = false;
        inner.queued.clear();
        if let Some(prior) = inner.playing.take() {
            inner.interrupted.push(prior);
        }
    }
}

impl MemoryHandle {
    /// Deliver a deferred initialization result
    ///
    /// Returns false if no initialization was pending.
    pub fn complete_init(&self, status: InitStatus) -> bool {
        let callback = {
            let mut inner = lock(&self.inner);
            if status == InitStatus::Ready {
                inner.ready = true;
            }
            inner.pending_init.take()
        };
        match callback {
            Some(on_init) => {
                on_init(status);
                true
            }
            None => false,
        }
    }

    /// Let the current utterance play to the end
    pub fn finish_current(&self) {
        let mut inner = lock(&self.inner);
        if let Some(done) = inner.playing.take() {
            inner.completed.push(done);
        }
        if !inner.queued.is_empty() {
            let next = inner.queued.remove(0);
            inner.playing = Some(next);
        }
    }

    /// Every text handed to `speak`, in order
    pub fn spoken(&self) -> Vec<String> {
        lock(&self.inner).spoken.clone()
    }

    /// Utterance currently playing
    pub fn playing(&self) -> Option<String> {
        lock(&self.inner).playing.clone()
    }

    /// Utterances cut off before finishing
    pub fn interrupted(&self) -> Vec<String> {
        lock(&self.inner).interrupted.clone()
    }

    /// Utterances heard to completion
    pub fn completed(&self) -> Vec<String> {
        lock(&self.inner).completed.clone()
    }

    /// Active voice
    pub fn current_voice(&self) -> Option<Voice> {
        lock(&self.inner).current.clone()
    }

    pub fn language(&self) -> Option<String> {
        lock(&self.inner).language.clone()
    }

    pub fn rate(&self) -> Option<u8> {
        lock(&self.inner).rate
    }

    pub fn volume(&self) -> Option<u8> {
        lock(&self.inner).volume
    }

    pub fn init_calls(&self) -> usize {
        lock(&self.inner).init_calls
    }

    pub fn shutdowns(&self) -> usize {
        lock(&self.inner).shutdowns
    }
}

//! Native TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - SAPI/WinRT on Windows
//!
//! The platform engine can take a while to come up, so it is built on a
//! helper thread and handed back through the init callback.

use crate::speech::{primary_subtag, InitCallback, InitStatus, SpeechEngine, Voice, INIT_ERROR};
use crate::{Result, VoiceActionsError};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tts::Tts as TtsCrate;

/// Native TTS backend using the tts crate
pub struct NativeEngine {
    /// The tts crate's TTS instance, filled in by the init thread
    tts: Arc<Mutex<Option<TtsCrate>>>,

    /// Set once `shutdown` runs; a late init result is discarded
    shut_down: Arc<AtomicBool>,

    /// Whether `initialize` has been called
    started: bool,
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeEngine {
    /// Create an engine that has not been started yet
    pub fn new() -> Self {
        Self {
            tts: Arc::new(Mutex::new(None)),
            shut_down: Arc::new(AtomicBool::new(false)),
            started: false,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<TtsCrate>>> {
        self.tts
            .lock()
            .map_err(|_| VoiceActionsError::Speech("TTS engine lock poisoned".to_string()))
    }

    /// Run `f` against the live tts instance
    fn with_tts<T>(&self, f: impl FnOnce(&mut TtsCrate) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        match guard.as_mut() {
            Some(tts) => f(tts),
            None => Err(VoiceActionsError::Speech(
                "TTS engine not initialized".to_string(),
            )),
        }
    }

    /// Convert a 0-100 rate into the platform's rate range
    ///
    /// 50 maps to the platform's normal rate.
    fn convert_rate(min: f32, normal: f32, max: f32, rate: u8) -> f32 {
        let rate = rate.min(100) as f32;
        if rate <= 50.0 {
            min + (normal - min) * rate / 50.0
        } else {
            normal + (max - normal) * (rate - 50.0) / 50.0
        }
    }

    /// Convert a 0-100 volume into the tts crate volume (0.0-1.0)
    fn convert_volume(volume: u8) -> f32 {
        volume.min(100) as f32 / 100.0
    }
}

fn to_voice(voice: &tts::Voice) -> Voice {
    Voice::new(voice.id(), voice.name(), voice.language().to_string())
}

fn speech_error(what: &str, e: tts::Error) -> VoiceActionsError {
    VoiceActionsError::Speech(format!("{}: {}", what, e))
}

impl SpeechEngine for NativeEngine {
    fn initialize(&mut self, on_init: InitCallback) {
        if self.started {
            warn!("TTS engine already started, ignoring initialize");
            return;
        }
        self.started = true;

        let slot = Arc::clone(&self.tts);
        let shut_down = Arc::clone(&self.shut_down);

        std::thread::spawn(move || {
            debug!("Creating native TTS backend");
            let status = match TtsCrate::default() {
                Ok(tts) => {
                    if shut_down.load(Ordering::SeqCst) {
                        debug!("Engine shut down during initialization, dropping it");
                        InitStatus::Failed(INIT_ERROR)
                    } else if let Ok(mut guard) = slot.lock() {
                        *guard = Some(tts);
                        info!("Native TTS backend created successfully");
                        InitStatus::Ready
                    } else {
                        error!("TTS engine lock poisoned during initialization");
                        InitStatus::Failed(INIT_ERROR)
                    }
                }
                Err(e) => {
                    error!("Failed to initialize TTS: {}", e);
                    InitStatus::Failed(INIT_ERROR)
                }
            };
            on_init(status);
        });
    }

    fn speak(&mut self, text: &str, interrupt: bool) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        debug!("Speaking: {}", text);
        self.with_tts(|tts| {
            tts.speak(text, interrupt).map_err(|e| {
                error!("Failed to speak: {}", e);
                speech_error("Speak failed", e)
            })?;
            Ok(())
        })
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Stopping speech");
        self.with_tts(|tts| {
            if !tts.supported_features().stop {
                return Ok(());
            }
            tts.stop().map_err(|e| speech_error("Stop failed", e))?;
            Ok(())
        })
    }

    fn supports_voices(&self) -> bool {
        self.with_tts(|tts| Ok(tts.supported_features().voice))
            .unwrap_or(false)
    }

    fn voices(&self) -> Result<Vec<Voice>> {
        self.with_tts(|tts| {
            let voices = tts
                .voices()
                .map_err(|e| speech_error("Failed to get voices", e))?;
            Ok(voices.iter().map(to_voice).collect())
        })
    }

    fn set_voice(&mut self, voice: &Voice) -> Result<()> {
        debug!("Selecting voice: {}", voice.name);
        self.with_tts(|tts| {
            let voices = tts
                .voices()
                .map_err(|e| speech_error("Failed to get voices", e))?;

            match voices.iter().find(|v| v.name() == voice.name) {
                Some(native) => tts
                    .set_voice(native)
                    .map_err(|e| speech_error("Failed to set voice", e)),
                None => {
                    warn!("Voice '{}' is no longer offered by the engine", voice.name);
                    Ok(())
                }
            }
        })
    }

    fn voice(&self) -> Result<Option<Voice>> {
        self.with_tts(|tts| {
            if !tts.supported_features().get_voice {
                return Ok(None);
            }
            let current = tts
                .voice()
                .map_err(|e| speech_error("Failed to get voice", e))?;
            Ok(current.as_ref().map(to_voice))
        })
    }

    fn set_language(&mut self, locale: &str) -> Result<Option<Voice>> {
        debug!("Setting language to {}", locale);
        self.with_tts(|tts| {
            // The tts crate has no language setting; pick the first voice
            // for the locale instead
            if !tts.supported_features().voice {
                warn!("Voice selection not supported, language stays at engine default");
                return Ok(None);
            }

            let voices = tts
                .voices()
                .map_err(|e| speech_error("Failed to get voices", e))?;
            let wanted = locale.replace('_', "-").to_lowercase();
            let primary = primary_subtag(locale);

            let exact = voices
                .iter()
                .find(|v| v.language().to_string().to_lowercase() == wanted);
            let fallback = || {
                voices
                    .iter()
                    .find(|v| primary_subtag(&v.language().to_string()) == primary)
            };

            match exact.or_else(fallback) {
                Some(native) => {
                    tts.set_voice(native)
                        .map_err(|e| speech_error("Failed to set language", e))?;
                    Ok(Some(to_voice(native)))
                }
                None => {
                    warn!("No voice available for language {}", locale);
                    Ok(None)
                }
            }
        })
    }

    fn set_rate(&mut self, rate: u8) -> Result<()> {
        debug!("Setting rate to {}", rate);
        self.with_tts(|tts| {
            if !tts.supported_features().rate {
                warn!("Rate control not supported on this platform");
                return Ok(());
            }

            let converted =
                Self::convert_rate(tts.min_rate(), tts.normal_rate(), tts.max_rate(), rate);
            tts.set_rate(converted)
                .map_err(|e| speech_error("Failed to set rate", e))?;
            Ok(())
        })
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        debug!("Setting volume to {}", volume);
        self.with_tts(|tts| {
            if !tts.supported_features().volume {
                warn!("Volume control not supported on this platform");
                return Ok(());
            }

            tts.set_volume(Self::convert_volume(volume))
                .map_err(|e| speech_error("Failed to set volume", e))?;
            Ok(())
        })
    }

    fn shutdown(&mut self) {
        self.shut_down.store(true, Ordering::SeqCst);

        let taken = match self.tts.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };

        if let Some(mut tts) = taken {
            debug!("Shutting down native TTS backend");
            if let Err(e) = tts.stop() {
                warn!("Failed to stop speech during shutdown: {}", e);
            }
        }
    }
}

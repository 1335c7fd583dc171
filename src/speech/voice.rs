//! Voices and the filtered voice list
//!
//! The engine owns its voices; the app only keeps a small snapshot of
//! each one and refers to it by name when selecting or persisting.

use log::debug;
use serde::{Deserialize, Serialize};

/// Name marker a voice must carry to be listed
pub const MALE_MARKER: &str = "male";

/// Name marker that excludes a voice from the list
pub const FEMALE_MARKER: &str = "female";

/// A synthetic voice offered by the speech engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    /// Engine-specific identifier
    pub id: String,
    /// Voice name, also the identity used for selection and persistence
    pub name: String,
    /// BCP 47 language tag (e.g. "es-ES")
    pub language: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
        }
    }

    /// Primary language subtag, lowercased ("es" for "es-ES")
    pub fn primary_language(&self) -> String {
        primary_subtag(&self.language)
    }
}

impl PartialEq for Voice {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Voice {}

/// Primary subtag of a language tag, lowercased
///
/// Accepts both "es-ES" and "es_ES" spellings.
pub fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Catalog filter deciding which voices are offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceFilter {
    /// Marker the primary language subtag must contain
    language_marker: String,
}

impl VoiceFilter {
    /// Build a filter for the given target locale
    pub fn for_locale(locale: &str) -> Self {
        Self {
            language_marker: primary_subtag(locale),
        }
    }

    /// Marker tested against each voice's language
    pub fn language_marker(&self) -> &str {
        &self.language_marker
    }

    /// Does this voice belong in the list?
    pub fn matches(&self, voice: &Voice) -> bool {
        let name = voice.name.to_lowercase();
        voice.primary_language().contains(&self.language_marker)
            && name.contains(MALE_MARKER)
            && !name.contains(FEMALE_MARKER)
    }
}

/// Ordered list of selectable voices with their display titles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceList {
    voices: Vec<Voice>,
    titles: Vec<String>,
}

impl VoiceList {
    /// Filter an engine catalog, keeping enumeration order
    pub fn from_catalog(catalog: Vec<Voice>, filter: &VoiceFilter) -> Self {
        let total = catalog.len();
        let voices: Vec<Voice> = catalog.into_iter().filter(|v| filter.matches(v)).collect();
        debug!(
            "Voice list: {} of {} voices match language '{}'",
            voices.len(),
            total,
            filter.language_marker()
        );
        let titles = display_titles(voices.len());
        Self { voices, titles }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Find a voice by its persisted name
    pub fn find(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// Position of a voice in the list
    pub fn position(&self, voice: &Voice) -> Option<usize> {
        self.voices.iter().position(|v| v == voice)
    }
}

/// Title shown for the voice at a 0-based position
pub fn display_title(index: usize) -> String {
    format!("Voice #{}", index + 1)
}

/// Positional titles for a list of `count` voices
pub fn display_titles(count: usize) -> Vec<String> {
    (0..count).map(display_title).collect()
}

/// Phrase spoken when the voice at a 0-based position is previewed
pub fn preview_phrase(index: usize) -> String {
    format!("Voice number {}", index + 1)
}

//! Mock classifier for testing.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use super::{SegmentClassifier, Sound, SoundClassModel, UNKNOWN_CLASS};

/// Mock classifier that returns predictable answers for testing.
///
/// Any purely alphabetic segment is a known sound spelled as itself; vowels
/// fall into class `V`, every other sound into its uppercased first letter.
/// Everything else is unknown. Explicit overrides take precedence.
pub struct MockClassifier {
    canonical: HashMap<String, String>,
    unknown: HashSet<String>,
    unclassed: HashSet<String>,
    calls: Cell<usize>,
}

impl MockClassifier {
    /// Create a new mock classifier.
    pub fn new() -> Self {
        Self {
            canonical: HashMap::new(),
            unknown: HashSet::new(),
            unclassed: HashSet::new(),
            calls: Cell::new(0),
        }
    }

    /// Map a segment to a canonical spelling.
    pub fn with_sound(mut self, grapheme: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.canonical.insert(grapheme.into(), canonical.into());
        self
    }

    /// Force a segment to be unknown.
    pub fn with_unknown(mut self, grapheme: impl Into<String>) -> Self {
        self.unknown.insert(grapheme.into());
        self
    }

    /// Keep a segment known but without a sound class.
    pub fn with_unclassed(mut self, grapheme: impl Into<String>) -> Self {
        self.unclassed.insert(grapheme.into());
        self
    }

    /// Number of lookups answered so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn is_known(&self, grapheme: &str) -> bool {
        if self.unknown.contains(grapheme) {
            return false;
        }
        self.canonical.contains_key(grapheme)
            || (!grapheme.is_empty() && grapheme.chars().all(char::is_alphabetic))
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentClassifier for MockClassifier {
    fn classify(&self, grapheme: &str) -> Sound {
        self.calls.set(self.calls.get() + 1);
        if !self.is_known(grapheme) {
            return Sound::unknown(grapheme);
        }
        let canonical = self
            .canonical
            .get(grapheme)
            .cloned()
            .unwrap_or_else(|| grapheme.to_string());
        Sound::known(grapheme, canonical)
    }

    fn soundclass(&self, grapheme: &str, _model: SoundClassModel) -> String {
        self.calls.set(self.calls.get() + 1);
        if !self.is_known(grapheme) || self.unclassed.contains(grapheme) {
            return UNKNOWN_CLASS.to_string();
        }
        match grapheme.chars().next() {
            Some(c) if "aeiouAEIOU".contains(c) => "V".to_string(),
            Some(c) => c.to_uppercase().collect(),
            None => UNKNOWN_CLASS.to_string(),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

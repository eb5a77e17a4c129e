//! Memoizing classifier wrapper.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{SegmentClassifier, Sound, SoundClassModel};

/// Caches classifier answers per distinct segment string.
///
/// The cache lives exactly as long as the wrapper, so one conversion run gets
/// one cache and separate runs never share state.
pub struct CachedClassifier<'a> {
    inner: &'a dyn SegmentClassifier,
    sounds: RefCell<HashMap<String, Sound>>,
    classes: RefCell<HashMap<(String, SoundClassModel), String>>,
}

impl<'a> CachedClassifier<'a> {
    /// Wrap a classifier with an empty cache.
    pub fn new(inner: &'a dyn SegmentClassifier) -> Self {
        Self {
            inner,
            sounds: RefCell::new(HashMap::new()),
            classes: RefCell::new(HashMap::new()),
        }
    }

    /// Number of cached entries across both lookups.
    pub fn len(&self) -> usize {
        self.sounds.borrow().len() + self.classes.borrow().len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached answers.
    pub fn clear(&self) {
        self.sounds.borrow_mut().clear();
        self.classes.borrow_mut().clear();
    }
}

impl SegmentClassifier for CachedClassifier<'_> {
    fn classify(&self, grapheme: &str) -> Sound {
        if let Some(sound) = self.sounds.borrow().get(grapheme) {
            return sound.clone();
        }
        let sound = self.inner.classify(grapheme);
        self.sounds
            .borrow_mut()
            .insert(grapheme.to_string(), sound.clone());
        sound
    }

    fn soundclass(&self, grapheme: &str, model: SoundClassModel) -> String {
        let key = (grapheme.to_string(), model);
        if let Some(class) = self.classes.borrow().get(&key) {
            return class.clone();
        }
        let class = self.inner.soundclass(grapheme, model);
        self.classes.borrow_mut().insert(key, class.clone());
        class
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;

    #[test]
    fn test_cache_avoids_repeated_lookups() {
        let mock = MockClassifier::new();
        let cached = CachedClassifier::new(&mock);

        for _ in 0..3 {
            cached.classify("a");
            cached.soundclass("a", SoundClassModel::Dolgo);
        }
        assert_eq!(mock.calls(), 2);
        assert_eq!(cached.len(), 2);

        cached.soundclass("a", SoundClassModel::Sca);
        assert_eq!(mock.calls(), 3);

        cached.clear();
        assert!(cached.is_empty());
        cached.classify("a");
        assert_eq!(mock.calls(), 4);
    }
}

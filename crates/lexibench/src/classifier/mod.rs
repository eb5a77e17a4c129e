//! Segment classification against a phonological inventory.
//!
//! Lexibench does not implement phonological theory itself. Everything that
//! needs to know whether a segment is a valid sound, what its canonical
//! spelling is, or which sound class it belongs to asks a [`SegmentClassifier`].
//!
//! # Implementations
//!
//! - [`InventoryClassifier`] - table-driven lookup loaded from a TSV inventory
//! - [`CachedClassifier`] - memoizing wrapper around any classifier
//! - [`MockClassifier`] - predictable answers for tests
//!
//! # Example
//!
//! ```
//! use lexibench::classifier::{InventoryClassifier, SegmentClassifier, SoundClassModel};
//!
//! let inventory = InventoryClassifier::from_tsv_str(
//!     "Grapheme\tCanonical\tDolgo\tSCA\n\
//!      p\tp\tP\tP\n\
//!      ph\tpʰ\tP\tP\n",
//! ).unwrap();
//!
//! assert_eq!(inventory.classify("ph").to_string(), "pʰ");
//! assert!(inventory.classify("q").is_unknown());
//! assert_eq!(inventory.soundclass("q", SoundClassModel::Dolgo), "?");
//! ```

mod cache;
mod inventory;
mod mock;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cache::CachedClassifier;
pub use inventory::InventoryClassifier;
pub use mock::MockClassifier;

/// Sound class label returned for segments a model cannot classify.
pub const UNKNOWN_CLASS: &str = "?";

/// Result of classifying one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sound {
    /// A recognized sound with its canonical spelling.
    Known { source: String, canonical: String },
    /// A segment the inventory does not know.
    Unknown { source: String },
}

impl Sound {
    /// Create a known sound.
    pub fn known(source: impl Into<String>, canonical: impl Into<String>) -> Self {
        Sound::Known {
            source: source.into(),
            canonical: canonical.into(),
        }
    }

    /// Create an unknown sound.
    pub fn unknown(source: impl Into<String>) -> Self {
        Sound::Unknown {
            source: source.into(),
        }
    }

    /// Returns true for the "unknown sound" marker.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Sound::Unknown { .. })
    }

    /// The grapheme string that was classified.
    pub fn source(&self) -> &str {
        match self {
            Sound::Known { source, .. } | Sound::Unknown { source } => source,
        }
    }

    /// The canonical spelling; the source for unknown sounds.
    pub fn canonical(&self) -> &str {
        match self {
            Sound::Known { canonical, .. } => canonical,
            Sound::Unknown { source } => source,
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Coarse sound class systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundClassModel {
    /// Dolgopolsky's ten-class model.
    Dolgo,
    /// The SCA model.
    Sca,
}

impl SoundClassModel {
    /// Column label used in inventories and profiles.
    pub fn label(&self) -> &'static str {
        match self {
            SoundClassModel::Dolgo => "Dolgo",
            SoundClassModel::Sca => "SCA",
        }
    }
}

/// Oracle mapping segments to sounds and sound classes.
///
/// Lookups never fail: unknown input yields [`Sound::Unknown`] and the
/// [`UNKNOWN_CLASS`] label, which callers test for.
pub trait SegmentClassifier {
    /// Classify a segment.
    fn classify(&self, grapheme: &str) -> Sound;

    /// Translate a segment into a sound class label of the given model.
    fn soundclass(&self, grapheme: &str, model: SoundClassModel) -> String;

    /// Get the name of this classifier (for logging/debugging).
    fn name(&self) -> &str;
}

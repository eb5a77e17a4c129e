//! Configuration shared by profiles, tokenizers and the store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Default name of the profile field holding the IPA equivalent.
pub const IPA_COLUMN: &str = "IPA";
/// Default name of the profile's grapheme column.
pub const GRAPHEME_COLUMN: &str = "Grapheme";
/// Marker written for fields without a value.
pub const NULL_MARKER: &str = "NULL";

/// Unicode normalization form applied before tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Canonical composition.
    #[default]
    Nfc,
    /// Canonical decomposition.
    Nfd,
}

impl Normalization {
    /// Normalize a string to this form.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Normalization::Nfc => text.nfc().collect(),
            Normalization::Nfd => text.nfd().collect(),
        }
    }
}

/// What happens when profile records repeat a grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first record, silently drop later ones.
    #[default]
    FirstWins,
    /// Later records replace earlier ones, keeping the original position.
    LastWins,
    /// Fail construction.
    Reject,
}

/// Whether profile consistency issues are logged or raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Log every issue and keep going.
    #[default]
    Log,
    /// Fail on the first error-level issue.
    Raise,
}

/// Configuration for lexibench operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexibenchConfig {
    /// Profile field holding the IPA equivalent.
    pub ipa_column: String,
    /// Header of the profile's grapheme column.
    pub grapheme_column: String,
    /// Serialized "no value" marker.
    pub null_marker: String,
    /// Normalization applied to forms before tokenizing.
    pub normalization: Normalization,
    /// Handling of repeated graphemes at profile construction.
    pub duplicates: DuplicatePolicy,
    /// Log-or-raise behavior of profile checks.
    pub check_mode: CheckMode,
    /// Maximum number of example forms recorded per grapheme by augment.
    pub example_limit: usize,
    /// Separator between segments of one word.
    pub segment_separator: String,
    /// Separator between words of a multi-word form.
    pub word_separator: String,
    /// Location of the SQLite store.
    pub db_path: PathBuf,
}

impl Default for LexibenchConfig {
    fn default() -> Self {
        Self {
            ipa_column: IPA_COLUMN.to_string(),
            grapheme_column: GRAPHEME_COLUMN.to_string(),
            null_marker: NULL_MARKER.to_string(),
            normalization: Normalization::default(),
            duplicates: DuplicatePolicy::default(),
            check_mode: CheckMode::default(),
            example_limit: 5,
            segment_separator: " ".to_string(),
            word_separator: " _ ".to_string(),
            db_path: PathBuf::from("lexibench.sqlite"),
        }
    }
}

impl LexibenchConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the IPA column name.
    pub fn with_ipa_column(mut self, column: impl Into<String>) -> Self {
        self.ipa_column = column.into();
        self
    }

    /// Set the normalization form.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the duplicate grapheme policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Set the check mode.
    pub fn with_check_mode(mut self, mode: CheckMode) -> Self {
        self.check_mode = mode;
        self
    }

    /// Set the separators used when rendering tokenizations.
    pub fn with_separators(
        mut self,
        segment: impl Into<String>,
        word: impl Into<String>,
    ) -> Self {
        self.segment_separator = segment.into();
        self.word_separator = word.into();
        self
    }

    /// Set the store location.
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }
}

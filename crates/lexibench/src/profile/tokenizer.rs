//! Greedy longest-match tokenizer over one or more profiles.

use indexmap::IndexMap;

use crate::config::LexibenchConfig;
use crate::error::{LexibenchError, Result};

use super::tree::{Token, Tree};
use super::{segmentable_form, Entry, Profile};

/// Pseudo-field yielding the matched graphemes instead of a mapped value.
pub const GRAPHEMES_FIELD: &str = "Graphemes";

/// Map the tokens of `word` to the values of `field`.
///
/// Graphemes whose field is empty contribute nothing; unmatched characters
/// contribute their `<c>` error token.
pub(crate) fn transform_tokens(
    tree: &Tree,
    entries: &IndexMap<String, Entry>,
    grapheme_column: &str,
    word: &str,
    field: &str,
) -> Vec<String> {
    let raw = field == GRAPHEMES_FIELD || field == grapheme_column;
    tree.parse(word)
        .into_iter()
        .filter_map(|token| match token {
            Token::Grapheme(g) if raw => Some(g.to_string()),
            Token::Grapheme(g) => entries
                .get(g)
                .and_then(|entry| entry.get(field))
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            Token::Unmatched(_) => Some(token.render()),
        })
        .collect()
}

/// Segments forms with a default profile and optional named profiles.
///
/// # Example
///
/// ```
/// use lexibench::profile::{Profile, Tokenizer};
///
/// let default = Profile::from_mapping([("a", "a"), ("b", "b")]).unwrap();
/// let special = Profile::from_mapping([("a", "ɑ"), ("b", "β")]).unwrap();
/// let tokenizer = Tokenizer::new(default).with_profile("special", special);
///
/// assert_eq!(tokenizer.tokenize("ab", "IPA").unwrap(), vec!["a", "b"]);
/// assert_eq!(
///     tokenizer.tokenize_with(Some("special"), "ab", "IPA").unwrap(),
///     vec!["ɑ", "β"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    default: Profile,
    named: IndexMap<String, Profile>,
    segment_separator: String,
    word_separator: String,
}

impl Tokenizer {
    /// Create a tokenizer over a single profile.
    pub fn new(profile: Profile) -> Self {
        Self::with_config(profile, &LexibenchConfig::default())
    }

    /// Create a tokenizer using the configured separators.
    pub fn with_config(profile: Profile, config: &LexibenchConfig) -> Self {
        Self {
            default: profile,
            named: IndexMap::new(),
            segment_separator: config.segment_separator.clone(),
            word_separator: config.word_separator.clone(),
        }
    }

    /// Create a tokenizer from a default profile and named profiles.
    pub fn with_profiles(
        default: Profile,
        named: impl IntoIterator<Item = (String, Profile)>,
        config: &LexibenchConfig,
    ) -> Self {
        let mut tokenizer = Self::with_config(default, config);
        tokenizer.named.extend(named);
        tokenizer
    }

    /// Register a named profile.
    pub fn with_profile(mut self, name: impl Into<String>, profile: Profile) -> Self {
        self.named.insert(name.into(), profile);
        self
    }

    /// The profile used for a key; unknown keys fall back to the default.
    pub fn profile(&self, key: Option<&str>) -> &Profile {
        key.and_then(|k| self.named.get(k)).unwrap_or(&self.default)
    }

    /// Names of the registered named profiles.
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Segment a raw form into output segments of `field`.
    ///
    /// The form is normalized and wrapped in boundary markers first, so
    /// boundary-anchored rules apply. Multi-word forms yield the word
    /// separator as a segment of its own.
    pub fn tokenize(&self, form: &str, field: &str) -> Result<Vec<String>> {
        self.tokenize_with(None, form, field)
    }

    /// Segment a raw form with the profile registered under `key`.
    ///
    /// A mapped value holding several space-separated segments contributes
    /// each of them.
    pub fn tokenize_with(&self, key: Option<&str>, form: &str, field: &str) -> Result<Vec<String>> {
        let profile = self.profile(key);
        Self::require_field(profile, field)?;
        let text = profile.normalization().apply(&segmentable_form(form));
        let boundary = self.word_separator.trim();

        let mut segments = Vec::new();
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 && !boundary.is_empty() {
                segments.push(boundary.to_string());
            }
            let values = transform_tokens(
                profile.tree(),
                profile.entries(),
                profile.grapheme_column(),
                word,
                field,
            );
            for value in values {
                segments.extend(value.split_whitespace().map(str::to_string));
            }
        }
        Ok(segments)
    }

    /// Map a single word to the values of `field`, without boundary markers.
    pub fn transform(&self, word: &str, field: &str) -> Result<Vec<String>> {
        let profile = self.profile(None);
        Self::require_field(profile, field)?;
        let word = profile.normalization().apply(word);
        Ok(transform_tokens(
            profile.tree(),
            profile.entries(),
            profile.grapheme_column(),
            &word,
            field,
        ))
    }

    /// Render text as a separated string: segments joined by the segment
    /// separator, words by the word separator.
    pub fn render(&self, text: &str, field: &str) -> Result<String> {
        self.render_with(None, text, field)
    }

    /// Render text with the profile registered under `key`.
    pub fn render_with(&self, key: Option<&str>, text: &str, field: &str) -> Result<String> {
        let profile = self.profile(key);
        Self::require_field(profile, field)?;
        let text = profile.normalization().apply(text);
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| {
                transform_tokens(
                    profile.tree(),
                    profile.entries(),
                    profile.grapheme_column(),
                    word,
                    field,
                )
                .join(&self.segment_separator)
            })
            .collect();
        Ok(words.join(&self.word_separator))
    }

    fn require_field(profile: &Profile, field: &str) -> Result<()> {
        if field == GRAPHEMES_FIELD
            || field == profile.grapheme_column()
            || profile.has_column(field)
        {
            Ok(())
        } else {
            Err(LexibenchError::InvalidInput(format!(
                "orthography profile has no {} column",
                field
            )))
        }
    }
}

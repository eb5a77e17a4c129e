//! Orthography profiles.
//!
//! A profile is an ordered mapping from surface graphemes to output fields,
//! at minimum an IPA equivalent. It drives the greedy longest-match
//! [`Tokenizer`] and carries the curation operations used to keep it minimal
//! and reviewable: [`clean`](Profile::clean), [`trim`](Profile::trim),
//! [`augment`](Profile::augment), [`sort`](Profile::sort) and
//! [`check`](Profile::check).
//!
//! Two sentinel graphemes, `^` and `$`, mark word boundaries. They are always
//! present; construction injects them with empty fields when the records do
//! not define them.
//!
//! # Ordering
//!
//! Graphemes and fields live in [`IndexMap`]s. Insertion order is part of the
//! profile's contract: it is the order entries are written back out, and
//! `sort` rewrites it explicitly.
//!
//! # Example
//!
//! ```
//! use lexibench::profile::{Profile, Tokenizer};
//!
//! let mut profile = Profile::from_mapping([("ab", "x y"), ("a", "x"), ("b", "y")]).unwrap();
//! assert_eq!(profile.trim("IPA").unwrap(), 1);
//! assert!(!profile.contains("ab"));
//!
//! let tokenizer = Tokenizer::new(profile);
//! assert_eq!(tokenizer.tokenize("aab", "IPA").unwrap(), vec!["x", "x", "y"]);
//! ```

mod check;
mod entry;
mod io;
mod tokenizer;
mod tree;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::classifier::{SegmentClassifier, SoundClassModel};
use crate::config::{DuplicatePolicy, LexibenchConfig, Normalization, NULL_MARKER};
use crate::error::{LexibenchError, Result};

pub use check::{IssueKind, ProfileIssue, Severity};
pub use entry::{Entry, Record};
pub use tokenizer::{Tokenizer, GRAPHEMES_FIELD};
pub use tree::{error_token, Token, Tree};

/// Start-of-word boundary marker.
pub const BEGIN: &str = "^";
/// End-of-word boundary marker.
pub const END: &str = "$";

/// Field filled by [`Profile::augment`] with usage counts.
pub const FREQUENCY_COLUMN: &str = "FREQUENCY";
/// Field filled by [`Profile::augment`] with example forms.
pub const EXAMPLES_COLUMN: &str = "EXAMPLES";
/// Field filled by [`Profile::augment`] with SCA sound classes.
pub const SCA_COLUMN: &str = "SCA";
/// Optional field listing the codepoints of a grapheme.
pub const CODEPOINTS_COLUMN: &str = "CODEPOINTS";

/// An orthography profile.
#[derive(Debug, Clone)]
pub struct Profile {
    graphemes: IndexMap<String, Entry>,
    columns: IndexSet<String>,
    shadowed: Vec<(String, Entry)>,
    /// Field, grapheme and segmentation of each rule removed by trimming.
    trimmed: Vec<(String, String, String)>,
    grapheme_column: String,
    ipa_column: String,
    null_marker: String,
    normalization: Normalization,
    source: Option<PathBuf>,
    tree: Tree,
}

impl Profile {
    /// Build a profile from records using the default configuration.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        Self::from_records_with(records, &LexibenchConfig::default())
    }

    /// Build a profile from records.
    ///
    /// Each record must carry the grapheme column and the same set of output
    /// fields as every other record. Repeated graphemes are resolved by the
    /// configured [`DuplicatePolicy`]; the losing records are kept aside as
    /// shadowed entries so [`check`](Self::check) can report them.
    pub fn from_records_with(
        records: impl IntoIterator<Item = Record>,
        config: &LexibenchConfig,
    ) -> Result<Self> {
        let mut graphemes: IndexMap<String, Entry> = IndexMap::new();
        let mut columns: Option<IndexSet<String>> = None;
        let mut shadowed = Vec::new();

        for mut record in records {
            let grapheme = record
                .shift_remove(&config.grapheme_column)
                .flatten()
                .filter(|g| !g.is_empty())
                .ok_or_else(|| {
                    LexibenchError::InvalidInput(format!(
                        "profile record without {} value",
                        config.grapheme_column
                    ))
                })?;
            let grapheme = config.normalization.apply(&grapheme);

            match &columns {
                None => columns = Some(record.keys().cloned().collect()),
                Some(expected) => {
                    let same = expected.len() == record.len()
                        && record.keys().all(|k| expected.contains(k));
                    if !same {
                        return Err(LexibenchError::ProfileShape {
                            grapheme,
                            expected: expected.iter().cloned().collect(),
                            found: record.keys().cloned().collect(),
                        });
                    }
                }
            }

            let entry = Entry::from(record);
            match graphemes.get_mut(&grapheme) {
                None => {
                    graphemes.insert(grapheme, entry);
                }
                Some(existing) => match config.duplicates {
                    DuplicatePolicy::FirstWins => shadowed.push((grapheme, entry)),
                    DuplicatePolicy::LastWins => {
                        let previous = std::mem::replace(existing, entry);
                        shadowed.push((grapheme, previous));
                    }
                    DuplicatePolicy::Reject => {
                        return Err(LexibenchError::DuplicateGrapheme { grapheme });
                    }
                },
            }
        }

        let columns =
            columns.unwrap_or_else(|| std::iter::once(config.ipa_column.clone()).collect());
        for sentinel in [BEGIN, END] {
            if !graphemes.contains_key(sentinel) {
                graphemes.insert(
                    sentinel.to_string(),
                    Entry::empty(columns.iter().map(String::as_str)),
                );
            }
        }

        if !shadowed.is_empty() {
            debug!("{} duplicate profile records shadowed", shadowed.len());
        }

        let tree = Tree::new(graphemes.keys().map(String::as_str));
        Ok(Self {
            graphemes,
            columns,
            shadowed,
            trimmed: Vec::new(),
            grapheme_column: config.grapheme_column.clone(),
            ipa_column: config.ipa_column.clone(),
            null_marker: config.null_marker.clone(),
            normalization: config.normalization,
            source: None,
            tree,
        })
    }

    /// Build a profile from grapheme to IPA pairs.
    pub fn from_mapping<G, V>(pairs: impl IntoIterator<Item = (G, V)>) -> Result<Self>
    where
        G: Into<String>,
        V: Into<String>,
    {
        let config = LexibenchConfig::default();
        let records = pairs.into_iter().map(|(g, v)| {
            let mut record = Record::new();
            record.insert(config.grapheme_column.clone(), Some(g.into()));
            record.insert(config.ipa_column.clone(), Some(v.into()));
            record
        });
        Self::from_records_with(records, &config)
    }

    /// Look up the entry of a grapheme.
    pub fn get(&self, grapheme: &str) -> Option<&Entry> {
        self.graphemes.get(grapheme)
    }

    /// Returns true if the profile has a rule for the grapheme.
    pub fn contains(&self, grapheme: &str) -> bool {
        self.graphemes.contains_key(grapheme)
    }

    /// Number of graphemes, sentinels included.
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    /// Returns true if the profile holds only the boundary sentinels.
    pub fn is_empty(&self) -> bool {
        self.graphemes.keys().all(|g| g == BEGIN || g == END)
    }

    /// Iterate over graphemes and entries in profile order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.graphemes.iter().map(|(g, e)| (g.as_str(), e))
    }

    /// Graphemes in profile order.
    pub fn graphemes(&self) -> impl Iterator<Item = &str> {
        self.graphemes.keys().map(String::as_str)
    }

    /// Grapheme to field value, in profile order.
    pub fn mapping(&self, field: &str) -> IndexMap<&str, Option<&str>> {
        self.iter().map(|(g, e)| (g, e.get(field))).collect()
    }

    /// Output field names shared by all entries.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns true if entries carry the field.
    pub fn has_column(&self, field: &str) -> bool {
        self.columns.contains(field)
    }

    /// Records dropped at construction because their grapheme repeated.
    pub fn shadowed(&self) -> &[(String, Entry)] {
        &self.shadowed
    }

    /// Header of the grapheme column.
    pub fn grapheme_column(&self) -> &str {
        &self.grapheme_column
    }

    /// Name of the designated IPA field.
    pub fn ipa_column(&self) -> &str {
        &self.ipa_column
    }

    /// Serialized "no value" marker.
    pub fn null_marker(&self) -> &str {
        &self.null_marker
    }

    /// Normalization applied to graphemes and tokenizer input.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// File the profile was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Set the file the profile is written back to.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub(crate) fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn entries(&self) -> &IndexMap<String, Entry> {
        &self.graphemes
    }

    /// Remove a grapheme rule. Boundary sentinels cannot be removed.
    pub fn remove(&mut self, grapheme: &str) -> Option<Entry> {
        if grapheme == BEGIN || grapheme == END {
            return None;
        }
        let removed = self.graphemes.shift_remove(grapheme);
        if removed.is_some() {
            self.rebuild();
        }
        removed
    }

    fn rebuild(&mut self) {
        self.tree = Tree::new(self.graphemes.keys().map(String::as_str));
    }

    fn add_column(&mut self, field: &str) {
        if self.columns.insert(field.to_string()) {
            for entry in self.graphemes.values_mut() {
                if !entry.has_field(field) {
                    entry.set(field, None);
                }
            }
        }
    }

    fn require_column(&self, field: &str) -> Result<()> {
        if self.has_column(field) {
            Ok(())
        } else {
            Err(LexibenchError::InvalidInput(format!(
                "orthography profile has no {} column",
                field
            )))
        }
    }

    /// Replace IPA values by the classifier's canonical spellings.
    ///
    /// Whitespace is collapsed first. Slash notation `left/right` keeps the
    /// left part and canonicalizes the right part. When the profile has a
    /// codepoint column it is refreshed for every cleaned entry. Returns the
    /// number of entries whose IPA value changed.
    pub fn clean(&mut self, classifier: &dyn SegmentClassifier, ipa: &str) -> usize {
        let with_codepoints = self.has_column(CODEPOINTS_COLUMN);
        let mut changed = 0;
        for (grapheme, entry) in self.graphemes.iter_mut() {
            let Some(value) = entry.get(ipa).filter(|v| !v.is_empty()) else {
                continue;
            };
            let cleaned = value
                .split_whitespace()
                .map(|segment| match segment.split_once('/') {
                    Some((left, right)) => format!("{}/{}", left, classifier.classify(right)),
                    None => classifier.classify(segment).to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            if cleaned != value {
                changed += 1;
            }
            entry.set(ipa, Some(cleaned));
            if with_codepoints {
                entry.set(CODEPOINTS_COLUMN, Some(codepoints(grapheme)));
            }
        }
        changed
    }

    /// Remove redundant rules and return how many were removed.
    ///
    /// A rule is redundant when segmenting its own grapheme without it still
    /// yields its recorded IPA value, and no other grapheme of the profile,
    /// including those trimmed by earlier calls, segments differently
    /// without it. Boundary-anchored graphemes are tried first, then the
    /// remaining multi-character graphemes from longest to shortest. One
    /// call is a single pass; callers loop until it returns 0.
    pub fn trim(&mut self, ipa: &str) -> Result<usize> {
        self.require_column(ipa)?;

        let mut reference: Vec<(String, String)> = self
            .trimmed
            .iter()
            .filter(|(field, _, _)| field == ipa)
            .map(|(_, g, segments)| (g.clone(), segments.clone()))
            .collect();
        reference.extend(
            self.graphemes
                .keys()
                .map(|g| (g.clone(), self.segment_word(&self.tree, g, ipa))),
        );

        let mut removed = 0;
        for candidate in self.trim_candidates() {
            let Some(entry) = self.graphemes.get(&candidate) else {
                continue;
            };
            let Some(expected) = entry.get(ipa) else {
                continue;
            };
            let trial = Tree::new(
                self.graphemes
                    .keys()
                    .map(String::as_str)
                    .filter(|g| *g != candidate),
            );
            let redundant = self.segment_word(&trial, &candidate, ipa) == expected
                && reference
                    .iter()
                    .all(|(g, before)| self.segment_word(&trial, g, ipa) == *before);
            if redundant {
                debug!("Removing redundant rule [{}] -> [{}]", candidate, expected);
                let segments = self.segment_word(&trial, &candidate, ipa);
                self.graphemes.shift_remove(&candidate);
                self.trimmed.push((ipa.to_string(), candidate, segments));
                removed += 1;
            }
        }

        if removed > 0 {
            self.rebuild();
            info!("{} superfluous rules were removed", removed);
        }
        Ok(removed)
    }

    fn segment_word(&self, tree: &Tree, word: &str, ipa: &str) -> String {
        tokenizer::transform_tokens(tree, &self.graphemes, &self.grapheme_column, word, ipa)
            .join(" ")
    }

    fn trim_candidates(&self) -> Vec<String> {
        let mut both = Vec::new();
        let mut start = Vec::new();
        let mut end = Vec::new();
        let mut inner = Vec::new();
        for grapheme in self.graphemes.keys() {
            if grapheme == BEGIN || grapheme == END {
                continue;
            }
            let starts = grapheme.starts_with(BEGIN);
            let ends = grapheme.ends_with(END);
            match (starts, ends) {
                (true, true) => both.push(grapheme.clone()),
                (true, false) => start.push(grapheme.clone()),
                (false, true) => end.push(grapheme.clone()),
                (false, false) if grapheme.chars().count() > 1 => inner.push(grapheme.clone()),
                (false, false) => {}
            }
        }
        inner.sort_by_key(|g| std::cmp::Reverse(g.chars().count()));
        both.into_iter().chain(start).chain(end).chain(inner).collect()
    }

    /// Count grapheme usage over a corpus of raw forms.
    ///
    /// Each form is wrapped in boundary markers and segmented with the current
    /// rules. Every entry gets a `FREQUENCY` and an `EXAMPLES` field (up to
    /// `example_limit` distinct forms, `;`-separated); with a classifier, an
    /// `SCA` field with the sound classes of its IPA value as well.
    pub fn augment<S: AsRef<str>>(
        &mut self,
        forms: impl IntoIterator<Item = S>,
        classifier: Option<&dyn SegmentClassifier>,
        ipa: &str,
        example_limit: usize,
    ) {
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        let mut examples: HashMap<String, Vec<String>> = HashMap::new();

        for form in forms {
            let form = form.as_ref().trim();
            let wrapped = self.normalization.apply(&segmentable_form(form));
            for word in wrapped.split_whitespace() {
                for token in self.tree.parse(word) {
                    let Token::Grapheme(grapheme) = token else {
                        continue;
                    };
                    *frequencies.entry(grapheme.to_string()).or_insert(0) += 1;
                    let seen = examples.entry(grapheme.to_string()).or_default();
                    if seen.len() < example_limit && !seen.iter().any(|f| f == form) {
                        seen.push(form.to_string());
                    }
                }
            }
        }

        self.add_column(FREQUENCY_COLUMN);
        if classifier.is_some() {
            self.add_column(SCA_COLUMN);
        }
        self.add_column(EXAMPLES_COLUMN);

        for (grapheme, entry) in self.graphemes.iter_mut() {
            let frequency = frequencies.get(grapheme).copied().unwrap_or(0);
            entry.set(FREQUENCY_COLUMN, Some(frequency.to_string()));
            let listed = examples
                .get(grapheme)
                .map(|forms| forms.join(";"))
                .unwrap_or_default();
            entry.set(EXAMPLES_COLUMN, Some(listed));
            if let Some(classifier) = classifier {
                let sca = ipa_to_soundclass(
                    entry.get(ipa).unwrap_or_default(),
                    classifier,
                    SoundClassModel::Sca,
                );
                entry.set(SCA_COLUMN, Some(sca));
            }
        }
    }

    /// Reorder graphemes canonically.
    ///
    /// Boundary sentinels come first (`^` before `$`), then entries with an
    /// IPA value, then fully bounded graphemes. With a classifier, graphemes
    /// of similar sound class cluster together. Ties fall back to grapheme
    /// length and the grapheme itself, so sorting twice changes nothing.
    pub fn sort(&mut self, classifier: Option<&dyn SegmentClassifier>, ipa: &str) {
        let graphemes = std::mem::take(&mut self.graphemes);
        let mut keyed: Vec<_> = graphemes
            .into_iter()
            .map(|(grapheme, entry)| (sort_key(&grapheme, &entry, classifier, ipa), grapheme, entry))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        self.graphemes = keyed.into_iter().map(|(_, g, e)| (g, e)).collect();
        self.rebuild();
    }
}

type SortKey = (bool, bool, bool, bool, usize, String, usize, String);

fn sort_key(
    grapheme: &str,
    entry: &Entry,
    classifier: Option<&dyn SegmentClassifier>,
    ipa: &str,
) -> SortKey {
    let value = entry.get(ipa);
    let sca = match classifier {
        Some(classifier) => {
            ipa_to_soundclass(value.unwrap_or_default(), classifier, SoundClassModel::Sca)
        }
        None => String::new(),
    };
    let fully_bounded = grapheme.starts_with(BEGIN) && grapheme[BEGIN.len()..].contains(END);
    (
        grapheme != BEGIN && grapheme != END,
        grapheme != BEGIN,
        value.is_none(),
        !fully_bounded,
        sca.chars().count(),
        sca,
        grapheme.chars().count(),
        grapheme.to_string(),
    )
}

/// Wrap a form in boundary markers, unless it already carries them.
pub fn segmentable_form(form: &str) -> String {
    let form = form.trim();
    let mut wrapped = String::with_capacity(form.len() + 2);
    if !form.starts_with(BEGIN) {
        wrapped.push_str(BEGIN);
    }
    wrapped.push_str(form);
    if !form.ends_with(END) {
        wrapped.push_str(END);
    }
    wrapped
}

/// Split an IPA value into segments; `left/right` notation yields `right`.
pub fn ipa_tokens(value: &str) -> Vec<&str> {
    value
        .split_whitespace()
        .map(|token| match token.split_once('/') {
            Some((_, right)) => right,
            None => token,
        })
        .collect()
}

/// Translate an IPA value into space-separated sound classes.
///
/// `NULL` tokens are kept as they are.
pub fn ipa_to_soundclass(
    value: &str,
    classifier: &dyn SegmentClassifier,
    model: SoundClassModel,
) -> String {
    ipa_tokens(value)
        .into_iter()
        .map(|token| {
            if token == NULL_MARKER {
                NULL_MARKER.to_string()
            } else {
                classifier.soundclass(token, model)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the codepoints of a string as `U+XXXX`, space-separated.
pub fn codepoints(text: &str) -> String {
    text.chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_sentinels_injected() {
        let profile = Profile::from_mapping([("a", "a")]).unwrap();
        assert_eq!(profile.len(), 3);
        assert!(profile.contains(BEGIN));
        assert!(profile.contains(END));
        assert_eq!(profile.get(BEGIN).unwrap().get("IPA"), None);
        assert!(profile.get(END).unwrap().has_field("IPA"));
    }

    #[test]
    fn test_duplicates_first_wins() {
        let profile = Profile::from_mapping([("a", "x"), ("a", "y")]).unwrap();
        assert_eq!(profile.get("a").unwrap().get("IPA"), Some("x"));
        assert_eq!(profile.shadowed().len(), 1);
    }

    #[test]
    fn test_duplicates_last_wins_and_reject() {
        let records = || {
            vec![
                record(&[("Grapheme", Some("b")), ("IPA", Some("p"))]),
                record(&[("Grapheme", Some("a")), ("IPA", Some("x"))]),
                record(&[("Grapheme", Some("a")), ("IPA", Some("y"))]),
            ]
        };
        let config = LexibenchConfig::new().with_duplicates(DuplicatePolicy::LastWins);
        let profile = Profile::from_records_with(records(), &config).unwrap();
        assert_eq!(profile.get("a").unwrap().get("IPA"), Some("y"));
        assert_eq!(profile.graphemes().take(2).collect::<Vec<_>>(), vec!["b", "a"]);

        let config = LexibenchConfig::new().with_duplicates(DuplicatePolicy::Reject);
        let result = Profile::from_records_with(records(), &config);
        assert!(matches!(
            result,
            Err(LexibenchError::DuplicateGrapheme { grapheme }) if grapheme == "a"
        ));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let records = vec![
            record(&[("Grapheme", Some("a")), ("IPA", Some("a"))]),
            record(&[("Grapheme", Some("b")), ("IPA", Some("b")), ("SCA", None)]),
        ];
        let result = Profile::from_records(records);
        assert!(matches!(result, Err(LexibenchError::ProfileShape { .. })));
    }

    #[test]
    fn test_missing_grapheme_rejected() {
        let records = vec![record(&[("IPA", Some("a"))])];
        assert!(matches!(
            Profile::from_records(records),
            Err(LexibenchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_trim_removes_redundant_rule() {
        let mut profile = Profile::from_mapping([("ab", "x y"), ("a", "x"), ("b", "y")]).unwrap();
        assert_eq!(profile.trim("IPA").unwrap(), 1);
        assert!(!profile.contains("ab"));
        assert_eq!(profile.trim("IPA").unwrap(), 0);
    }

    #[test]
    fn test_trim_keeps_needed_rules() {
        let mut profile =
            Profile::from_mapping([("ab", "z"), ("^a", "x"), ("a", "x"), ("b", "y")]).unwrap();
        assert_eq!(profile.trim("IPA").unwrap(), 1);
        assert!(profile.contains("ab"));
        assert!(!profile.contains("^a"));
        assert!(profile.contains(BEGIN));
    }

    #[test]
    fn test_trim_keeps_rules_other_graphemes_rely_on() {
        // Dropping "ab" would make "abc" segment as "a" + "bc".
        let mut profile = Profile::from_mapping([
            ("abc", "x y z"),
            ("ab", "x y"),
            ("bc", "q"),
            ("a", "x"),
            ("b", "y"),
            ("c", "z"),
        ])
        .unwrap();
        let tokenizer = Tokenizer::new(profile.clone());
        let before: Vec<_> = profile
            .graphemes()
            .map(|g| tokenizer.transform(g, "IPA").unwrap().join(" "))
            .collect();
        let originals: Vec<String> = profile.graphemes().map(str::to_string).collect();

        while profile.trim("IPA").unwrap() > 0 {}
        assert!(!profile.contains("abc"));
        assert!(profile.contains("ab"));
        assert!(profile.contains("bc"));

        let tokenizer = Tokenizer::new(profile);
        let after: Vec<_> = originals
            .iter()
            .map(|g| tokenizer.transform(g, "IPA").unwrap().join(" "))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_trim_unknown_column() {
        let mut profile = Profile::from_mapping([("a", "a")]).unwrap();
        assert!(profile.trim("BIPA").is_err());
    }

    #[test]
    fn test_sort_order() {
        let mut profile = Profile::from_records(vec![
            record(&[("Grapheme", Some("b")), ("IPA", Some("b"))]),
            record(&[("Grapheme", Some("^a$")), ("IPA", Some("a"))]),
            record(&[("Grapheme", Some("x")), ("IPA", None)]),
            record(&[("Grapheme", Some("aa")), ("IPA", Some("a"))]),
            record(&[("Grapheme", Some("a")), ("IPA", Some("a"))]),
        ])
        .unwrap();
        profile.sort(None, "IPA");
        assert_eq!(
            profile.graphemes().collect::<Vec<_>>(),
            vec!["^", "$", "^a$", "a", "b", "aa", "x"]
        );

        let before: Vec<String> = profile.graphemes().map(str::to_string).collect();
        profile.sort(None, "IPA");
        let after: Vec<String> = profile.graphemes().map(str::to_string).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sort_with_classifier_clusters_classes() {
        let mock = MockClassifier::new();
        let mut profile =
            Profile::from_mapping([("t", "t"), ("e", "e"), ("a", "a"), ("d", "d")]).unwrap();
        profile.sort(Some(&mock), "IPA");
        assert_eq!(
            profile.graphemes().collect::<Vec<_>>(),
            vec!["^", "$", "d", "t", "a", "e"]
        );
    }

    #[test]
    fn test_augment_counts_and_examples() {
        let mut profile = Profile::from_mapping([("^a", "z"), ("a", "x"), ("b", "y")]).unwrap();
        profile.augment(["aab", "ba", "aba"], None, "IPA", 5);

        let frequency = |g: &str| profile.get(g).unwrap().get(FREQUENCY_COLUMN);
        assert_eq!(frequency("^a"), Some("2"));
        assert_eq!(frequency("a"), Some("3"));
        assert_eq!(frequency("b"), Some("3"));
        assert_eq!(frequency(BEGIN), Some("1"));
        assert_eq!(frequency(END), Some("3"));
        assert_eq!(
            profile.get("^a").unwrap().get(EXAMPLES_COLUMN),
            Some("aab;aba")
        );
        assert!(profile.has_column(EXAMPLES_COLUMN));
        assert!(!profile.has_column(SCA_COLUMN));
    }

    #[test]
    fn test_augment_with_classifier_and_limit() {
        let mock = MockClassifier::new();
        let mut profile = Profile::from_mapping([("a", "a"), ("th", "t h")]).unwrap();
        profile.augment(["a", "aa", "aaa"], Some(&mock), "IPA", 2);
        assert_eq!(profile.get("a").unwrap().get(EXAMPLES_COLUMN), Some("a;aa"));
        assert_eq!(profile.get("th").unwrap().get(SCA_COLUMN), Some("T H"));
        assert_eq!(profile.get("th").unwrap().get(FREQUENCY_COLUMN), Some("0"));
        assert_eq!(profile.get(BEGIN).unwrap().get(SCA_COLUMN), Some(""));
    }

    #[test]
    fn test_clean_canonicalizes() {
        let mock = MockClassifier::new().with_sound("ph", "pʰ");
        let mut profile = Profile::from_records(vec![record(&[
            ("Grapheme", Some("p")),
            ("IPA", Some("  ph   a/ph ")),
            ("CODEPOINTS", None),
        ])])
        .unwrap();
        assert_eq!(profile.clean(&mock, "IPA"), 1);
        let entry = profile.get("p").unwrap();
        assert_eq!(entry.get("IPA"), Some("pʰ a/pʰ"));
        assert_eq!(entry.get(CODEPOINTS_COLUMN), Some("U+0070"));
        assert_eq!(profile.get(BEGIN).unwrap().get(CODEPOINTS_COLUMN), None);
    }

    #[test]
    fn test_remove_keeps_sentinels() {
        let mut profile = Profile::from_mapping([("a", "a")]).unwrap();
        assert!(profile.remove(BEGIN).is_none());
        assert!(profile.remove("a").is_some());
        assert!(profile.is_empty());
    }

    #[test]
    fn test_helpers() {
        let mock = MockClassifier::new();
        assert_eq!(ipa_tokens("a  b/c NULL"), vec!["a", "c", "NULL"]);
        assert_eq!(
            ipa_to_soundclass("t a/e NULL", &mock, SoundClassModel::Sca),
            "T V NULL"
        );
        assert_eq!(codepoints("ab"), "U+0061 U+0062");
        assert_eq!(segmentable_form(" ab "), "^ab$");
        assert_eq!(segmentable_form("^ab$"), "^ab$");
        assert_eq!(segmentable_form(""), "^$");
    }
}

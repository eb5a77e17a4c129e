//! Transcription analysis.
//!
//! Scores segmented forms against a [`SegmentClassifier`]: every segment is
//! counted, segments the classifier does not know or cannot assign a sound
//! class are collected, and known segments are mapped to their canonical
//! spelling. One [`Analysis`] accumulates results for one language variety
//! over a whole conversion run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::classifier::{
    CachedClassifier, SegmentClassifier, Sound, SoundClassModel, UNKNOWN_CLASS,
};
use crate::error::{LexibenchError, Result};

/// Accumulated transcription statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Occurrences per segment.
    pub segments: BTreeMap<String, usize>,
    /// Segments the classifier does not know.
    pub bipa_errors: BTreeSet<String>,
    /// Segments without a sound class.
    pub sclass_errors: BTreeSet<String>,
    /// Source spelling to the canonical spellings it was normalized to.
    pub replacements: BTreeMap<String, BTreeSet<String>>,
    /// Number of segments that are unknown or unclassed.
    pub general_errors: usize,
}

impl Analysis {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct segments the classifier knows.
    pub fn inventory_size(&self) -> usize {
        self.segments
            .keys()
            .filter(|s| !self.bipa_errors.contains(*s))
            .count()
    }

    /// Total number of segments seen.
    pub fn segment_count(&self) -> usize {
        self.segments.values().sum()
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Analysis) {
        for (segment, count) in &other.segments {
            *self.segments.entry(segment.clone()).or_insert(0) += count;
        }
        self.bipa_errors.extend(other.bipa_errors.iter().cloned());
        self.sclass_errors.extend(other.sclass_errors.iter().cloned());
        for (source, targets) in &other.replacements {
            self.replacements
                .entry(source.clone())
                .or_default()
                .extend(targets.iter().cloned());
        }
        self.general_errors += other.general_errors;
    }
}

/// Classification of one analyzed segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub segment: String,
    pub sound: Sound,
    pub soundclass: String,
}

impl SegmentAnalysis {
    /// Returns true if the segment is unknown or has no sound class.
    pub fn is_error(&self) -> bool {
        self.sound.is_unknown() || self.soundclass == UNKNOWN_CLASS
    }
}

/// Analyzes segment sequences with a memoizing classifier.
///
/// The cache belongs to the analyzer, so separate analyzers never share
/// lookups.
pub struct Analyzer<'a> {
    classifier: CachedClassifier<'a>,
    model: SoundClassModel,
}

impl<'a> Analyzer<'a> {
    /// Create an analyzer using Dolgopolsky sound classes.
    pub fn new(classifier: &'a dyn SegmentClassifier) -> Self {
        Self {
            classifier: CachedClassifier::new(classifier),
            model: SoundClassModel::Dolgo,
        }
    }

    /// Use another sound class model.
    pub fn with_model(mut self, model: SoundClassModel) -> Self {
        self.model = model;
        self
    }

    /// Number of cached classifier answers.
    pub fn cached(&self) -> usize {
        self.classifier.len()
    }

    /// Analyze one segment sequence, updating `analysis`.
    ///
    /// Fails when the sequence is empty or holds only whitespace.
    pub fn analyze<S: AsRef<str>>(
        &self,
        segments: &[S],
        analysis: &mut Analysis,
    ) -> Result<Vec<SegmentAnalysis>> {
        if segments.is_empty() {
            return Err(LexibenchError::EmptySequence("Empty sequence.".to_string()));
        }
        if segments.iter().all(|s| s.as_ref().trim().is_empty()) {
            return Err(LexibenchError::EmptySequence(
                "No information in the sequence.".to_string(),
            ));
        }

        let results: Vec<SegmentAnalysis> = segments
            .iter()
            .map(|segment| {
                let segment = segment.as_ref();
                SegmentAnalysis {
                    segment: segment.to_string(),
                    sound: self.classifier.classify(segment),
                    soundclass: self.classifier.soundclass(segment, self.model),
                }
            })
            .collect();

        for result in &results {
            if result.is_error() {
                analysis.general_errors += 1;
            }
            *analysis.segments.entry(result.segment.clone()).or_insert(0) += 1;
            if result.sound.is_unknown() {
                analysis.bipa_errors.insert(result.segment.clone());
            } else {
                analysis
                    .replacements
                    .entry(result.sound.source().to_string())
                    .or_default()
                    .insert(result.sound.to_string());
            }
            if result.soundclass == UNKNOWN_CLASS {
                analysis.sclass_errors.insert(result.segment.clone());
            }
        }

        Ok(results)
    }
}

/// Analyze one segment sequence with a fresh analyzer.
pub fn analyze<S: AsRef<str>>(
    classifier: &dyn SegmentClassifier,
    segments: &[S],
    analysis: &mut Analysis,
) -> Result<Vec<SegmentAnalysis>> {
    Analyzer::new(classifier).analyze(segments, analysis)
}

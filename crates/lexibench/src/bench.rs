//! Main Lexibench struct and public API.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::SegmentClassifier;
use crate::cldf::Dataset;
use crate::config::LexibenchConfig;
use crate::db::{Database, LoadReport};
use crate::error::Result;
use crate::profile::{Profile, ProfileIssue, Severity, Tokenizer};
use crate::writer::LexemeWriter;

/// Result of formatting a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatReport {
    /// Entries whose IPA value was rewritten by cleaning.
    pub cleaned: usize,
    /// Redundant rules removed by trimming.
    pub trimmed: usize,
    /// Number of trim passes, including the final one that removed nothing.
    pub trim_passes: usize,
    /// Whether usage statistics were added.
    pub augmented: bool,
    /// Issues found by the final check.
    pub issues: Vec<ProfileIssue>,
}

impl FormatReport {
    /// Number of error-level issues.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }
}

/// The main Lexibench engine.
pub struct Lexibench {
    config: LexibenchConfig,
    classifier: Option<Arc<dyn SegmentClassifier>>,
}

impl Default for Lexibench {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexibench {
    /// Create a new instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(LexibenchConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: LexibenchConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    /// Add a segment classifier.
    ///
    /// Without one, profile cleaning, sound-class sorting and the
    /// unknown-sound check are skipped, and conversions run no analysis.
    pub fn with_classifier(mut self, classifier: impl SegmentClassifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// The configuration.
    pub fn config(&self) -> &LexibenchConfig {
        &self.config
    }

    /// The classifier, if any.
    pub fn classifier(&self) -> Option<&dyn SegmentClassifier> {
        self.classifier.as_deref()
    }

    /// Read a profile using the configured columns and policies.
    pub fn load_profile(&self, path: impl AsRef<Path>) -> Result<Profile> {
        Profile::from_path_with(path, &self.config)
    }

    /// Run the curation sequence on a profile.
    ///
    /// Cleans (with a classifier), trims until a pass removes nothing,
    /// augments with usage statistics when `forms` are given, optionally
    /// sorts, and finally checks.
    pub fn format_profile<S: AsRef<str>>(
        &self,
        profile: &mut Profile,
        forms: Option<&[S]>,
        sort: bool,
    ) -> Result<FormatReport> {
        let ipa = self.config.ipa_column.as_str();
        let mut report = FormatReport::default();

        if let Some(classifier) = self.classifier() {
            report.cleaned = profile.clean(classifier, ipa);
        }
        loop {
            report.trim_passes += 1;
            let removed = profile.trim(ipa)?;
            if removed == 0 {
                break;
            }
            report.trimmed += removed;
        }
        if let Some(forms) = forms {
            profile.augment(forms, self.classifier(), ipa, self.config.example_limit);
            report.augmented = true;
        }
        if sort {
            profile.sort(self.classifier(), ipa);
        }
        report.issues = profile.check(self.classifier(), ipa, self.config.check_mode)?;

        info!(
            "Formatted profile: {} cleaned, {} trimmed, {} issues",
            report.cleaned,
            report.trimmed,
            report.issues.len()
        );
        Ok(report)
    }

    /// Audit a profile with the configured check mode.
    pub fn check_profile(&self, profile: &Profile) -> Result<Vec<ProfileIssue>> {
        profile.check(
            self.classifier(),
            &self.config.ipa_column,
            self.config.check_mode,
        )
    }

    /// A tokenizer over a profile, using the configured separators.
    pub fn tokenizer(&self, profile: Profile) -> Tokenizer {
        Tokenizer::with_config(profile, &self.config)
    }

    /// A writer converting raw data into a wordlist.
    pub fn writer<'a>(
        &'a self,
        dataset_id: impl Into<String>,
        tokenizer: Option<&'a Tokenizer>,
    ) -> LexemeWriter<'a> {
        let mut writer = LexemeWriter::new(dataset_id).with_field(self.config.ipa_column.clone());
        if let Some(tokenizer) = tokenizer {
            writer = writer.with_tokenizer(tokenizer);
        }
        if let Some(classifier) = self.classifier() {
            writer = writer.with_classifier(classifier);
        }
        writer
    }

    /// The configured store.
    pub fn database(&self) -> Database {
        Database::new(&self.config.db_path)
    }

    /// Load a dataset into the configured store.
    pub fn load(&self, dataset: &dyn Dataset) -> Result<LoadReport> {
        self.database().load(dataset)
    }

    /// Remove a dataset from the configured store.
    pub fn unload(&self, dataset_id: &str) -> Result<()> {
        self.database().unload(dataset_id)
    }
}

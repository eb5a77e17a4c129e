//! Consistency audit of orthography profiles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::classifier::SegmentClassifier;
use crate::config::{CheckMode, NULL_MARKER};
use crate::error::{LexibenchError, Result};

use super::{codepoints, ipa_tokens, Profile};

/// Severity level of a profile issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Redundant but harmless.
    Warning,
    /// Changes or breaks tokenization output.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Kind of profile issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The same grapheme is listed more than once with identical values.
    Duplicate,
    /// The same grapheme is listed more than once with different values.
    Inconsistent,
    /// A mapping contains a segment the classifier does not know.
    UnknownSound,
}

/// One finding of [`Profile::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub grapheme: String,
    pub message: String,
}

impl ProfileIssue {
    fn new(severity: Severity, kind: IssueKind, grapheme: &str, message: String) -> Self {
        Self {
            severity,
            kind,
            grapheme: grapheme.to_string(),
            message,
        }
    }

    fn emit(&self) {
        let cps = codepoints(&self.grapheme);
        match self.severity {
            Severity::Info => info!(grapheme = %self.grapheme, codepoints = %cps, "{}", self.message),
            Severity::Warning => {
                warn!(grapheme = %self.grapheme, codepoints = %cps, "{}", self.message)
            }
            Severity::Error => {
                error!(grapheme = %self.grapheme, codepoints = %cps, "{}", self.message)
            }
        }
    }
}

fn render_values(values: &[Option<&str>]) -> String {
    let rendered: Vec<&str> = values.iter().map(|v| v.unwrap_or(NULL_MARKER)).collect();
    format!("[{}]", rendered.join(", "))
}

impl Profile {
    /// Audit the profile.
    ///
    /// Reports repeated graphemes (a warning when all their mappings agree,
    /// an error otherwise) and, given a classifier, mappings that contain
    /// unknown sounds. Every issue is logged. In [`CheckMode::Raise`] the
    /// first error-level issue fails the check instead.
    pub fn check(
        &self,
        classifier: Option<&dyn SegmentClassifier>,
        ipa: &str,
        mode: CheckMode,
    ) -> Result<Vec<ProfileIssue>> {
        let mut mapping: IndexMap<&str, Vec<Option<&str>>> = IndexMap::new();
        for (grapheme, entry) in self.iter() {
            mapping.entry(grapheme).or_default().push(entry.get(ipa));
        }
        for (grapheme, entry) in self.shadowed() {
            mapping
                .entry(grapheme.as_str())
                .or_default()
                .push(entry.get(ipa));
        }

        let mut issues = Vec::new();
        for (grapheme, values) in &mapping {
            if values.len() >= 2 {
                let consistent = values.iter().all(|v| *v == values[0]);
                issues.push(if consistent {
                    ProfileIssue::new(
                        Severity::Warning,
                        IssueKind::Duplicate,
                        grapheme,
                        format!(
                            "Duplicate, redundant entry or entries for grapheme [{}].",
                            grapheme
                        ),
                    )
                } else {
                    ProfileIssue::new(
                        Severity::Error,
                        IssueKind::Inconsistent,
                        grapheme,
                        format!(
                            "Inconsistent entries for grapheme [{}]: multiple mappings {}.",
                            grapheme,
                            render_values(values)
                        ),
                    )
                });
            }

            let Some(classifier) = classifier else {
                continue;
            };
            for value in values.iter().flatten().filter(|v| !v.is_empty()) {
                let unknown = ipa_tokens(value)
                    .into_iter()
                    .filter(|token| !token.is_empty() && *token != NULL_MARKER)
                    .any(|token| classifier.classify(token).is_unknown());
                if unknown {
                    issues.push(ProfileIssue::new(
                        Severity::Error,
                        IssueKind::UnknownSound,
                        grapheme,
                        format!(
                            "Mapping [{}] ({}) -> [{}] ({}) includes an unknown sound.",
                            grapheme,
                            codepoints(grapheme),
                            value,
                            codepoints(value)
                        ),
                    ));
                }
            }
        }

        for issue in &issues {
            if mode == CheckMode::Raise && issue.severity == Severity::Error {
                return Err(LexibenchError::ProfileCheck(issue.message.clone()));
            }
            issue.emit();
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;

    #[test]
    fn test_duplicates_reported() {
        let profile = Profile::from_mapping([("a", "a"), ("a", "a"), ("b", "b"), ("b", "p")])
            .unwrap();
        let issues = profile.check(None, "IPA", CheckMode::Log).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::Duplicate);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].message,
            "Duplicate, redundant entry or entries for grapheme [a]."
        );
        assert_eq!(issues[1].kind, IssueKind::Inconsistent);
        assert!(issues[1].message.contains("[b, p]"));
    }

    #[test]
    fn test_unknown_sounds_reported() {
        let mock = MockClassifier::new();
        let profile = Profile::from_mapping([("a", "a"), ("x", "k 3"), ("q", "NULL")]).unwrap();
        let issues = profile.check(Some(&mock), "IPA", CheckMode::Log).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnknownSound);
        assert_eq!(
            issues[0].message,
            "Mapping [x] (U+0078) -> [k 3] (U+006B U+0020 U+0033) includes an unknown sound."
        );
    }

    #[test]
    fn test_raise_mode() {
        let mock = MockClassifier::new();
        let duplicates = Profile::from_mapping([("a", "a"), ("a", "a")]).unwrap();
        assert_eq!(
            duplicates
                .check(Some(&mock), "IPA", CheckMode::Raise)
                .unwrap()
                .len(),
            1
        );

        let broken = Profile::from_mapping([("x", "3")]).unwrap();
        let result = broken.check(Some(&mock), "IPA", CheckMode::Raise);
        assert!(matches!(result, Err(LexibenchError::ProfileCheck(_))));
    }
}

//! Splitting raw lexical values into forms.
//!
//! A source cell often holds several forms (`"aba, abba (rare)"`). A
//! [`FormSplitter`] turns such a value into the list of forms that become
//! rows of the form table. Datasets inject the strategy they need.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strategy for splitting a raw value into cleaned forms.
pub trait FormSplitter {
    /// Split `value` into forms. Empty and missing forms are dropped.
    fn split(&self, value: &str) -> Vec<String>;
}

/// The configurable default splitter.
///
/// ```
/// use lexibench::forms::{FormSpec, FormSplitter};
///
/// let spec = FormSpec::default();
/// assert_eq!(spec.split("aba (old), abba; ?"), vec!["aba", "abba"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    /// Opening and closing bracket pairs.
    pub brackets: Vec<(char, char)>,
    /// Characters separating forms outside of brackets.
    pub separators: String,
    /// Forms standing for missing data.
    pub missing_data: Vec<String>,
    /// Drop bracketed material from forms.
    pub strip_inside_brackets: bool,
    /// Substring replacements applied to each cleaned form, in order.
    pub replacements: Vec<(String, String)>,
    /// Whole-value overrides, applied before splitting.
    pub lexemes: HashMap<String, String>,
}

impl Default for FormSpec {
    fn default() -> Self {
        Self {
            brackets: vec![('(', ')')],
            separators: ";/,".to_string(),
            missing_data: vec!["?".to_string(), "-".to_string()],
            strip_inside_brackets: true,
            replacements: Vec::new(),
            lexemes: HashMap::new(),
        }
    }
}

impl FormSpec {
    /// Create a spec with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bracket pairs.
    pub fn with_brackets(mut self, brackets: impl IntoIterator<Item = (char, char)>) -> Self {
        self.brackets = brackets.into_iter().collect();
        self
    }

    /// Set the separator characters.
    pub fn with_separators(mut self, separators: impl Into<String>) -> Self {
        self.separators = separators.into();
        self
    }

    /// Set the missing-data markers.
    pub fn with_missing_data<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.missing_data = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Keep or drop bracketed material.
    pub fn with_strip_inside_brackets(mut self, strip: bool) -> Self {
        self.strip_inside_brackets = strip;
        self
    }

    /// Add a substring replacement.
    pub fn with_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replacements.push((from.into(), to.into()));
        self
    }

    /// Override a whole value.
    pub fn with_lexeme(mut self, value: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.lexemes.insert(value.into(), replacement.into());
        self
    }

    /// Clean a single form; `None` for missing data.
    pub fn clean(&self, form: &str) -> Option<String> {
        if self.missing_data.iter().any(|m| m == form) {
            return None;
        }
        let mut form = if self.strip_inside_brackets {
            strip_brackets(form, &self.brackets)
        } else {
            form.to_string()
        };
        for (from, to) in &self.replacements {
            form = form.replace(from.as_str(), to);
        }
        Some(form.trim().to_string())
    }
}

impl FormSplitter for FormSpec {
    fn split(&self, value: &str) -> Vec<String> {
        let value = match self.lexemes.get(value) {
            Some(replacement) => {
                debug!("overriding lexeme {:?} -> {:?}", value, replacement);
                replacement.as_str()
            }
            None => value,
        };
        split_text_with_context(value, &self.separators, &self.brackets)
            .iter()
            .filter_map(|form| self.clean(form))
            .filter(|form| !form.is_empty())
            .collect()
    }
}

/// A splitter keeping only the first form of each value.
#[derive(Debug, Clone, Default)]
pub struct FirstFormOnly {
    spec: FormSpec,
}

impl FirstFormOnly {
    /// Wrap a spec.
    pub fn new(spec: FormSpec) -> Self {
        Self { spec }
    }
}

impl FormSplitter for FirstFormOnly {
    fn split(&self, value: &str) -> Vec<String> {
        let mut forms = self.spec.split(value);
        forms.truncate(1);
        forms
    }
}

/// Walk `text`, reporting for each char whether it is at bracket depth 0.
fn walk_brackets<'a>(
    text: &'a str,
    brackets: &'a [(char, char)],
) -> impl Iterator<Item = (char, bool)> + 'a {
    let mut stack: Vec<char> = Vec::new();
    text.chars().map(move |c| {
        if let Some((_, close)) = brackets.iter().find(|(open, _)| *open == c) {
            stack.push(*close);
            (c, false)
        } else if stack.last() == Some(&c) {
            stack.pop();
            (c, false)
        } else {
            (c, stack.is_empty())
        }
    })
}

/// Remove bracketed material, including nested brackets.
pub fn strip_brackets(text: &str, brackets: &[(char, char)]) -> String {
    walk_brackets(text, brackets)
        .filter(|(_, outside)| *outside)
        .map(|(c, _)| c)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split on separator characters that occur outside of brackets.
///
/// Chunks are trimmed; empty chunks are dropped.
pub fn split_text_with_context(
    text: &str,
    separators: &str,
    brackets: &[(char, char)],
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for (c, outside) in walk_brackets(text, brackets) {
        if outside && separators.contains(c) {
            chunks.push(std::mem::take(&mut chunk));
        } else {
            chunk.push(c);
        }
    }
    chunks.push(chunk);
    chunks
        .into_iter()
        .map(|chunk| chunk.trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_outside_brackets() {
        let brackets = [('(', ')')];
        assert_eq!(
            split_text_with_context("a (b, c), d", ",", &brackets),
            vec!["a (b, c)", "d"]
        );
        assert_eq!(split_text_with_context(" ; ", ";", &brackets), Vec::<String>::new());
    }

    #[test]
    fn test_strip_nested_brackets() {
        let brackets = [('(', ')'), ('[', ']')];
        assert_eq!(strip_brackets("ab (c [d] e) f", &brackets), "ab  f");
        assert_eq!(strip_brackets("(all)", &brackets), "");
    }

    #[test]
    fn test_default_spec() {
        let spec = FormSpec::default();
        assert_eq!(spec.split("aba (old), abba/ -"), vec!["aba", "abba"]);
        assert_eq!(spec.clean("?"), None);
        assert!(spec.split("(unclear)").is_empty());
    }

    #[test]
    fn test_replacements_and_overrides() {
        let spec = FormSpec::new()
            .with_replacement("ß", "ss")
            .with_lexeme("xx", "aba, abba");
        assert_eq!(spec.split("straße"), vec!["strasse"]);
        assert_eq!(spec.split("xx"), vec!["aba", "abba"]);
    }

    #[test]
    fn test_keep_brackets() {
        let spec = FormSpec::new().with_strip_inside_brackets(false);
        assert_eq!(spec.split("aba (old)"), vec!["aba (old)"]);
    }

    #[test]
    fn test_first_form_only() {
        let splitter = FirstFormOnly::default();
        assert_eq!(splitter.split("aba, abba"), vec!["aba"]);
        assert!(splitter.split("?").is_empty());
    }
}

//! Building a CLDF wordlist from raw lexical data.
//!
//! [`LexemeWriter`] is the conversion step of a dataset: it collects
//! languages, concepts, sources and lexemes, splits raw values into forms,
//! segments the forms with a [`Tokenizer`] and keeps a per-language
//! transcription [`Analysis`].
//!
//! Identifiers are made unique across datasets by prefixing them with the
//! dataset id and a slug of the local id (`L 1` becomes `mydata-l1`).

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::classifier::SegmentClassifier;
use crate::cldf::terms::{COGNATE_TABLE, FORM_TABLE, LANGUAGE_TABLE, PARAMETER_TABLE};
use crate::cldf::{Source, Wordlist};
use crate::config::IPA_COLUMN;
use crate::error::{LexibenchError, Result};
use crate::forms::{FormSpec, FormSplitter};
use crate::models::{Cognate, ComponentRecord, Concept, Language, Lexeme};
use crate::profile::{Tokenizer, GRAPHEMES_FIELD};
use crate::transcription::{Analysis, Analyzer};

/// Lowercase ASCII slug of an identifier.
///
/// Diacritics are dropped; anything that is not a letter or digit goes.
pub fn slug(text: &str) -> String {
    text.nfkd()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Collects the records of one dataset into a [`Wordlist`].
pub struct LexemeWriter<'a> {
    dataset_id: String,
    wordlist: Wordlist,
    splitter: Box<dyn FormSplitter + 'a>,
    tokenizer: Option<&'a Tokenizer>,
    analyzer: Option<Analyzer<'a>>,
    field: String,
    analyses: BTreeMap<String, Analysis>,
    seen: HashMap<&'static str, HashSet<String>>,
    lexeme_count: usize,
    cognate_count: usize,
}

impl<'a> LexemeWriter<'a> {
    /// Create a writer for a dataset, splitting values with the default [`FormSpec`].
    pub fn new(dataset_id: impl Into<String>) -> Self {
        let dataset_id = dataset_id.into();
        let wordlist = Wordlist::new(dataset_id.clone());
        Self {
            dataset_id,
            wordlist,
            splitter: Box::new(FormSpec::default()),
            tokenizer: None,
            analyzer: None,
            field: IPA_COLUMN.to_string(),
            analyses: BTreeMap::new(),
            seen: HashMap::new(),
            lexeme_count: 0,
            cognate_count: 0,
        }
    }

    /// Use another form splitting strategy.
    pub fn with_splitter(mut self, splitter: impl FormSplitter + 'a) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Segment forms with a tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: &'a Tokenizer) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Profile field used for segments (`IPA` by default).
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Analyze segments with a classifier.
    pub fn with_classifier(mut self, classifier: &'a dyn SegmentClassifier) -> Self {
        self.analyzer = Some(Analyzer::new(classifier));
        self
    }

    /// The dataset id.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    fn prefixed(&self, id: &str) -> Result<String> {
        let slug = slug(id);
        if slug.is_empty() {
            return Err(LexibenchError::InvalidInput(format!(
                "invalid identifier {:?}",
                id
            )));
        }
        Ok(format!("{}-{}", self.dataset_id, slug))
    }

    /// Add a record unless one with the same id was added before.
    fn push<R: ComponentRecord>(&mut self, record: &R) {
        let seen = self.seen.entry(R::COMPONENT).or_default();
        if seen.insert(record.id().to_string()) {
            self.wordlist.add_row(R::COMPONENT, record.to_row());
        }
    }

    /// Add a language. Returns the record as written.
    pub fn add_language(&mut self, mut language: Language) -> Result<Language> {
        language.id = self.prefixed(&language.id)?;
        self.push(&language);
        Ok(language)
    }

    /// Add a concept. Returns the record as written.
    pub fn add_concept(&mut self, mut concept: Concept) -> Result<Concept> {
        concept.id = self.prefixed(&concept.id)?;
        self.push(&concept);
        Ok(concept)
    }

    /// Add bibliographic sources.
    pub fn add_sources(&mut self, sources: impl IntoIterator<Item = Source>) {
        for source in sources {
            self.wordlist.add_source(source);
        }
    }

    /// Split a lexeme's value into forms and add one row per form.
    ///
    /// Each form gets a running id. Forms are segmented with the tokenizer
    /// unless the lexeme carries explicit segments. Non-empty segment
    /// sequences are analyzed for the lexeme's language.
    pub fn add_lexemes(&mut self, lexeme: Lexeme) -> Result<Vec<Lexeme>> {
        let language_id = self.prefixed(&lexeme.language_id)?;
        let parameter_id = self.prefixed(&lexeme.parameter_id)?;
        let forms = self.splitter.split(&lexeme.value);

        let mut written = Vec::with_capacity(forms.len());
        for form in forms {
            if form != lexeme.value {
                debug!("split {:?} -> {:?}", lexeme.value, form);
            }
            let mut item = lexeme.clone();
            item.language_id = language_id.clone();
            item.parameter_id = parameter_id.clone();

            if let (true, Some(tokenizer)) = (item.segments.is_empty(), self.tokenizer) {
                let key = item.profile.as_deref();
                item.segments = tokenizer.tokenize_with(key, &form, &self.field)?;
                item.graphemes = Some(
                    tokenizer
                        .tokenize_with(key, &form, GRAPHEMES_FIELD)?
                        .join(" "),
                );
            }

            self.lexeme_count += 1;
            item.id = self.prefixed(&self.lexeme_count.to_string())?;
            item.form = form;

            if let (Some(analyzer), false) = (&self.analyzer, item.segments.is_empty()) {
                let analysis = self.analyses.entry(item.language_id.clone()).or_default();
                analyzer.analyze(&item.segments, analysis)?;
            }

            self.push(&item);
            written.push(item);
        }
        Ok(written)
    }

    /// Add a cognate judgement. A judgement without id gets a running one.
    pub fn add_cognate(&mut self, mut cognate: Cognate) -> Result<Cognate> {
        if cognate.id.is_empty() {
            self.cognate_count += 1;
            cognate.id = self.cognate_count.to_string();
        }
        cognate.id = self.prefixed(&cognate.id)?;
        cognate.cognateset_id = self.prefixed(&cognate.cognateset_id)?;
        self.push(&cognate);
        Ok(cognate)
    }

    /// Transcription analyses, keyed by language id.
    pub fn analyses(&self) -> &BTreeMap<String, Analysis> {
        &self.analyses
    }

    /// Finish the conversion.
    pub fn into_wordlist(mut self) -> Wordlist {
        for component in [FORM_TABLE, COGNATE_TABLE, LANGUAGE_TABLE, PARAMETER_TABLE] {
            self.wordlist.ensure_table(component);
        }
        let description = self.wordlist.description_mut();
        description
            .properties
            .insert("rdf:ID".to_string(), self.dataset_id.clone().into());
        info!(
            "Converted dataset {}: {} forms, {} cognates",
            self.dataset_id,
            self.wordlist.table(FORM_TABLE).len(),
            self.wordlist.table(COGNATE_TABLE).len()
        );
        self.wordlist
    }

    /// Finish the conversion, keeping the analyses.
    pub fn finish(self) -> (Wordlist, BTreeMap<String, Analysis>) {
        let analyses = self.analyses.clone();
        (self.into_wordlist(), analyses)
    }
}

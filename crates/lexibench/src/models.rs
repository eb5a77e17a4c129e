//! Structured records of a CLDF wordlist.
//!
//! Records are validated when they are built and only turned into generic
//! [`Row`]s when they are added to a [`Wordlist`](crate::cldf::Wordlist).

use serde::{Deserialize, Serialize};

use crate::cldf::terms::{COGNATE_TABLE, FORM_TABLE, LANGUAGE_TABLE, PARAMETER_TABLE};
use crate::cldf::{CellValue, Row};
use crate::error::{LexibenchError, Result};

/// A record that maps onto a row of one CLDF component.
pub trait ComponentRecord {
    /// The component the record belongs to.
    const COMPONENT: &'static str;

    /// The record's identifier.
    fn id(&self) -> &str;

    /// The record as a row, columns named as in the component's table.
    fn to_row(&self) -> Row;
}

fn non_empty(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(LexibenchError::InvalidInput(format!(
            "{} must be non-empty",
            field
        )));
    }
    Ok(value)
}

fn text(value: &Option<String>) -> CellValue {
    CellValue::from(value.clone())
}

fn list(values: &[String]) -> CellValue {
    if values.is_empty() {
        CellValue::Null
    } else {
        CellValue::List(values.to_vec())
    }
}

/// A language variety.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: Option<String>,
    pub iso639p3code: Option<String>,
    pub glottocode: Option<String>,
    pub macroarea: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub glottolog_name: Option<String>,
    pub family: Option<String>,
}

impl Language {
    /// Create a language; the id must be non-empty.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: non_empty("ID", id.into())?,
            ..Self::default()
        })
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the Glottolog code.
    pub fn with_glottocode(mut self, glottocode: impl Into<String>) -> Self {
        self.glottocode = Some(glottocode.into());
        self
    }

    /// Set the ISO 639-3 code.
    pub fn with_iso639p3code(mut self, code: impl Into<String>) -> Self {
        self.iso639p3code = Some(code.into());
        self
    }

    /// Set the macroarea.
    pub fn with_macroarea(mut self, macroarea: impl Into<String>) -> Self {
        self.macroarea = Some(macroarea.into());
        self
    }

    /// Set the coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Set the family name.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

impl ComponentRecord for Language {
    const COMPONENT: &'static str = LANGUAGE_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("ID".to_string(), CellValue::from(self.id.as_str()));
        row.insert("Name".to_string(), text(&self.name));
        row.insert("Glottocode".to_string(), text(&self.glottocode));
        row.insert("Glottolog_Name".to_string(), text(&self.glottolog_name));
        row.insert("ISO639P3code".to_string(), text(&self.iso639p3code));
        row.insert("Macroarea".to_string(), text(&self.macroarea));
        row.insert(
            "Latitude".to_string(),
            self.latitude.map(CellValue::Float).unwrap_or_default(),
        );
        row.insert(
            "Longitude".to_string(),
            self.longitude.map(CellValue::Float).unwrap_or_default(),
        );
        row.insert("Family".to_string(), text(&self.family));
        row
    }
}

/// A concept, the parameter of a wordlist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub concepticon_id: Option<String>,
    pub concepticon_gloss: Option<String>,
}

impl Concept {
    /// Create a concept; the id must be non-empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: non_empty("ID", id.into())?,
            name: name.into(),
            ..Self::default()
        })
    }

    /// Link the concept to a Concepticon concept set.
    pub fn with_concepticon(mut self, id: impl Into<String>, gloss: impl Into<String>) -> Self {
        self.concepticon_id = Some(id.into());
        self.concepticon_gloss = Some(gloss.into());
        self
    }
}

impl ComponentRecord for Concept {
    const COMPONENT: &'static str = PARAMETER_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("ID".to_string(), CellValue::from(self.id.as_str()));
        row.insert("Name".to_string(), CellValue::from(self.name.as_str()));
        row.insert("Concepticon_ID".to_string(), text(&self.concepticon_id));
        row.insert(
            "Concepticon_Gloss".to_string(),
            text(&self.concepticon_gloss),
        );
        row
    }
}

/// A raw lexical item and the form derived from it.
///
/// `value` is the item as found in the source; `form` is one cleaned form
/// split off it. The id and form are assigned when the lexeme is written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lexeme {
    pub id: String,
    pub form: String,
    pub value: String,
    pub language_id: String,
    pub parameter_id: String,
    pub local_id: Option<String>,
    pub segments: Vec<String>,
    pub graphemes: Option<String>,
    /// Key of the profile used for the segmentation.
    pub profile: Option<String>,
    pub source: Vec<String>,
    pub comment: Option<String>,
    pub cognacy: Option<String>,
    pub loan: Option<bool>,
}

impl Lexeme {
    /// Create a lexeme.
    ///
    /// Fails when the value, language or parameter is empty.
    pub fn new(
        language_id: impl Into<String>,
        parameter_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            value: non_empty("Value", value.into())?,
            language_id: non_empty("Language_ID", language_id.into())?,
            parameter_id: non_empty("Parameter_ID", parameter_id.into())?,
            ..Self::default()
        })
    }

    /// Set the id of the item in the source.
    pub fn with_local_id(mut self, local_id: impl Into<String>) -> Self {
        self.local_id = Some(local_id.into());
        self
    }

    /// Use explicit segments instead of tokenizing the form.
    pub fn with_segments<S: Into<String>>(mut self, segments: impl IntoIterator<Item = S>) -> Self {
        self.segments = segments.into_iter().map(Into::into).collect();
        self
    }

    /// Select a named profile for segmentation.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Add a citation (`id` or `id[context]`).
    pub fn with_source(mut self, citation: impl Into<String>) -> Self {
        self.source.push(citation.into());
        self
    }

    /// Set a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the raw cognacy code.
    pub fn with_cognacy(mut self, cognacy: impl Into<String>) -> Self {
        self.cognacy = Some(cognacy.into());
        self
    }

    /// Mark the item as a loan (or not).
    pub fn with_loan(mut self, loan: bool) -> Self {
        self.loan = Some(loan);
        self
    }
}

impl ComponentRecord for Lexeme {
    const COMPONENT: &'static str = FORM_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("ID".to_string(), CellValue::from(self.id.as_str()));
        row.insert("Local_ID".to_string(), text(&self.local_id));
        row.insert(
            "Language_ID".to_string(),
            CellValue::from(self.language_id.as_str()),
        );
        row.insert(
            "Parameter_ID".to_string(),
            CellValue::from(self.parameter_id.as_str()),
        );
        row.insert("Value".to_string(), CellValue::from(self.value.as_str()));
        row.insert("Form".to_string(), CellValue::from(self.form.as_str()));
        row.insert("Segments".to_string(), list(&self.segments));
        row.insert("Graphemes".to_string(), text(&self.graphemes));
        row.insert("Profile".to_string(), text(&self.profile));
        row.insert("Comment".to_string(), text(&self.comment));
        row.insert("Source".to_string(), list(&self.source));
        row.insert("Cognacy".to_string(), text(&self.cognacy));
        row.insert(
            "Loan".to_string(),
            self.loan.map(CellValue::Boolean).unwrap_or_default(),
        );
        row
    }
}

/// A cognate judgement on a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cognate {
    pub id: String,
    pub form_id: String,
    pub form: Option<String>,
    pub cognateset_id: String,
    pub doubt: bool,
    pub cognate_detection_method: String,
    pub source: Vec<String>,
    pub alignment: Option<Vec<String>>,
    pub alignment_method: Option<String>,
    pub alignment_source: Option<String>,
}

impl Cognate {
    /// Create an expert judgement putting a form into a cognate set.
    pub fn new(form_id: impl Into<String>, cognateset_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: String::new(),
            form_id: non_empty("Form_ID", form_id.into())?,
            form: None,
            cognateset_id: non_empty("Cognateset_ID", cognateset_id.into())?,
            doubt: false,
            cognate_detection_method: "expert".to_string(),
            source: Vec::new(),
            alignment: None,
            alignment_method: None,
            alignment_source: None,
        })
    }

    /// Create a judgement for a written lexeme, copying its id and form.
    pub fn for_lexeme(lexeme: &Lexeme, cognateset_id: impl Into<String>) -> Result<Self> {
        let mut cognate = Self::new(lexeme.id.clone(), cognateset_id)?;
        cognate.form = Some(lexeme.form.clone());
        Ok(cognate)
    }

    /// Mark the judgement as doubtful.
    pub fn with_doubt(mut self, doubt: bool) -> Self {
        self.doubt = doubt;
        self
    }

    /// Set the detection method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.cognate_detection_method = method.into();
        self
    }

    /// Add a citation.
    pub fn with_source(mut self, citation: impl Into<String>) -> Self {
        self.source.push(citation.into());
        self
    }

    /// Set the alignment from a whitespace-separated string.
    pub fn with_alignment(mut self, alignment: &str) -> Self {
        self.alignment = Some(alignment.split_whitespace().map(str::to_string).collect());
        self
    }
}

impl ComponentRecord for Cognate {
    const COMPONENT: &'static str = COGNATE_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("ID".to_string(), CellValue::from(self.id.as_str()));
        row.insert("Form_ID".to_string(), CellValue::from(self.form_id.as_str()));
        row.insert("Form".to_string(), text(&self.form));
        row.insert(
            "Cognateset_ID".to_string(),
            CellValue::from(self.cognateset_id.as_str()),
        );
        row.insert("Doubt".to_string(), CellValue::Boolean(self.doubt));
        row.insert(
            "Cognate_Detection_Method".to_string(),
            CellValue::from(self.cognate_detection_method.as_str()),
        );
        row.insert("Source".to_string(), list(&self.source));
        row.insert(
            "Alignment".to_string(),
            self.alignment.as_deref().map(list).unwrap_or_default(),
        );
        row.insert("Alignment_Method".to_string(), text(&self.alignment_method));
        row.insert("Alignment_Source".to_string(), text(&self.alignment_source));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexeme_requires_fields() {
        assert!(Lexeme::new("l1", "p1", "aba").is_ok());
        assert!(matches!(
            Lexeme::new("l1", "p1", " "),
            Err(LexibenchError::InvalidInput(_))
        ));
        assert!(Lexeme::new("", "p1", "aba").is_err());
        assert!(Lexeme::new("l1", "", "aba").is_err());
    }

    #[test]
    fn test_lexeme_row() {
        let mut lexeme = Lexeme::new("l1", "p1", "aba (x)")
            .unwrap()
            .with_source("Smith2001[12-15]")
            .with_loan(false);
        lexeme.id = "f1".to_string();
        lexeme.form = "aba".to_string();
        lexeme.segments = vec!["a".into(), "b".into(), "a".into()];

        let row = lexeme.to_row();
        assert_eq!(row["ID"], CellValue::from("f1"));
        assert_eq!(row["Segments"].as_list(), vec!["a", "b", "a"]);
        assert_eq!(row["Source"].as_list(), vec!["Smith2001[12-15]"]);
        assert_eq!(row["Loan"], CellValue::Boolean(false));
        assert!(row["Comment"].is_null());
    }

    #[test]
    fn test_language_row() {
        let row = Language::new("l1")
            .unwrap()
            .with_name("Lang")
            .with_coordinates(12.5, -3.0)
            .to_row();
        assert_eq!(row["Latitude"], CellValue::Float(12.5));
        assert!(row["Glottocode"].is_null());
        assert!(Language::new("").is_err());
    }

    #[test]
    fn test_cognate_defaults() {
        let mut lexeme = Lexeme::new("l1", "p1", "aba").unwrap();
        lexeme.id = "f1".to_string();
        lexeme.form = "aba".to_string();
        let cognate = Cognate::for_lexeme(&lexeme, "c1")
            .unwrap()
            .with_alignment("a b - a");
        assert_eq!(cognate.cognate_detection_method, "expert");
        assert_eq!(cognate.form.as_deref(), Some("aba"));

        let row = cognate.to_row();
        assert_eq!(row["Alignment"].as_list(), vec!["a", "b", "-", "a"]);
        assert_eq!(row["Doubt"], CellValue::Boolean(false));
    }
}

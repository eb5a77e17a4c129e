//! CLDF ontology terms and the default column names of standard components.

/// Namespace of the CLDF ontology.
pub const TERMS_BASE: &str = "http://cldf.clld.org/v1.0/terms.rdf#";

/// Component holding word forms.
pub const FORM_TABLE: &str = "FormTable";
/// Component holding language varieties.
pub const LANGUAGE_TABLE: &str = "LanguageTable";
/// Component holding concepts.
pub const PARAMETER_TABLE: &str = "ParameterTable";
/// Component holding cognate judgements.
pub const COGNATE_TABLE: &str = "CognateTable";
/// Component holding cognate sets.
pub const COGNATESET_TABLE: &str = "CognatesetTable";
/// Component holding borrowing judgements.
pub const BORROWING_TABLE: &str = "BorrowingTable";
/// Name of the store table holding bibliographic sources.
pub const SOURCE_TABLE: &str = "SourceTable";

/// Build the full URI of a term.
pub fn term_uri(term: &str) -> String {
    format!("{}{}", TERMS_BASE, term)
}

/// The local name of a term URI, if it belongs to the CLDF ontology.
pub fn term_name(uri: &str) -> Option<&str> {
    uri.strip_prefix(TERMS_BASE)
}

const FORM_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("languageReference", "Language_ID"),
    ("parameterReference", "Parameter_ID"),
    ("value", "Value"),
    ("form", "Form"),
    ("segments", "Segments"),
    ("comment", "Comment"),
    ("source", "Source"),
];

const LANGUAGE_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("name", "Name"),
    ("macroarea", "Macroarea"),
    ("latitude", "Latitude"),
    ("longitude", "Longitude"),
    ("glottocode", "Glottocode"),
    ("iso639P3code", "ISO639P3code"),
];

const PARAMETER_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("name", "Name"),
    ("description", "Description"),
    ("concepticonReference", "Concepticon_ID"),
];

const COGNATE_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("formReference", "Form_ID"),
    ("cognatesetReference", "Cognateset_ID"),
    ("segmentSlice", "Segment_Slice"),
    ("alignment", "Alignment"),
    ("source", "Source"),
];

const COGNATESET_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("description", "Description"),
    ("source", "Source"),
];

const BORROWING_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("targetFormReference", "Target_Form_ID"),
    ("sourceFormReference", "Source_Form_ID"),
    ("comment", "Comment"),
    ("source", "Source"),
];

const COMPONENTS: &[(&str, &[(&str, &str)])] = &[
    (FORM_TABLE, FORM_COLUMNS),
    (LANGUAGE_TABLE, LANGUAGE_COLUMNS),
    (PARAMETER_TABLE, PARAMETER_COLUMNS),
    (COGNATE_TABLE, COGNATE_COLUMNS),
    (COGNATESET_TABLE, COGNATESET_COLUMNS),
    (BORROWING_TABLE, BORROWING_COLUMNS),
];

/// Returns true for the standard components with default column names.
pub fn is_standard_component(component: &str) -> bool {
    COMPONENTS.iter().any(|(name, _)| *name == component)
}

/// Default column name of a term within a standard component.
///
/// Accepts the bare term (`"id"`) or its full URI.
pub fn default_column(component: &str, term: &str) -> Option<&'static str> {
    let term = term_name(term).unwrap_or(term);
    COMPONENTS
        .iter()
        .find(|(name, _)| *name == component)
        .and_then(|(_, columns)| columns.iter().find(|(t, _)| *t == term))
        .map(|(_, column)| *column)
}

/// Component name of a `dc:conformsTo` URI.
pub fn component_name(conforms_to: &str) -> Option<&str> {
    term_name(conforms_to).filter(|name| name.ends_with("Table"))
}

//! CLDF dataset descriptions (the JSON metadata of a dataset).

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LexibenchError, Result};

use super::terms::{
    self, COGNATE_TABLE, FORM_TABLE, LANGUAGE_TABLE, PARAMETER_TABLE, TERMS_BASE,
};

/// A single name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// All names as a list.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(name) => vec![name.clone()],
            OneOrMany::Many(names) => names.clone(),
        }
    }

    /// The first name.
    pub fn first(&self) -> Option<&str> {
        match self {
            OneOrMany::One(name) => Some(name),
            OneOrMany::Many(names) => names.first().map(String::as_str),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(name: &str) -> Self {
        OneOrMany::One(name.to_string())
    }
}

/// Declared datatype of a column: a bare name or an object with a `base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datatype {
    Name(String),
    Spec {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<String>,
    },
}

impl Datatype {
    /// The base datatype name.
    pub fn base(&self) -> &str {
        match self {
            Datatype::Name(name) => name,
            Datatype::Spec { base } => base.as_deref().unwrap_or("string"),
        }
    }
}

/// A column of a table description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(rename = "propertyUrl", default, skip_serializing_if = "Option::is_none")]
    pub property_url: Option<String>,
}

impl ColumnDescription {
    /// Create a string column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the datatype.
    pub fn with_datatype(mut self, datatype: &str) -> Self {
        self.datatype = Some(Datatype::Name(datatype.to_string()));
        self
    }

    /// Make the column list-valued.
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = Some(separator.to_string());
        self
    }

    /// Tie the column to a CLDF term.
    pub fn with_term(mut self, term: &str) -> Self {
        self.property_url = Some(terms::term_uri(term));
        self
    }

    /// Name used in the CSV header.
    pub fn header(&self) -> &str {
        if self.name.is_empty() {
            self.titles
                .as_ref()
                .and_then(OneOrMany::first)
                .unwrap_or_default()
        } else {
            &self.name
        }
    }

    /// Base datatype name, `string` when undeclared.
    pub fn datatype_base(&self) -> &str {
        self.datatype.as_ref().map(Datatype::base).unwrap_or("string")
    }

    /// The CLDF term of the column, if any.
    pub fn term(&self) -> Option<&str> {
        self.property_url.as_deref().and_then(terms::term_name)
    }
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    pub resource: String,
    #[serde(rename = "columnReference")]
    pub column_reference: OneOrMany,
    #[serde(rename = "schemaReference", default, skip_serializing_if = "Option::is_none")]
    pub schema_reference: Option<String>,
}

/// A foreign key of a table description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescription {
    #[serde(rename = "columnReference")]
    pub column_reference: OneOrMany,
    pub reference: ForeignKeyReference,
}

/// Columns and keys of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub columns: Vec<ColumnDescription>,
    #[serde(rename = "foreignKeys", default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeyDescription>,
    #[serde(rename = "primaryKey", default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<OneOrMany>,
}

/// A table of a dataset description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableDescription {
    pub url: String,
    #[serde(rename = "dc:conformsTo", default, skip_serializing_if = "Option::is_none")]
    pub conforms_to: Option<String>,
    #[serde(rename = "tableSchema", default)]
    pub schema: TableSchema,
}

impl TableDescription {
    /// Create a table conforming to a CLDF component.
    pub fn new(url: impl Into<String>, component: &str) -> Self {
        Self {
            url: url.into(),
            conforms_to: Some(terms::term_uri(component)),
            schema: TableSchema::default(),
        }
    }

    /// Add a column.
    pub fn with_column(mut self, column: ColumnDescription) -> Self {
        self.schema.columns.push(column);
        self
    }

    /// Add a single-column foreign key.
    pub fn with_foreign_key(mut self, column: &str, resource: &str, target: &str) -> Self {
        self.schema.foreign_keys.push(ForeignKeyDescription {
            column_reference: column.into(),
            reference: ForeignKeyReference {
                resource: resource.to_string(),
                column_reference: target.into(),
                schema_reference: None,
            },
        });
        self
    }

    /// The component this table conforms to.
    pub fn component(&self) -> Option<&str> {
        self.conforms_to.as_deref().and_then(terms::component_name)
    }

    /// Look up a column by its header.
    pub fn column(&self, header: &str) -> Option<&ColumnDescription> {
        self.schema.columns.iter().find(|c| c.header() == header)
    }

    /// Look up a column by its CLDF term.
    pub fn column_by_term(&self, term: &str) -> Option<&ColumnDescription> {
        self.schema.columns.iter().find(|c| c.term() == Some(term))
    }
}

/// The metadata of a CLDF dataset.
///
/// Keys other than `tables` are kept verbatim, in document order, as
/// dataset-level properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatasetDescription {
    #[serde(default)]
    pub tables: Vec<TableDescription>,
    #[serde(flatten)]
    pub properties: IndexMap<String, Value>,
}

impl DatasetDescription {
    /// Create a description of the given CLDF module (e.g. `Wordlist`).
    pub fn new(module: &str) -> Self {
        let mut properties = IndexMap::new();
        properties.insert(
            "@context".to_string(),
            Value::String("http://www.w3.org/ns/csvw".to_string()),
        );
        properties.insert(
            "dc:conformsTo".to_string(),
            Value::String(format!("{}{}", TERMS_BASE, module)),
        );
        Self {
            tables: Vec::new(),
            properties,
        }
    }

    /// Parse a description from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let description: Self = serde_json::from_str(text)?;
        for table in &description.tables {
            if table.url.is_empty() {
                return Err(LexibenchError::Metadata(
                    "table description without url".to_string(),
                ));
            }
        }
        Ok(description)
    }

    /// Read a description from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LexibenchError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// A wordlist with the standard form, language, concept and cognate tables.
    pub fn wordlist() -> Self {
        let string = ColumnDescription::new;
        Self::new("Wordlist")
            .with_table(
                TableDescription::new("forms.csv", FORM_TABLE)
                    .with_column(string("ID").with_term("id"))
                    .with_column(string("Local_ID"))
                    .with_column(string("Language_ID").with_term("languageReference"))
                    .with_column(string("Parameter_ID").with_term("parameterReference"))
                    .with_column(string("Value").with_term("value"))
                    .with_column(string("Form").with_term("form"))
                    .with_column(string("Segments").with_term("segments").with_separator(" "))
                    .with_column(string("Graphemes"))
                    .with_column(string("Profile"))
                    .with_column(string("Comment").with_term("comment"))
                    .with_column(string("Source").with_term("source").with_separator(";"))
                    .with_column(string("Cognacy"))
                    .with_column(string("Loan").with_datatype("boolean"))
                    .with_foreign_key("Language_ID", "languages.csv", "ID")
                    .with_foreign_key("Parameter_ID", "parameters.csv", "ID"),
            )
            .with_table(
                TableDescription::new("languages.csv", LANGUAGE_TABLE)
                    .with_column(string("ID").with_term("id"))
                    .with_column(string("Name").with_term("name"))
                    .with_column(string("Glottocode").with_term("glottocode"))
                    .with_column(string("Glottolog_Name"))
                    .with_column(string("ISO639P3code").with_term("iso639P3code"))
                    .with_column(string("Macroarea").with_term("macroarea"))
                    .with_column(
                        string("Latitude")
                            .with_term("latitude")
                            .with_datatype("decimal"),
                    )
                    .with_column(
                        string("Longitude")
                            .with_term("longitude")
                            .with_datatype("decimal"),
                    )
                    .with_column(string("Family")),
            )
            .with_table(
                TableDescription::new("parameters.csv", PARAMETER_TABLE)
                    .with_column(string("ID").with_term("id"))
                    .with_column(string("Name").with_term("name"))
                    .with_column(string("Concepticon_ID").with_term("concepticonReference"))
                    .with_column(string("Concepticon_Gloss")),
            )
            .with_table(
                TableDescription::new("cognates.csv", COGNATE_TABLE)
                    .with_column(string("ID").with_term("id"))
                    .with_column(string("Form_ID").with_term("formReference"))
                    .with_column(string("Form"))
                    .with_column(string("Cognateset_ID").with_term("cognatesetReference"))
                    .with_column(string("Doubt").with_datatype("boolean"))
                    .with_column(string("Cognate_Detection_Method"))
                    .with_column(string("Source").with_term("source").with_separator(";"))
                    .with_column(string("Alignment").with_term("alignment").with_separator(" "))
                    .with_column(string("Alignment_Method"))
                    .with_column(string("Alignment_Source"))
                    .with_foreign_key("Form_ID", "forms.csv", "ID"),
            )
    }

    /// Add a table.
    pub fn with_table(mut self, table: TableDescription) -> Self {
        self.tables.push(table);
        self
    }

    /// Set a dataset-level property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// A property rendered as text; JSON for non-string values.
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(render_value)
    }

    /// Prefixed properties (`dc:title`, `rdf:ID`, ...) rendered as text.
    pub fn common_properties(&self) -> Vec<(String, String)> {
        self.properties
            .iter()
            .filter(|(key, _)| !key.starts_with('@') && key.contains(':'))
            .map(|(key, value)| (key.clone(), render_value(value)))
            .collect()
    }

    /// The table conforming to a component.
    pub fn component(&self, name: &str) -> Option<&TableDescription> {
        self.tables.iter().find(|t| t.component() == Some(name))
    }

    /// Tables conforming to a CLDF component, with their component names.
    pub fn components(&self) -> impl Iterator<Item = (&str, &TableDescription)> {
        self.tables
            .iter()
            .filter_map(|t| t.component().map(|name| (name, t)))
    }

    /// Look up a table by its url.
    pub fn table_by_url(&self, url: &str) -> Option<&TableDescription> {
        self.tables.iter().find(|t| t.url == url)
    }

    /// Serialize back to JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"{
        "@context": "http://www.w3.org/ns/csvw",
        "dc:conformsTo": "http://cldf.clld.org/v1.0/terms.rdf#Wordlist",
        "dc:title": "A test wordlist",
        "rdf:ID": "test",
        "tables": [
            {
                "url": "forms.csv",
                "dc:conformsTo": "http://cldf.clld.org/v1.0/terms.rdf#FormTable",
                "tableSchema": {
                    "columns": [
                        {"name": "ID", "propertyUrl": "http://cldf.clld.org/v1.0/terms.rdf#id"},
                        {"name": "Segments", "separator": " ",
                         "propertyUrl": "http://cldf.clld.org/v1.0/terms.rdf#segments"},
                        {"name": "Count", "datatype": {"base": "integer", "minimum": 0}},
                        {"titles": "Note", "datatype": "string"}
                    ],
                    "foreignKeys": [
                        {"columnReference": ["Language_ID"],
                         "reference": {"resource": "languages.csv", "columnReference": "ID"}}
                    ],
                    "primaryKey": "ID"
                }
            },
            {"url": "extra.csv", "tableSchema": {"columns": []}}
        ]
    }"#;

    #[test]
    fn test_parse_description() {
        let description = DatasetDescription::from_json_str(METADATA).unwrap();
        assert_eq!(description.tables.len(), 2);
        assert_eq!(description.components().count(), 1);

        let forms = description.component(FORM_TABLE).unwrap();
        assert_eq!(forms.column_by_term("segments").unwrap().separator.as_deref(), Some(" "));
        assert_eq!(forms.column("Count").unwrap().datatype_base(), "integer");
        assert_eq!(forms.column("Note").unwrap().datatype_base(), "string");
        assert_eq!(forms.column("ID").unwrap().term(), Some("id"));

        let fk = &forms.schema.foreign_keys[0];
        assert_eq!(fk.column_reference.to_vec(), vec!["Language_ID"]);
        assert_eq!(fk.reference.column_reference.to_vec(), vec!["ID"]);
    }

    #[test]
    fn test_common_properties() {
        let description = DatasetDescription::from_json_str(METADATA).unwrap();
        let properties = description.common_properties();
        let keys: Vec<&str> = properties.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["dc:conformsTo", "dc:title", "rdf:ID"]);
        assert_eq!(description.property("rdf:ID").as_deref(), Some("test"));
    }

    #[test]
    fn test_wordlist_round_trips_through_json() {
        let description = DatasetDescription::wordlist().with_property("dc:title", "Words");
        let json = description.to_json_string().unwrap();
        let parsed = DatasetDescription::from_json_str(&json).unwrap();
        assert_eq!(parsed, description);
        assert!(parsed.component(COGNATE_TABLE).is_some());
    }

    #[test]
    fn test_missing_url_rejected() {
        let result = DatasetDescription::from_json_str(r#"{"tables": [{"tableSchema": {}}]}"#);
        assert!(result.is_err());
    }
}

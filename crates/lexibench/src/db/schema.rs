//! Compiling dataset descriptions into physical table specifications.
//!
//! Only CLDF components are compiled. Columns of standard components are
//! named by their default names (`Language_ID` for `languageReference`),
//! other columns keep their CSV header. Every table gets a `dataset_ID`
//! discriminator and a composite primary key of (`dataset_ID`, id column).
//!
//! A column listing bibliographic sources is not stored on its table. It is
//! replaced by an association table `<Type>Source` linking rows to entries of
//! `SourceTable`.

use std::fmt;

use indexmap::IndexMap;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cldf::terms::{self, SOURCE_TABLE};
use crate::cldf::{CellValue, DatasetDescription, TableDescription};
use crate::error::{LexibenchError, Result};

/// Upper bound on ordering passes over the tables.
const MAX_ORDERING_PASSES: usize = 100;

/// Name of the discriminator column added to every table.
pub const DATASET_ID: &str = "dataset_ID";

/// Separator used to store list values without a declared separator.
pub const DEFAULT_LIST_SEPARATOR: &str = ";";

/// Physical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    /// Physical type of a CSVW base datatype.
    ///
    /// Booleans are stored as 0/1 integers; unknown datatypes as text.
    pub fn from_datatype(base: &str) -> Self {
        match base {
            "integer" | "boolean" => SqlType::Integer,
            "decimal" => SqlType::Real,
            _ => SqlType::Text,
        }
    }

    /// The SQL type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name in the store.
    pub name: String,
    /// Declared CSVW base datatype.
    pub datatype: String,
    pub separator: Option<String>,
    pub primary_key: bool,
    pub sql_type: SqlType,
    /// Header of the column in the dataset's rows.
    pub cldf_name: String,
}

impl ColumnSpec {
    /// A text column.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            cldf_name: name.clone(),
            name,
            datatype: "string".to_string(),
            separator: None,
            primary_key: false,
            sql_type: SqlType::Text,
        }
    }

    /// Set the declared datatype, deriving the physical type.
    pub fn with_datatype(mut self, datatype: &str) -> Self {
        self.datatype = datatype.to_string();
        self.sql_type = SqlType::from_datatype(datatype);
        self
    }

    /// Column definition as used in `CREATE TABLE`.
    pub fn sql(&self) -> String {
        format!("`{}` {}", self.name, self.sql_type)
    }

    /// Convert a cell value for storage.
    ///
    /// List values are joined with the column's separator (`;` when none is
    /// declared) after dropping empty items.
    pub fn convert(&self, value: &CellValue) -> Value {
        match value {
            CellValue::Null => Value::Null,
            CellValue::List(items) => {
                let separator = self.separator.as_deref().unwrap_or(DEFAULT_LIST_SEPARATOR);
                let items: Vec<&str> = items
                    .iter()
                    .map(String::as_str)
                    .filter(|item| !item.is_empty())
                    .collect();
                Value::Text(items.join(separator))
            }
            scalar => match self.sql_type {
                SqlType::Integer => match scalar {
                    CellValue::Boolean(b) => Value::Integer(i64::from(*b)),
                    CellValue::Integer(i) => Value::Integer(*i),
                    CellValue::Float(x) => Value::Real(*x),
                    other => {
                        let text = other.to_string();
                        text.trim()
                            .parse()
                            .map(Value::Integer)
                            .unwrap_or(Value::Text(text))
                    }
                },
                SqlType::Real => match scalar {
                    CellValue::Float(x) => Value::Real(*x),
                    CellValue::Integer(i) => Value::Real(*i as f64),
                    other => {
                        let text = other.to_string();
                        text.trim()
                            .parse()
                            .map(Value::Real)
                            .unwrap_or(Value::Text(text))
                    }
                },
                SqlType::Text => Value::Text(scalar.to_string()),
            },
        }
    }
}

/// A foreign key between physical tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    pub columns: Vec<String>,
    pub table: String,
    pub references: Vec<String>,
}

impl ForeignKeySpec {
    /// Create a foreign key.
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        table: impl Into<String>,
        references: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            table: table.into(),
            references: references.into_iter().map(Into::into).collect(),
        }
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(",")
}

/// A physical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub foreign_keys: Vec<ForeignKeySpec>,
    /// Header of the source column an association table takes its rows from.
    pub consumes: Option<String>,
    pub primary_key: Option<String>,
}

impl TableSpec {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            consumes: None,
            primary_key: None,
        }
    }

    /// Look up a column by its store name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column by its header in the dataset.
    pub fn column_by_cldf_name(&self, cldf_name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.cldf_name == cldf_name)
    }

    /// Names of the tables this table references.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys.iter().map(|fk| fk.table.as_str())
    }

    /// The `CREATE TABLE` statement.
    pub fn sql(&self) -> String {
        let mut clauses: Vec<String> = self.columns.iter().map(ColumnSpec::sql).collect();
        clauses.push(format!("`{}` TEXT NOT NULL", DATASET_ID));
        if let Some(primary_key) = &self.primary_key {
            clauses.push(format!("PRIMARY KEY(`{}`, `{}`)", DATASET_ID, primary_key));
        }
        clauses.push(format!(
            "FOREIGN KEY(`{}`) REFERENCES dataset(`ID`) ON DELETE CASCADE",
            DATASET_ID
        ));
        for fk in &self.foreign_keys {
            clauses.push(format!(
                "FOREIGN KEY({}) REFERENCES {}({}) ON DELETE CASCADE",
                quoted(&fk.columns),
                fk.table,
                quoted(&fk.references)
            ));
        }
        format!("CREATE TABLE {} (\n    {}\n)", self.name, clauses.join(",\n    "))
    }
}

/// Compiled store schema of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Component tables, ordered so that referenced tables come first.
    pub tables: Vec<TableSpec>,
    /// Association tables, keyed by the component whose sources they hold.
    pub references: IndexMap<String, TableSpec>,
}

impl Schema {
    /// Look up a component table.
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Store name of a column of `table`, looked up by header.
fn store_name(component: &str, table: &TableDescription, header: &str) -> String {
    table
        .column(header)
        .and_then(|c| c.property_url.as_deref())
        .and_then(|uri| terms::default_column(component, uri))
        .map(str::to_string)
        .unwrap_or_else(|| header.to_string())
}

fn compile_table(
    component: &str,
    table: &TableDescription,
    lookup: &IndexMap<&str, (&str, &TableDescription)>,
    references: &mut IndexMap<String, TableSpec>,
) -> Result<TableSpec> {
    let id_column = table.column_by_term("id").ok_or_else(|| {
        LexibenchError::Metadata(format!(
            "table {} ({}) has no id column",
            table.url, component
        ))
    })?;
    let primary_key = terms::default_column(component, "id")
        .map(str::to_string)
        .unwrap_or_else(|| id_column.header().to_string());

    let mut spec = TableSpec::new(component);
    spec.primary_key = Some(primary_key.clone());

    for column in &table.schema.columns {
        if column.term() == Some("source") {
            let object = component.strip_suffix("Table").unwrap_or(component);
            let object_id = format!("{}_ID", object);
            let mut association = TableSpec::new(format!("{}Source", object));
            association.columns = vec![
                ColumnSpec::new(object_id.clone()),
                ColumnSpec::new("Source_ID"),
                ColumnSpec::new("Context"),
            ];
            association.foreign_keys = vec![
                ForeignKeySpec::new(
                    [DATASET_ID.to_string(), object_id],
                    component,
                    [DATASET_ID.to_string(), primary_key.clone()],
                ),
                ForeignKeySpec::new([DATASET_ID, "Source_ID"], SOURCE_TABLE, [DATASET_ID, "ID"]),
            ];
            association.consumes = Some(column.header().to_string());
            references.insert(component.to_string(), association);
            continue;
        }

        let name = store_name(component, table, column.header());
        let mut spec_column = ColumnSpec::new(name.clone()).with_datatype(column.datatype_base());
        spec_column.separator = column.separator.clone();
        spec_column.primary_key = name == primary_key;
        spec_column.cldf_name = column.header().to_string();
        spec.columns.push(spec_column);
    }

    for fk in &table.schema.foreign_keys {
        if fk.reference.schema_reference.is_some() {
            continue;
        }
        let Some((target, target_table)) = lookup.get(fk.reference.resource.as_str()) else {
            continue;
        };
        let mut columns = fk.column_reference.to_vec();
        columns.sort();
        let list_valued = columns.iter().any(|header| {
            table
                .column(header)
                .is_some_and(|c| c.separator.is_some())
        });
        if list_valued {
            debug!("Dropping list-valued foreign key {:?} of {}", columns, component);
            continue;
        }
        let mut target_columns = fk.reference.column_reference.to_vec();
        target_columns.sort();

        let columns = std::iter::once(DATASET_ID.to_string())
            .chain(columns.iter().map(|h| store_name(component, table, h)));
        let target_columns = std::iter::once(DATASET_ID.to_string())
            .chain(target_columns.iter().map(|h| store_name(target, target_table, h)));
        spec.foreign_keys.push(ForeignKeySpec {
            columns: columns.collect(),
            table: target.to_string(),
            references: target_columns.collect(),
        });
    }

    Ok(spec)
}

/// Order tables so that every table comes after the tables it references.
///
/// Each pass moves the first table whose references are all satisfied.
/// Tables left over after the pass limit form a cycle.
pub fn order_tables(tables: Vec<TableSpec>) -> Result<Vec<TableSpec>> {
    let mut pending = tables;
    let mut ordered: Vec<TableSpec> = Vec::with_capacity(pending.len());
    let mut passes = 0;
    while !pending.is_empty() && passes < MAX_ORDERING_PASSES {
        passes += 1;
        let ready = pending.iter().position(|table| {
            table
                .dependencies()
                .all(|dep| ordered.iter().any(|t| t.name == dep))
        });
        if let Some(index) = ready {
            ordered.push(pending.remove(index));
        }
    }
    if !pending.is_empty() {
        return Err(LexibenchError::CyclicDependency(
            pending.into_iter().map(|t| t.name).collect(),
        ));
    }
    Ok(ordered)
}

/// Compile a dataset description into the store schema.
pub fn compile(description: &DatasetDescription) -> Result<Schema> {
    let lookup: IndexMap<&str, (&str, &TableDescription)> = description
        .tables
        .iter()
        .filter_map(|t| t.component().map(|c| (t.url.as_str(), (c, t))))
        .collect();

    let mut references = IndexMap::new();
    let mut tables = Vec::with_capacity(lookup.len());
    for (component, table) in lookup.values() {
        tables.push(compile_table(component, table, &lookup, &mut references)?);
    }

    let tables = order_tables(tables)?;
    debug!(
        "Compiled schema: {:?}",
        tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
    );
    Ok(Schema { tables, references })
}

//! The shared SQLite store.
//!
//! Many datasets live in one store file. Every row carries the `dataset_ID`
//! of the dataset that produced it, so a dataset can be unloaded and
//! reloaded without touching the others.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cldf::terms::{COGNATE_TABLE, LANGUAGE_TABLE, PARAMETER_TABLE};
use crate::cldf::{parse_reference, CellValue, Dataset, Row, Source};
use crate::error::{LexibenchError, Result};

use super::schema::{compile, ColumnSpec, TableSpec, DATASET_ID};
use super::sync::{self, ColumnDrift};

/// BibTeX fields with a column of their own in `SourceTable`.
pub const BIBTEX_FIELDS: [&str; 26] = [
    "address",
    "annote",
    "author",
    "booktitle",
    "chapter",
    "crossref",
    "edition",
    "editor",
    "eprint",
    "howpublished",
    "institution",
    "journal",
    "key",
    "month",
    "note",
    "number",
    "organization",
    "pages",
    "publisher",
    "school",
    "series",
    "title",
    "type",
    "url",
    "volume",
    "year",
];

/// Columns added to standard tables when missing.
const SCHEMA_UPDATES: &[(&str, &str, &str)] = &[
    (PARAMETER_TABLE, "Ontological_Category", "TEXT"),
    (PARAMETER_TABLE, "Semantic_Field", "TEXT"),
    (LANGUAGE_TABLE, "Latitude", "REAL"),
    (LANGUAGE_TABLE, "Longitude", "REAL"),
];

/// Summary queries over all loaded datasets, by name.
pub const QUERIES: &[(&str, &str)] = &[
    (
        "lexemes_by_dataset",
        "SELECT ds.id, count(f.ID) FROM dataset as ds, formtable as f \
         WHERE ds.id = f.dataset_id GROUP BY ds.id",
    ),
    (
        "glottocodes_by_dataset",
        "SELECT ds.id, count(distinct l.glottocode) FROM dataset as ds, languagetable as l \
         WHERE ds.id = l.dataset_id GROUP BY ds.id",
    ),
    (
        "conceptsets_by_dataset",
        "SELECT ds.id, count(distinct p.concepticon_id) FROM dataset as ds, parametertable as p \
         WHERE ds.id = p.dataset_id GROUP BY ds.id",
    ),
    (
        "mapped_lexemes_by_dataset",
        "SELECT ds.id, count(distinct f.ID) \
         FROM dataset as ds, formtable as f, languagetable as l, parametertable as p \
         WHERE ds.id = f.dataset_id and f.dataset_id = l.dataset_id \
         and f.dataset_id = p.dataset_id and f.Language_ID = l.ID \
         and f.Parameter_ID = p.ID and l.glottocode is not null \
         and p.concepticon_id is not null GROUP BY ds.id",
    ),
    (
        "families_by_dataset",
        "SELECT ds.id, count(distinct l.family) FROM dataset as ds, languagetable as l \
         WHERE ds.id = l.dataset_id GROUP BY ds.id",
    ),
    (
        "macroareas_by_dataset",
        "SELECT ds.id, group_concat(distinct l.macroarea) FROM dataset as ds, languagetable as l \
         WHERE ds.id = l.dataset_id GROUP BY ds.id",
    ),
];

/// A row of the dataset registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Outcome of loading one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub dataset_id: String,
    /// Rows inserted per table, in load order.
    pub rows: IndexMap<String, usize>,
    pub sources: usize,
    /// Citations inserted into association tables.
    pub references: usize,
    /// Columns added to existing tables, as `table.column`.
    pub added_columns: Vec<String>,
}

/// A store file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// A store at `path`. Nothing is opened or created yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection with foreign keys enforced.
    pub fn connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Delete the store file.
    pub fn drop_file(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| LexibenchError::io(&self.path, e))?;
        }
        Ok(())
    }

    /// Returns true if the store holds the dataset registry.
    pub fn is_initialized(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        sync::table_exists(&self.connection()?, "dataset")
    }

    /// Create the store with the registry and source tables.
    ///
    /// An existing file is replaced with `force`, kept with `exists_ok`, and
    /// is an error otherwise.
    pub fn create(&self, force: bool, exists_ok: bool) -> Result<()> {
        if self.path.exists() {
            if force {
                self.drop_file()?;
            } else if exists_ok {
                return Ok(());
            } else {
                return Err(LexibenchError::InvalidInput(format!(
                    "db file {} already exists, use force to overwrite",
                    self.path.display()
                )));
            }
        }

        let bibtex_columns: String = BIBTEX_FIELDS
            .iter()
            .map(|field| format!("    `{}` TEXT,\n", field))
            .collect();
        let conn = self.connection()?;
        conn.execute_batch(&format!(
            "CREATE TABLE dataset (
    ID TEXT PRIMARY KEY NOT NULL,
    name TEXT,
    version TEXT,
    metadata_json TEXT
);
CREATE TABLE datasetmeta (
    dataset_ID TEXT,
    key TEXT,
    value TEXT,
    PRIMARY KEY (dataset_ID, key),
    FOREIGN KEY(dataset_ID) REFERENCES dataset(ID)
);
CREATE TABLE SourceTable (
    dataset_ID TEXT,
    ID TEXT,
    bibtex_type TEXT,
{}    extra TEXT,
    PRIMARY KEY (dataset_ID, ID),
    FOREIGN KEY(dataset_ID) REFERENCES dataset(ID)
);",
            bibtex_columns
        ))?;
        info!("Created store {}", self.path.display());
        Ok(())
    }

    /// All tables with their columns and physical types.
    pub fn tables(&self) -> Result<IndexMap<String, IndexMap<String, String>>> {
        let conn = self.connection()?;
        let mut tables = IndexMap::new();
        for name in sync::table_names(&conn)? {
            let columns = sync::introspect(&conn, &name)?
                .into_iter()
                .map(|c| (c.name, c.type_name))
                .collect();
            tables.insert(name, columns);
        }
        Ok(tables)
    }

    /// Datasets in the registry, by id.
    pub fn datasets(&self) -> Result<Vec<DatasetRecord>> {
        if !self.is_initialized()? {
            return Ok(Vec::new());
        }
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT ID, name, version FROM dataset ORDER BY ID")?;
        let records = stmt
            .query_map([], |row| {
                Ok(DatasetRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    version: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Number of rows a dataset has in a table.
    pub fn count_rows(&self, table: &str, dataset_id: &str) -> Result<usize> {
        let conn = self.connection()?;
        if !sync::table_exists(&conn, table)? {
            return Err(LexibenchError::MissingTable(table.to_string()));
        }
        let column = if table == "dataset" { "ID" } else { DATASET_ID };
        let count: i64 = conn.query_row(
            &format!("SELECT count(*) FROM {} WHERE `{}` = ?1", table, column),
            [dataset_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Run a named summary query; rows are (dataset id, value).
    pub fn query(&self, name: &str) -> Result<Vec<(String, String)>> {
        let sql = QUERIES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, sql)| *sql)
            .ok_or_else(|| LexibenchError::InvalidInput(format!("unknown query {}", name)))?;
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| {
                let value: Value = row.get(1)?;
                Ok((row.get(0)?, render(&value)))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Remove every row of a dataset from every table.
    ///
    /// Safe to call for datasets that were never loaded.
    pub fn unload(&self, dataset_id: &str) -> Result<()> {
        if !self.is_initialized()? {
            return Ok(());
        }
        let mut conn = self.connection()?;
        let tables = sync::table_names(&conn)?;
        let tx = conn.transaction()?;
        for table in tables.iter().rev().filter(|t| *t != "dataset") {
            tx.execute(
                &format!("DELETE FROM {} WHERE `{}` = ?1", table, DATASET_ID),
                [dataset_id],
            )?;
        }
        let removed = tx.execute("DELETE FROM dataset WHERE ID = ?1", [dataset_id])?;
        tx.commit()?;
        if removed > 0 {
            info!("Unloaded dataset {}", dataset_id);
        }
        Ok(())
    }

    /// Load a dataset, replacing any earlier load of it.
    ///
    /// The store schema grows to fit the dataset: missing tables are
    /// created, missing columns added. A column redefined with another type
    /// aborts the load before the schema or any row is changed. Rows are
    /// committed table by table.
    pub fn load(&self, dataset: &dyn Dataset) -> Result<LoadReport> {
        if !self.is_initialized()? {
            self.create(true, false)?;
        }
        let dataset_id = dataset.id();
        self.unload(dataset_id)?;

        let schema = compile(dataset.description())?;
        let mut report = LoadReport {
            dataset_id: dataset_id.to_string(),
            ..LoadReport::default()
        };

        let mut conn = self.connection()?;
        let mut missing = Vec::new();
        for table in &schema.tables {
            if !sync::table_exists(&conn, &table.name)? {
                continue;
            }
            let actual = sync::introspect(&conn, &table.name)?;
            for drift in sync::diff(table, &actual) {
                match drift {
                    ColumnDrift::Missing(column) => missing.push((table.name.as_str(), column)),
                    ColumnDrift::TypeMismatch {
                        column,
                        expected,
                        actual,
                    } => {
                        return Err(LexibenchError::SchemaConflict {
                            table: table.name.clone(),
                            column,
                            old_type: actual,
                            new_type: expected,
                        });
                    }
                }
            }
        }

        let tx = conn.transaction()?;
        for (table, column) in &missing {
            sync::add_column(&tx, table, column)?;
            report
                .added_columns
                .push(format!("{}.{}", table, column.name));
        }
        for table in schema.tables.iter().chain(schema.references.values()) {
            create_table_if_missing(&tx, table)?;
        }
        update_schema(&tx)?;
        tx.commit()?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO dataset (ID, name, version, metadata_json) VALUES (?1, ?2, ?3, ?4)",
            params![
                dataset_id,
                dataset.name(),
                dataset.version(),
                dataset.metadata_json()?
            ],
        )?;
        for (key, value) in dataset.properties() {
            tx.execute(
                "INSERT INTO datasetmeta (dataset_ID, key, value) VALUES (?1, ?2, ?3)",
                params![dataset_id, key, value],
            )?;
        }
        let sources = dataset.sources()?;
        insert_sources(&tx, dataset_id, &sources)?;
        tx.commit()?;
        report.sources = sources.len();

        let mut citations: IndexMap<String, Vec<(String, Vec<String>)>> = IndexMap::new();
        for table in &schema.tables {
            let Some(rows) = dataset.rows(&table.name)? else {
                if table.name == COGNATE_TABLE {
                    debug!("Dataset {} has no {}", dataset_id, COGNATE_TABLE);
                    continue;
                }
                return Err(LexibenchError::MissingTable(table.name.clone()));
            };
            let association = schema.references.get(&table.name);
            let tx = conn.transaction()?;
            let mut count = 0;
            for row in rows {
                let row = row?;
                insert_row(&tx, dataset_id, table, association, &row, &mut citations)?;
                count += 1;
            }
            tx.commit()?;
            debug!("Loaded {} rows into {}", count, table.name);
            report.rows.insert(table.name.clone(), count);
        }

        let tx = conn.transaction()?;
        for (component, items) in &citations {
            let Some(association) = schema.references.get(component) else {
                continue;
            };
            let object_column = &association.columns[0].name;
            let sql = format!(
                "INSERT INTO {} (`{}`, `{}`, `Source_ID`, `Context`) VALUES (?1, ?2, ?3, ?4)",
                association.name, DATASET_ID, object_column
            );
            let mut stmt = tx.prepare(&sql)?;
            for (object_id, references) in items {
                for reference in references {
                    let (source_id, context) = parse_reference(reference)?;
                    stmt.execute(params![dataset_id, object_id, source_id, context])?;
                    report.references += 1;
                }
            }
        }
        tx.commit()?;

        info!(
            "Loaded dataset {}: {} rows, {} sources, {} citations",
            dataset_id,
            report.rows.values().sum::<usize>(),
            report.sources,
            report.references
        );
        Ok(report)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(x) => x.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn create_table_if_missing(conn: &Connection, table: &TableSpec) -> Result<bool> {
    if sync::table_exists(conn, &table.name)? {
        return Ok(false);
    }
    conn.execute_batch(&table.sql())?;
    info!("Created table {}", table.name);
    Ok(true)
}

/// Add the columns later enrichment steps fill in.
fn update_schema(conn: &Connection) -> Result<()> {
    for (table, column, sql_type) in SCHEMA_UPDATES {
        if !sync::table_exists(conn, table)? {
            continue;
        }
        let present = sync::introspect(conn, table)?
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(column));
        if !present {
            let spec = match *sql_type {
                "REAL" => ColumnSpec::new(*column).with_datatype("decimal"),
                _ => ColumnSpec::new(*column),
            };
            sync::add_column(conn, table, &spec)?;
        }
    }
    Ok(())
}

fn insert_sources(tx: &Transaction<'_>, dataset_id: &str, sources: &[Source]) -> Result<()> {
    let columns: Vec<String> = ["dataset_ID", "ID", "bibtex_type"]
        .iter()
        .chain(BIBTEX_FIELDS.iter())
        .chain(["extra"].iter())
        .map(|c| format!("`{}`", c))
        .collect();
    let placeholders = vec!["?"; columns.len()].join(",");
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO SourceTable ({}) VALUES ({})",
        columns.join(","),
        placeholders
    ))?;
    for source in sources {
        let mut values: Vec<Value> = vec![
            Value::Text(dataset_id.to_string()),
            Value::Text(source.id.clone()),
            Value::Text(source.genre.clone()),
        ];
        values.extend(BIBTEX_FIELDS.iter().map(|field| {
            source
                .get(field)
                .map(|v| Value::Text(v.to_string()))
                .unwrap_or(Value::Null)
        }));
        let extra: IndexMap<&str, &str> = source
            .fields
            .iter()
            .filter(|(k, _)| !BIBTEX_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        values.push(Value::Text(serde_json::to_string(&extra)?));
        stmt.execute(params_from_iter(values))?;
    }
    Ok(())
}

fn insert_row(
    tx: &Transaction<'_>,
    dataset_id: &str,
    table: &TableSpec,
    association: Option<&TableSpec>,
    row: &Row,
    citations: &mut IndexMap<String, Vec<(String, Vec<String>)>>,
) -> Result<()> {
    let mut keys = vec![format!("`{}`", DATASET_ID)];
    let mut values = vec![Value::Text(dataset_id.to_string())];
    let consumes = association.and_then(|a| a.consumes.as_deref());
    for (header, value) in row {
        if consumes == Some(header.as_str()) {
            let object_id = table
                .primary_key
                .as_deref()
                .and_then(|pk| table.column(pk))
                .and_then(|pk| row.get(&pk.cldf_name))
                .map(CellValue::to_string)
                .unwrap_or_default();
            let references = value.as_list().into_iter().map(str::to_string).collect();
            citations
                .entry(table.name.clone())
                .or_default()
                .push((object_id, references));
            continue;
        }
        let Some(column) = table.column_by_cldf_name(header) else {
            warn!("Skipping column {} not described for {}", header, table.name);
            continue;
        };
        keys.push(format!("`{}`", column.name));
        values.push(column.convert(value));
    }
    let placeholders = vec!["?"; keys.len()].join(",");
    let mut stmt = tx.prepare_cached(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        keys.join(","),
        placeholders
    ))?;
    stmt.execute(params_from_iter(values))?;
    Ok(())
}

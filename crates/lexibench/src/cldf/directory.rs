//! CLDF datasets stored as a metadata file next to CSV tables.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{LexibenchError, Result};

use super::dataset::{Dataset, Rows};
use super::description::{ColumnDescription, DatasetDescription};
use super::sources::{parse_bibtex, Source};
use super::value::{CellValue, Row};

/// A CLDF dataset on disk.
///
/// Rows are read lazily; every call to [`Dataset::rows`] reopens the table
/// file, so the same component can be iterated any number of times.
#[derive(Debug, Clone)]
pub struct CldfDirectory {
    id: String,
    metadata_path: PathBuf,
    directory: PathBuf,
    description: DatasetDescription,
    version: String,
}

impl CldfDirectory {
    /// Open a dataset from its metadata file.
    ///
    /// The id is taken from the `rdf:ID` property or, failing that, from the
    /// directory name (the parent directory for a directory named `cldf`).
    /// The version is `dc:version` or a hash of the metadata file.
    pub fn open(metadata_path: impl AsRef<Path>) -> Result<Self> {
        let metadata_path = metadata_path.as_ref().to_path_buf();
        let bytes = fs::read(&metadata_path).map_err(|e| LexibenchError::io(&metadata_path, e))?;
        let text = String::from_utf8(bytes.clone()).map_err(|e| {
            LexibenchError::Metadata(format!("{}: {}", metadata_path.display(), e))
        })?;
        let description = DatasetDescription::from_json_str(&text)?;
        let directory = metadata_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let id = description
            .property("rdf:ID")
            .or_else(|| directory_id(&directory))
            .unwrap_or_else(|| "dataset".to_string());
        let version = description.property("dc:version").unwrap_or_else(|| {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            format!("sha256:{:x}", hasher.finalize())
        });

        debug!(
            "Opened CLDF dataset {} with {} tables",
            id,
            description.tables.len()
        );
        Ok(Self {
            id,
            metadata_path,
            directory,
            description,
            version,
        })
    }

    /// Override the dataset id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Path of the metadata file.
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Directory holding the tables.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

fn directory_id(directory: &Path) -> Option<String> {
    let name = directory.file_name()?.to_str()?;
    if name == "cldf" {
        directory.parent().and_then(directory_id)
    } else {
        Some(name.to_string())
    }
}

struct TableRows {
    reader: csv::Reader<File>,
    columns: Vec<(String, ColumnDescription)>,
}

impl Iterator for TableRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = csv::StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => Some(Ok(self
                .columns
                .iter()
                .enumerate()
                .map(|(i, (header, column))| {
                    let value = record
                        .get(i)
                        .map(|raw| CellValue::parse(raw, column))
                        .unwrap_or_default();
                    (header.clone(), value)
                })
                .collect())),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl Dataset for CldfDirectory {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &DatasetDescription {
        &self.description
    }

    fn version(&self) -> String {
        self.version.clone()
    }

    fn sources(&self) -> Result<Vec<Source>> {
        let Some(name) = self.description.property("dc:source") else {
            return Ok(Vec::new());
        };
        let path = self.directory.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| LexibenchError::io(&path, e))?;
        parse_bibtex(&text)
    }

    fn rows(&self, component: &str) -> Result<Option<Rows<'_>>> {
        let Some(table) = self.description.component(component) else {
            return Ok(None);
        };
        let path = self.directory.join(&table.url);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)?;
        let columns = reader
            .headers()?
            .iter()
            .map(|header| {
                let column = table
                    .column(header)
                    .cloned()
                    .unwrap_or_else(|| ColumnDescription::new(header));
                (header.to_string(), column)
            })
            .collect();
        Ok(Some(Box::new(TableRows { reader, columns })))
    }
}

//! In-memory CLDF wordlists.

use indexmap::IndexMap;

use crate::error::Result;

use super::dataset::{Dataset, Rows};
use super::description::DatasetDescription;
use super::sources::Source;
use super::value::Row;

/// A dataset held in memory, as produced by a conversion run.
#[derive(Debug, Clone)]
pub struct Wordlist {
    id: String,
    description: DatasetDescription,
    sources: Vec<Source>,
    tables: IndexMap<String, Vec<Row>>,
}

impl Wordlist {
    /// Create an empty wordlist with the standard wordlist tables.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_description(id, DatasetDescription::wordlist())
    }

    /// Create an empty wordlist with a custom description.
    pub fn with_description(id: impl Into<String>, description: DatasetDescription) -> Self {
        Self {
            id: id.into(),
            description,
            sources: Vec::new(),
            tables: IndexMap::new(),
        }
    }

    /// Mutable access to the description.
    pub fn description_mut(&mut self) -> &mut DatasetDescription {
        &mut self.description
    }

    /// Add a row to a component.
    pub fn add_row(&mut self, component: &str, row: Row) {
        self.tables.entry(component.to_string()).or_default().push(row);
    }

    /// Register a component as present, even without rows.
    pub fn ensure_table(&mut self, component: &str) {
        self.tables.entry(component.to_string()).or_default();
    }

    /// Add a source, replacing one with the same id.
    pub fn add_source(&mut self, source: Source) {
        match self.sources.iter_mut().find(|s| s.id == source.id) {
            Some(existing) => *existing = source,
            None => self.sources.push(source),
        }
    }

    /// Rows added to a component.
    pub fn table(&self, component: &str) -> &[Row] {
        self.tables
            .get(component)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Dataset for Wordlist {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &DatasetDescription {
        &self.description
    }

    fn sources(&self) -> Result<Vec<Source>> {
        Ok(self.sources.clone())
    }

    fn rows(&self, component: &str) -> Result<Option<Rows<'_>>> {
        Ok(self
            .tables
            .get(component)
            .map(|rows| Box::new(rows.iter().cloned().map(Ok)) as Rows<'_>))
    }
}

//! The dataset interface consumed by the store loader.

use crate::error::Result;

use super::description::DatasetDescription;
use super::sources::Source;
use super::value::Row;

/// A lazy sequence of rows of one component.
pub type Rows<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// A CLDF dataset: a description, its sources and the rows of its tables.
pub trait Dataset {
    /// Identifier scoping this dataset's rows in a shared store.
    fn id(&self) -> &str;

    /// The description of tables and properties.
    fn description(&self) -> &DatasetDescription;

    /// Bibliographic sources cited by the rows.
    fn sources(&self) -> Result<Vec<Source>>;

    /// Rows of a component; `None` when the component has no data.
    ///
    /// Each call starts a fresh pass over the data.
    fn rows(&self, component: &str) -> Result<Option<Rows<'_>>>;

    /// Human-readable name.
    fn name(&self) -> String {
        self.description()
            .property("dc:title")
            .unwrap_or_else(|| self.id().to_string())
    }

    /// Version marker recorded in the store registry.
    fn version(&self) -> String {
        self.description()
            .property("dc:version")
            .unwrap_or_default()
    }

    /// Dataset-level properties as text.
    fn properties(&self) -> Vec<(String, String)> {
        self.description().common_properties()
    }

    /// The full description as JSON.
    fn metadata_json(&self) -> Result<String> {
        self.description().to_json_string()
    }
}

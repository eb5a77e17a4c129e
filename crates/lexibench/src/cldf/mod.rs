//! CLDF datasets: descriptions, rows and sources.
//!
//! The store loader works against the [`Dataset`] trait. Two implementations
//! exist: [`CldfDirectory`] reads a dataset from its JSON metadata and CSV
//! tables, [`Wordlist`] holds one in memory.

mod dataset;
mod description;
mod directory;
mod sources;
pub mod terms;
mod value;
mod wordlist;

pub use dataset::{Dataset, Rows};
pub use description::{
    ColumnDescription, DatasetDescription, Datatype, ForeignKeyDescription, ForeignKeyReference,
    OneOrMany, TableDescription, TableSchema,
};
pub use directory::CldfDirectory;
pub use sources::{parse_bibtex, parse_reference, Source};
pub use value::{CellValue, Row};
pub use wordlist::Wordlist;

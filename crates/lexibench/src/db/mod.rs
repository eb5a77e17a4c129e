//! Persistent storage of CLDF datasets in a shared SQLite file.
//!
//! [`schema`] compiles a dataset description into ordered table
//! specifications, [`sync`] compares them with the physical tables, and
//! [`Database`] creates, loads and unloads.

pub mod schema;
mod store;
pub mod sync;

pub use schema::{compile, ColumnSpec, ForeignKeySpec, Schema, SqlType, TableSpec};
pub use store::{Database, DatasetRecord, LoadReport, BIBTEX_FIELDS, QUERIES};
pub use sync::ColumnDrift;

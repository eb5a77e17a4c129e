//! Schema introspection and column drift between compiled and physical tables.
//!
//! The store only ever grows: missing columns are added with
//! `ALTER TABLE ... ADD COLUMN`, while a column whose physical type differs
//! from the compiled one is a conflict the loader refuses to resolve.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

use super::schema::{ColumnSpec, TableSpec};

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalColumn {
    /// Position in the table.
    pub cid: i64,
    pub name: String,
    pub type_name: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Difference between a compiled column and the physical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDrift {
    /// Column not present in the table.
    Missing(ColumnSpec),
    /// Column present with another type.
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },
}

/// Names of all user tables, in creation order.
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

/// Returns true if a table exists.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Read the columns of a table, ordered by position.
pub fn introspect(conn: &Connection, table: &str) -> Result<Vec<PhysicalColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut columns = stmt
        .query_map([], |row| {
            Ok(PhysicalColumn {
                cid: row.get(0)?,
                name: row.get(1)?,
                type_name: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    columns.sort_by_key(|c| c.cid);
    Ok(columns)
}

/// Compare a compiled table with its physical columns.
///
/// Column names compare case-insensitively, types exactly (ignoring case).
pub fn diff(table: &TableSpec, actual: &[PhysicalColumn]) -> Vec<ColumnDrift> {
    table
        .columns
        .iter()
        .filter_map(|column| {
            match actual
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(&column.name))
            {
                None => Some(ColumnDrift::Missing(column.clone())),
                Some(physical)
                    if !physical
                        .type_name
                        .eq_ignore_ascii_case(column.sql_type.as_str()) =>
                {
                    Some(ColumnDrift::TypeMismatch {
                        column: column.name.clone(),
                        expected: column.sql_type.to_string(),
                        actual: physical.type_name.clone(),
                    })
                }
                Some(_) => None,
            }
        })
        .collect()
}

/// Add a column to an existing table.
pub fn add_column(conn: &Connection, table: &str, column: &ColumnSpec) -> Result<()> {
    info!("Adding column {}.{} ({})", table, column.name, column.sql_type);
    conn.execute_batch(&format!("ALTER TABLE {} ADD COLUMN {}", table, column.sql()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::SqlType;

    fn physical(name: &str, type_name: &str) -> PhysicalColumn {
        PhysicalColumn {
            cid: 0,
            name: name.to_string(),
            type_name: type_name.to_string(),
            not_null: false,
            primary_key: false,
        }
    }

    fn table() -> TableSpec {
        let mut table = TableSpec::new("FormTable");
        table.columns.push(ColumnSpec::new("ID"));
        table.columns.push(ColumnSpec::new("Count").with_datatype("integer"));
        table.columns.push(ColumnSpec::new("Note"));
        table
    }

    #[test]
    fn test_diff() {
        let actual = vec![physical("id", "TEXT"), physical("Count", "TEXT")];
        let drift = diff(&table(), &actual);
        assert_eq!(drift.len(), 2);
        assert_eq!(
            drift[0],
            ColumnDrift::TypeMismatch {
                column: "Count".to_string(),
                expected: "INTEGER".to_string(),
                actual: "TEXT".to_string(),
            }
        );
        assert!(matches!(&drift[1], ColumnDrift::Missing(c) if c.name == "Note"));
    }

    #[test]
    fn test_no_drift() {
        let actual = vec![
            physical("ID", "text"),
            physical("Count", "INTEGER"),
            physical("Note", "TEXT"),
            physical("dataset_ID", "TEXT"),
        ];
        assert!(diff(&table(), &actual).is_empty());
    }

    #[test]
    fn test_introspect_and_add_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (a TEXT, b INTEGER)").unwrap();
        assert!(table_exists(&conn, "t").unwrap());
        assert!(!table_exists(&conn, "missing").unwrap());

        add_column(&conn, "t", &ColumnSpec::new("c").with_datatype("decimal")).unwrap();
        let columns = introspect(&conn, "t").unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(columns[2].type_name, SqlType::Real.as_str());
        assert!(table_names(&conn).unwrap().contains(&"t".to_string()));
    }
}

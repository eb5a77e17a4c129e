//! Cell values of CLDF rows.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::description::ColumnDescription;

/// A row: column header to value, in column order.
pub type Row = IndexMap<String, CellValue>;

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl CellValue {
    /// Parse a raw CSV cell according to its column description.
    ///
    /// Empty cells are null. List-valued columns split on their separator and
    /// drop empty items. Values that do not parse as the declared type are
    /// kept as text.
    pub fn parse(raw: &str, column: &ColumnDescription) -> Self {
        if raw.is_empty() {
            return CellValue::Null;
        }
        if let Some(separator) = column.separator.as_deref() {
            return CellValue::List(
                raw.split(separator)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        match column.datatype_base() {
            "integer" => raw
                .trim()
                .parse()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            "decimal" => raw
                .trim()
                .parse()
                .map(CellValue::Float)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            "boolean" => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => CellValue::Boolean(true),
                "false" | "0" | "no" => CellValue::Boolean(false),
                _ => CellValue::Text(raw.to_string()),
            },
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Returns true for null values.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The text of a scalar text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The items of a list value; a scalar text value is a one-item list.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            CellValue::List(items) => items.iter().map(String::as_str).collect(),
            CellValue::Text(s) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
            CellValue::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Option<String>> for CellValue {
    fn from(s: Option<String>) -> Self {
        s.map(CellValue::Text).unwrap_or_default()
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<Vec<String>> for CellValue {
    fn from(items: Vec<String>) -> Self {
        CellValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_datatype() {
        let integer = ColumnDescription::new("N").with_datatype("integer");
        let decimal = ColumnDescription::new("X").with_datatype("decimal");
        let boolean = ColumnDescription::new("B").with_datatype("boolean");
        let list = ColumnDescription::new("S").with_separator(";");

        assert_eq!(CellValue::parse("12", &integer), CellValue::Integer(12));
        assert_eq!(CellValue::parse("twelve", &integer), CellValue::from("twelve"));
        assert_eq!(CellValue::parse("1.5", &decimal), CellValue::Float(1.5));
        assert_eq!(CellValue::parse("true", &boolean), CellValue::Boolean(true));
        assert_eq!(CellValue::parse("", &boolean), CellValue::Null);
        assert_eq!(
            CellValue::parse("a; ;b", &list),
            CellValue::List(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(CellValue::from("x").as_list(), vec!["x"]);
        assert!(CellValue::Null.as_list().is_empty());
        assert_eq!(CellValue::from(Some("y".to_string())).as_str(), Some("y"));
        assert!(CellValue::from(None::<String>).is_null());
    }
}

//! Table-driven classifier backed by a TSV sound inventory.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{LexibenchError, Result};

use super::{SegmentClassifier, Sound, SoundClassModel, UNKNOWN_CLASS};

#[derive(Debug, Clone, Default)]
struct InventoryRow {
    canonical: String,
    dolgo: Option<String>,
    sca: Option<String>,
}

/// A sound inventory read from a tab-separated file.
///
/// Expected columns (header names are matched case-insensitively):
///
/// | Column      | Required | Meaning                                    |
/// |-------------|----------|--------------------------------------------|
/// | `Grapheme`  | yes      | segment as it may appear in transcriptions |
/// | `Canonical` | no       | canonical spelling (defaults to grapheme)  |
/// | `Dolgo`     | no       | Dolgopolsky sound class                    |
/// | `SCA`       | no       | SCA sound class                            |
///
/// Rows whose canonical spelling differs from the grapheme act as aliases.
/// Aliases without their own classes inherit those of the canonical row.
#[derive(Debug, Clone, Default)]
pub struct InventoryClassifier {
    rows: HashMap<String, InventoryRow>,
}

impl InventoryClassifier {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sound to the inventory.
    pub fn with_sound(
        mut self,
        grapheme: impl Into<String>,
        canonical: impl Into<String>,
        dolgo: impl Into<String>,
        sca: impl Into<String>,
    ) -> Self {
        self.rows.insert(
            grapheme.into(),
            InventoryRow {
                canonical: canonical.into(),
                dolgo: Some(dolgo.into()),
                sca: Some(sca.into()),
            },
        );
        self
    }

    /// Load an inventory from a TSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LexibenchError::io(path, e))?;
        let inventory = Self::from_reader(file)?;
        debug!(
            "Loaded {} sounds from inventory {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Load an inventory from TSV text.
    pub fn from_tsv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Load an inventory from any reader producing TSV.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let position = |name: &str| headers.iter().position(|h| h == name);
        let grapheme_idx = position("grapheme").ok_or_else(|| {
            LexibenchError::InvalidInput("sound inventory lacks a Grapheme column".to_string())
        })?;
        let canonical_idx = position("canonical");
        let dolgo_idx = position("dolgo");
        let sca_idx = position("sca");

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            let Some(grapheme) = cell(Some(grapheme_idx)) else {
                continue;
            };
            let canonical = cell(canonical_idx).unwrap_or_else(|| grapheme.clone());
            rows.insert(
                grapheme,
                InventoryRow {
                    canonical,
                    dolgo: cell(dolgo_idx),
                    sca: cell(sca_idx),
                },
            );
        }

        Ok(Self { rows })
    }

    /// Number of graphemes (canonical sounds and aliases).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the inventory has no sounds.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn class_of(row: &InventoryRow, model: SoundClassModel) -> Option<&str> {
        match model {
            SoundClassModel::Dolgo => row.dolgo.as_deref(),
            SoundClassModel::Sca => row.sca.as_deref(),
        }
    }
}

impl SegmentClassifier for InventoryClassifier {
    fn classify(&self, grapheme: &str) -> Sound {
        match self.rows.get(grapheme) {
            Some(row) => Sound::known(grapheme, row.canonical.clone()),
            None => Sound::unknown(grapheme),
        }
    }

    fn soundclass(&self, grapheme: &str, model: SoundClassModel) -> String {
        let Some(row) = self.rows.get(grapheme) else {
            return UNKNOWN_CLASS.to_string();
        };
        Self::class_of(row, model)
            .or_else(|| {
                self.rows
                    .get(&row.canonical)
                    .and_then(|canonical| Self::class_of(canonical, model))
            })
            .unwrap_or(UNKNOWN_CLASS)
            .to_string()
    }

    fn name(&self) -> &str {
        "inventory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = "Grapheme\tCanonical\tDolgo\tSCA\n\
                             a\ta\tV\tA\n\
                             t\tt\tT\tT\n\
                             th\ttʰ\t\t\n\
                             tʰ\ttʰ\tT\tT\n";

    #[test]
    fn test_inventory_lookup() {
        let inventory = InventoryClassifier::from_tsv_str(INVENTORY).unwrap();
        assert_eq!(inventory.len(), 4);
        assert_eq!(inventory.classify("a"), Sound::known("a", "a"));
        assert_eq!(inventory.classify("th").to_string(), "tʰ");
        assert!(inventory.classify("x").is_unknown());
    }

    #[test]
    fn test_alias_inherits_classes() {
        let inventory = InventoryClassifier::from_tsv_str(INVENTORY).unwrap();
        assert_eq!(inventory.soundclass("th", SoundClassModel::Dolgo), "T");
        assert_eq!(inventory.soundclass("a", SoundClassModel::Sca), "A");
        assert_eq!(inventory.soundclass("x", SoundClassModel::Sca), "?");
    }

    #[test]
    fn test_inventory_requires_grapheme_column() {
        let result = InventoryClassifier::from_tsv_str("Sound\tDolgo\na\tV\n");
        assert!(matches!(result, Err(LexibenchError::InvalidInput(_))));
    }

    #[test]
    fn test_builder() {
        let inventory = InventoryClassifier::new().with_sound("p", "p", "P", "P");
        assert_eq!(inventory.soundclass("p", SoundClassModel::Dolgo), "P");
    }
}

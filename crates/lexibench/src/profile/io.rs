//! Reading and writing the profile's tab-separated text form.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::LexibenchConfig;
use crate::error::{LexibenchError, Result};

use super::{Profile, Record};

impl Profile {
    /// Load a profile from a TSV file using the default configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with(path, &LexibenchConfig::default())
    }

    /// Load a profile from a TSV file.
    pub fn from_path_with(path: impl AsRef<Path>, config: &LexibenchConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LexibenchError::io(path, e))?;
        let profile = Self::from_reader(file, config)?.with_source(path);
        debug!(
            "Loaded profile {} with {} graphemes",
            path.display(),
            profile.len()
        );
        Ok(profile)
    }

    /// Load a profile from TSV text using the default configuration.
    pub fn from_tsv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes(), &LexibenchConfig::default())
    }

    /// Load a profile from any reader producing TSV.
    ///
    /// The header must name the grapheme column. Cells holding the null
    /// marker load as "no value"; short rows are padded with "no value".
    pub fn from_reader(reader: impl Read, config: &LexibenchConfig) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if !headers.iter().any(|h| *h == config.grapheme_column) {
            return Err(LexibenchError::InvalidInput(format!(
                "orthography profile lacks a {} column",
                config.grapheme_column
            )));
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(str::is_empty) {
                continue;
            }
            let record: Record = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = row
                        .get(i)
                        .filter(|v| *v != config.null_marker)
                        .map(str::to_string);
                    (header.clone(), value)
                })
                .collect();
            records.push(record);
        }

        Self::from_records_with(records, config)
    }

    /// Column order of the text form: grapheme column, the IPA field, then
    /// the remaining fields in descending case-insensitive order.
    pub fn output_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self
            .columns()
            .filter(|c| *c != self.grapheme_column())
            .collect();
        columns.sort_by_key(|c| (*c == self.ipa_column(), c.to_lowercase()));
        columns.reverse();
        std::iter::once(self.grapheme_column())
            .chain(columns)
            .collect()
    }

    /// Serialize the profile as TSV.
    pub fn to_tsv_string(&self) -> Result<String> {
        let columns = self.output_columns();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(Vec::new());

        writer.write_record(&columns)?;
        for (grapheme, entry) in self.iter() {
            let row = std::iter::once(grapheme).chain(
                columns[1..]
                    .iter()
                    .map(|c| entry.get(c).unwrap_or(self.null_marker())),
            );
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| LexibenchError::Csv(csv::Error::from(e.into_error())))?;
        String::from_utf8(bytes).map_err(|e| LexibenchError::InvalidInput(e.to_string()))
    }

    /// Write the profile to `path`, or back to the file it was loaded from.
    pub fn write(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path.or(self.source()) {
            Some(path) => path.to_path_buf(),
            None => {
                return Err(LexibenchError::InvalidInput(
                    "profile has no file to write to".to_string(),
                ));
            }
        };
        fs::write(&path, self.to_tsv_string()?).map_err(|e| LexibenchError::io(&path, e))?;
        info!("Wrote profile {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BEGIN, END};
    use tempfile::TempDir;

    const PROFILE: &str = "Grapheme\tIPA\tFREQUENCY\tEXAMPLES\n\
                           ^\tNULL\t0\t\n\
                           $\tNULL\t0\t\n\
                           a\ta\t3\taba\n\
                           th\ttʰ\t1\tthe\n";

    #[test]
    fn test_read_profile() {
        let profile = Profile::from_tsv_str(PROFILE).unwrap();
        assert_eq!(profile.len(), 4);
        assert_eq!(profile.get("th").unwrap().get("IPA"), Some("tʰ"));
        assert_eq!(profile.get(BEGIN).unwrap().get("IPA"), None);
        assert_eq!(profile.get(END).unwrap().get("EXAMPLES"), Some(""));
    }

    #[test]
    fn test_column_order() {
        let profile = Profile::from_tsv_str(
            "Grapheme\tCODEPOINTS\tSCA\tIPA\tFREQUENCY\na\tU+0061\tV\ta\t1\n",
        )
        .unwrap();
        assert_eq!(
            profile.output_columns(),
            vec!["Grapheme", "IPA", "SCA", "FREQUENCY", "CODEPOINTS"]
        );
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.tsv");
        fs::write(&path, PROFILE).unwrap();

        let profile = Profile::from_path(&path).unwrap();
        assert_eq!(profile.source(), Some(path.as_path()));
        profile.write(None).unwrap();

        let reloaded = Profile::from_path(&path).unwrap();
        assert_eq!(profile.mapping("IPA"), reloaded.mapping("IPA"));
        assert_eq!(profile.mapping("EXAMPLES"), reloaded.mapping("EXAMPLES"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Grapheme\tIPA\tFREQUENCY\tEXAMPLES\n\
             ^\tNULL\t0\t\n\
             $\tNULL\t0\t\n\
             a\ta\t3\taba\n\
             th\ttʰ\t1\tthe\n"
        );
    }

    #[test]
    fn test_missing_grapheme_column() {
        let result = Profile::from_tsv_str("Sound\tIPA\na\ta\n");
        assert!(matches!(result, Err(LexibenchError::InvalidInput(_))));
    }

    #[test]
    fn test_write_without_source() {
        let profile = Profile::from_mapping([("a", "a")]).unwrap();
        assert!(profile.write(None).is_err());
    }
}

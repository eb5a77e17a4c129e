//! Integration tests for the shared SQLite store.

use tempfile::TempDir;

use lexibench::cldf::terms::{FORM_TABLE, LANGUAGE_TABLE};
use lexibench::cldf::{CellValue, ColumnDescription, Dataset, Source};
use lexibench::{Concept, Database, Language, LexemeWriter, LexibenchError, Lexeme, Wordlist};

/// Helper to create a store in a temporary directory.
fn create_store() -> (TempDir, Database) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::new(dir.path().join("lexibench.sqlite"));
    (dir, db)
}

/// A small wordlist with two languages, two concepts and cited forms.
fn wordlist(id: &str) -> Wordlist {
    let mut writer = LexemeWriter::new(id);
    writer
        .add_language(
            Language::new("German")
                .unwrap()
                .with_name("German")
                .with_glottocode("stan1295")
                .with_family("Indo-European"),
        )
        .unwrap();
    writer
        .add_language(Language::new("Dutch").unwrap().with_name("Dutch"))
        .unwrap();
    writer
        .add_concept(Concept::new("hand", "hand").unwrap().with_concepticon("1277", "HAND"))
        .unwrap();
    writer.add_concept(Concept::new("foot", "foot").unwrap()).unwrap();
    writer.add_sources([
        Source::new("Smith2001", "book").with_field("title", "Words"),
        Source::new("Jones1999", "misc").with_field("note", "Field notes"),
    ]);
    writer
        .add_lexemes(
            Lexeme::new("German", "hand", "hant")
                .unwrap()
                .with_segments(["h", "a", "n", "t"])
                .with_source("Smith2001[12-15]")
                .with_source("Jones1999"),
        )
        .unwrap();
    writer
        .add_lexemes(
            Lexeme::new("Dutch", "foot", "voet")
                .unwrap()
                .with_segments(["v", "u", "t"]),
        )
        .unwrap();
    writer.into_wordlist()
}

/// A copy of the first form row with a new id and extra cells.
fn extra_form(wordlist: &Wordlist, id: &str, cells: &[(&str, CellValue)]) -> lexibench::Row {
    let mut row = wordlist.table(FORM_TABLE)[0].clone();
    row.insert("ID".to_string(), CellValue::from(id));
    row.insert("Source".to_string(), CellValue::Null);
    for (header, value) in cells {
        row.insert(header.to_string(), value.clone());
    }
    row
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_creates_store() {
    let (_dir, db) = create_store();
    let report = db.load(&wordlist("ds1")).expect("Load failed");

    assert_eq!(report.dataset_id, "ds1");
    assert_eq!(report.rows["FormTable"], 2);
    assert_eq!(report.rows["LanguageTable"], 2);
    assert_eq!(report.rows["ParameterTable"], 2);
    assert_eq!(report.rows["CognateTable"], 0);
    assert_eq!(report.sources, 2);
    assert_eq!(report.references, 2);

    assert!(db.is_initialized().unwrap());
    let datasets = db.datasets().unwrap();
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].id, "ds1");

    let tables = db.tables().unwrap();
    assert!(tables.contains_key("FormSource"));
    assert!(tables["LanguageTable"].contains_key("Latitude"));
    assert!(tables["ParameterTable"].contains_key("Semantic_Field"));
}

#[test]
fn test_reload_is_idempotent() {
    let (_dir, db) = create_store();
    let dataset = wordlist("ds1");
    db.load(&dataset).unwrap();
    let first = db.count_rows("FormTable", "ds1").unwrap();
    db.load(&dataset).unwrap();

    assert_eq!(db.count_rows("FormTable", "ds1").unwrap(), first);
    assert_eq!(db.count_rows("SourceTable", "ds1").unwrap(), 2);
    assert_eq!(db.count_rows("FormSource", "ds1").unwrap(), 2);
    assert_eq!(db.datasets().unwrap().len(), 1);
}

#[test]
fn test_citations_with_context() {
    let (_dir, db) = create_store();
    db.load(&wordlist("ds1")).unwrap();

    let conn = db.connection().unwrap();
    let mut stmt = conn
        .prepare("SELECT Source_ID, Context FROM FormSource WHERE dataset_ID = 'ds1' ORDER BY Source_ID DESC")
        .unwrap();
    let citations: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        citations,
        vec![
            ("Smith2001".to_string(), "12-15".to_string()),
            ("Jones1999".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_citation_of_unknown_source_fails() {
    let (_dir, db) = create_store();
    let mut writer = LexemeWriter::new("ds1");
    writer.add_language(Language::new("German").unwrap()).unwrap();
    writer.add_concept(Concept::new("hand", "hand").unwrap()).unwrap();
    writer
        .add_lexemes(
            Lexeme::new("German", "hand", "hant")
                .unwrap()
                .with_source("Missing2020"),
        )
        .unwrap();

    assert!(matches!(
        db.load(&writer.into_wordlist()),
        Err(LexibenchError::Database(_))
    ));
}

// =============================================================================
// Isolation
// =============================================================================

#[test]
fn test_unload_leaves_other_datasets() {
    let (_dir, db) = create_store();
    db.load(&wordlist("ds1")).unwrap();
    db.load(&wordlist("ds2")).unwrap();

    db.unload("ds1").unwrap();

    assert_eq!(db.count_rows("FormTable", "ds1").unwrap(), 0);
    assert_eq!(db.count_rows("FormSource", "ds1").unwrap(), 0);
    assert_eq!(db.count_rows("dataset", "ds1").unwrap(), 0);
    assert_eq!(db.count_rows("FormTable", "ds2").unwrap(), 2);
    assert_eq!(db.count_rows("SourceTable", "ds2").unwrap(), 2);
    assert_eq!(db.count_rows("FormSource", "ds2").unwrap(), 2);

    let ids: Vec<String> = db.datasets().unwrap().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["ds2"]);
}

#[test]
fn test_unload_unknown_dataset() {
    let (_dir, db) = create_store();
    db.load(&wordlist("ds1")).unwrap();
    db.unload("never-loaded").unwrap();
    assert_eq!(db.count_rows("FormTable", "ds1").unwrap(), 2);
}

// =============================================================================
// Schema growth
// =============================================================================

#[test]
fn test_custom_column_added_then_conflict() {
    let (_dir, db) = create_store();
    db.load(&wordlist("ds1")).unwrap();

    let mut tonal = wordlist("ds2");
    tonal.description_mut().tables[0]
        .schema
        .columns
        .push(ColumnDescription::new("Tone"));
    let row = extra_form(&tonal, "ds2-3", &[("Tone", CellValue::from("H"))]);
    tonal.add_row(FORM_TABLE, row);

    let report = db.load(&tonal).unwrap();
    assert_eq!(report.added_columns, vec!["FormTable.Tone"]);
    assert_eq!(report.rows["FormTable"], 3);
    assert_eq!(db.tables().unwrap()["FormTable"]["Tone"], "TEXT");

    let mut numeric = wordlist("ds3");
    numeric.description_mut().tables[0].schema.columns.push(
        ColumnDescription::new("Tone").with_datatype("integer"),
    );
    match db.load(&numeric) {
        Err(LexibenchError::SchemaConflict {
            table,
            column,
            old_type,
            new_type,
        }) => {
            assert_eq!(table, "FormTable");
            assert_eq!(column, "Tone");
            assert_eq!(old_type, "TEXT");
            assert_eq!(new_type, "INTEGER");
        }
        other => panic!("expected a schema conflict, got {:?}", other.map(|r| r.rows)),
    }

    assert_eq!(db.count_rows("FormTable", "ds1").unwrap(), 2);
    assert_eq!(db.count_rows("FormTable", "ds2").unwrap(), 3);
    assert_eq!(db.count_rows("FormTable", "ds3").unwrap(), 0);
    let ids: Vec<String> = db.datasets().unwrap().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["ds1", "ds2"]);
}

#[test]
fn test_conflict_leaves_schema_untouched() {
    let (_dir, db) = create_store();
    let mut tonal = wordlist("ds1");
    tonal.description_mut().tables[0]
        .schema
        .columns
        .push(ColumnDescription::new("Tone"));
    db.load(&tonal).unwrap();
    let before = db.tables().unwrap();

    // LanguageTable is migrated before FormTable, where the conflict sits.
    let mut conflicting = wordlist("ds2");
    for table in conflicting.description_mut().tables.iter_mut() {
        match table.component() {
            Some(LANGUAGE_TABLE) => table.schema.columns.push(ColumnDescription::new("Dialect")),
            Some(FORM_TABLE) => table
                .schema
                .columns
                .push(ColumnDescription::new("Tone").with_datatype("integer")),
            _ => {}
        }
    }

    assert!(matches!(
        db.load(&conflicting),
        Err(LexibenchError::SchemaConflict { .. })
    ));
    let after = db.tables().unwrap();
    assert!(!after[LANGUAGE_TABLE].contains_key("Dialect"));
    assert_eq!(before, after);
    assert_eq!(db.count_rows(FORM_TABLE, "ds1").unwrap(), 2);
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_summary_queries() {
    let (_dir, db) = create_store();
    db.load(&wordlist("ds1")).unwrap();
    db.load(&wordlist("ds2")).unwrap();

    let lexemes = db.query("lexemes_by_dataset").unwrap();
    assert_eq!(
        lexemes,
        vec![
            ("ds1".to_string(), "2".to_string()),
            ("ds2".to_string(), "2".to_string()),
        ]
    );

    let glottocodes = db.query("glottocodes_by_dataset").unwrap();
    assert_eq!(glottocodes[0], ("ds1".to_string(), "1".to_string()));

    let mapped = db.query("mapped_lexemes_by_dataset").unwrap();
    assert_eq!(mapped[0], ("ds1".to_string(), "1".to_string()));

    assert!(matches!(
        db.query("no_such_query"),
        Err(LexibenchError::InvalidInput(_))
    ));
}

#[test]
fn test_registry_records_name() {
    let (_dir, db) = create_store();
    let mut dataset = wordlist("ds1");
    dataset
        .description_mut()
        .properties
        .insert("dc:title".to_string(), "A test wordlist".into());
    assert_eq!(dataset.name(), "A test wordlist");
    db.load(&dataset).unwrap();

    let record = &db.datasets().unwrap()[0];
    assert_eq!(record.name.as_deref(), Some("A test wordlist"));
}

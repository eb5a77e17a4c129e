//! Property-based tests for profiles, tokenization and schema compilation.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p lexibench --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p lexibench --test property_tests
//! ```

use proptest::prelude::*;

use lexibench::cldf::{ColumnDescription, DatasetDescription, TableDescription};
use lexibench::db::compile;
use lexibench::profile::GRAPHEMES_FIELD;
use lexibench::{Profile, Tokenizer};

// =============================================================================
// Test Strategies
// =============================================================================

/// Graphemes over a small alphabet, so rules overlap often.
fn grapheme() -> impl Strategy<Value = String> {
    "[abc]{1,3}"
}

/// A profile mapping every single letter, plus random multi-letter rules.
///
/// Multi-letter rules either spell out their parts or map to an unrelated
/// value, so trimming has rules to keep as well as rules to drop.
fn profile() -> impl Strategy<Value = Profile> {
    let rule = (grapheme(), prop::option::of("[P-Z]{1,2}"));
    prop::collection::vec(rule, 0..8).prop_map(|extra| {
        let mut pairs: Vec<(String, String)> = ["a", "b", "c"]
            .iter()
            .map(|g| (g.to_string(), g.to_uppercase()))
            .collect();
        for (g, unrelated) in extra {
            let value = unrelated.unwrap_or_else(|| {
                g.chars()
                    .map(|c| c.to_uppercase().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            });
            pairs.push((g, value));
        }
        Profile::from_mapping(pairs).unwrap()
    })
}

/// Forms over the profile alphabet, sometimes with foreign characters.
fn form() -> impl Strategy<Value = String> {
    "[abcx]{1,12}"
}

fn graphemes(profile: &Profile) -> Vec<String> {
    profile.graphemes().map(str::to_string).collect()
}

// =============================================================================
// Profile Properties
// =============================================================================

proptest! {
    #[test]
    fn trim_reaches_fixed_point(mut profile in profile()) {
        while profile.trim("IPA").unwrap() > 0 {}
        prop_assert_eq!(profile.trim("IPA").unwrap(), 0);
    }

    #[test]
    fn trim_preserves_segmentation_of_every_grapheme(profile in profile()) {
        let original = graphemes(&profile);
        let before = Tokenizer::new(profile.clone());
        let mut trimmed = profile;
        while trimmed.trim("IPA").unwrap() > 0 {}
        let after = Tokenizer::new(trimmed);
        for grapheme in &original {
            prop_assert_eq!(
                before.transform(grapheme, "IPA").unwrap().join(" "),
                after.transform(grapheme, "IPA").unwrap().join(" "),
                "segmentation of {} changed", grapheme
            );
        }
    }

    #[test]
    fn sort_is_idempotent(mut profile in profile()) {
        profile.sort(None, "IPA");
        let once = graphemes(&profile);
        profile.sort(None, "IPA");
        prop_assert_eq!(once, graphemes(&profile));
        prop_assert_eq!(profile.graphemes().next(), Some("^"));
    }

    #[test]
    fn text_form_round_trips(profile in profile()) {
        let text = profile.to_tsv_string().unwrap();
        let reloaded = Profile::from_tsv_str(&text).unwrap();
        prop_assert_eq!(graphemes(&profile), graphemes(&reloaded));
        prop_assert_eq!(reloaded.to_tsv_string().unwrap(), text);
    }
}

// =============================================================================
// Tokenizer Properties
// =============================================================================

proptest! {
    #[test]
    fn graphemes_cover_the_form(profile in profile(), form in form()) {
        let tokenizer = Tokenizer::new(profile);
        let tokens = tokenizer.tokenize(&form, GRAPHEMES_FIELD).unwrap();
        prop_assert_eq!(tokens.first().map(String::as_str), Some("^"));
        prop_assert_eq!(tokens.last().map(String::as_str), Some("$"));
        let rebuilt: String = tokens[1..tokens.len() - 1]
            .iter()
            .map(|t| t.trim_start_matches('<').trim_end_matches('>'))
            .collect();
        prop_assert_eq!(rebuilt, form);
    }

    #[test]
    fn unmatched_characters_are_marked(profile in profile(), form in form()) {
        let tokenizer = Tokenizer::new(profile);
        let tokens = tokenizer.tokenize(&form, "IPA").unwrap();
        let marked = tokens.iter().filter(|t| *t == "<x>").count();
        prop_assert_eq!(marked, form.matches('x').count());
    }
}

// =============================================================================
// Schema Properties
// =============================================================================

fn table(index: usize, target: Option<usize>) -> TableDescription {
    let mut table = TableDescription::new(format!("t{}.csv", index), &format!("T{}Table", index))
        .with_column(ColumnDescription::new("ID").with_term("id"));
    if let Some(target) = target {
        table = table
            .with_column(ColumnDescription::new("Ref"))
            .with_foreign_key("Ref", &format!("t{}.csv", target), "ID");
    }
    table
}

proptest! {
    #[test]
    fn compiled_tables_follow_references(
        links in prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..8),
        order in any::<prop::sample::Index>(),
    ) {
        // Table i may only reference a table j < i, so the graph is acyclic.
        let tables: Vec<TableDescription> = links
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let target = match (i, link) {
                    (0, _) | (_, None) => None,
                    (_, Some(index)) => Some(index.index(i)),
                };
                table(i, target)
            })
            .collect();

        let mut shuffled = tables;
        let len = shuffled.len();
        shuffled.rotate_left(order.index(len));
        let mut description = DatasetDescription::new("Generic");
        for table in shuffled {
            description = description.with_table(table);
        }

        let schema = compile(&description).unwrap();
        prop_assert_eq!(schema.tables.len(), links.len());
        for (position, table) in schema.tables.iter().enumerate() {
            for dependency in table.dependencies() {
                let referenced = schema.tables.iter().position(|t| t.name == dependency);
                prop_assert!(referenced.is_some_and(|p| p < position));
            }
        }
    }
}

//! Lexibench: curation and storage of CLDF wordlists.
//!
//! Lexibench segments raw lexical forms with orthography profiles, audits
//! the resulting transcriptions against a sound inventory, and loads
//! finished datasets into a shared SQLite store that can hold many of them
//! side by side.
//!
//! # Core Principles
//!
//! - **Profile-driven**: Segmentation is a greedy longest match over
//!   grapheme rules that users curate as plain TSV
//! - **Additive storage**: The store schema only grows; conflicting column
//!   types are refused rather than rewritten
//! - **Dataset isolation**: Every stored row belongs to exactly one dataset
//!   and can be unloaded without touching the others
//!
//! # Example
//!
//! ```no_run
//! use lexibench::{Lexibench, Profile};
//!
//! let bench = Lexibench::new();
//! let mut profile = bench.load_profile("etc/orthography.tsv").unwrap();
//! let report = bench.format_profile(&mut profile, Some(&["tʰaba"][..]), true).unwrap();
//! println!("Removed {} redundant rules", report.trimmed);
//!
//! let tokenizer = bench.tokenizer(profile);
//! println!("{}", tokenizer.render("tʰaba", "IPA").unwrap());
//! ```

pub mod classifier;
pub mod cldf;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod profile;
pub mod transcription;
pub mod writer;

mod bench;

pub use crate::bench::{FormatReport, Lexibench};
pub use classifier::{MockClassifier, SegmentClassifier, Sound, SoundClassModel};
pub use cldf::{CellValue, CldfDirectory, Dataset, Row, Wordlist};
pub use config::{CheckMode, DuplicatePolicy, LexibenchConfig, Normalization};
pub use db::{Database, LoadReport};
pub use error::{LexibenchError, Result};
pub use forms::{FormSpec, FormSplitter};
pub use models::{Cognate, Concept, Language, Lexeme};
pub use profile::{IssueKind, Profile, ProfileIssue, Severity, Tokenizer};
pub use transcription::{Analysis, Analyzer};
pub use writer::LexemeWriter;

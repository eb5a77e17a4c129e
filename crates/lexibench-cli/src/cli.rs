//! Command-line arguments of the `lexibench` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lexibench: orthography profiles and a shared store for CLDF wordlists
#[derive(Parser)]
#[command(name = "lexibench")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug events and print per-table row counts
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path of the SQLite store
    #[arg(long, global = true, default_value = "lexibench.sqlite")]
    pub db: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean, trim, augment and sort an orthography profile
    FormatProfile {
        /// Path to the profile (TSV)
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// File with one raw form per line, used to count grapheme usage
        #[arg(short, long)]
        forms: Option<PathBuf>,

        /// Output path (default: overwrite the profile)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sound inventory (TSV) used to clean and classify mappings
        #[arg(short, long)]
        inventory: Option<PathBuf>,

        /// Reorder graphemes canonically
        #[arg(long)]
        sort: bool,

        /// Name of the IPA column
        #[arg(long, default_value = "IPA")]
        column: String,
    },

    /// Report duplicate, inconsistent and unknown mappings
    CheckProfile {
        /// Path to the profile (TSV)
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Sound inventory (TSV) used to find unknown sounds
        #[arg(short, long)]
        inventory: Option<PathBuf>,

        /// Name of the IPA column
        #[arg(long, default_value = "IPA")]
        column: String,

        /// Stop at the first inconsistent or unknown mapping and exit with an error
        #[arg(long)]
        strict: bool,

        /// Print the issues as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Segment forms with an orthography profile
    Tokenize {
        /// Path to the profile (TSV)
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Forms to segment
        #[arg(value_name = "FORM", required = true)]
        forms: Vec<String>,

        /// Output field (a profile column, or "Graphemes")
        #[arg(long, default_value = "IPA")]
        column: String,
    },

    /// Load a CLDF dataset into the store, replacing an earlier load
    Load {
        /// Path to the dataset's JSON metadata
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,

        /// Dataset id (default: rdf:ID or the directory name)
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove a dataset from the store
    Unload {
        /// Dataset id
        #[arg(value_name = "DATASET")]
        dataset: String,
    },

    /// List the datasets in the store
    Ls {
        /// Print the registry as a JSON array
        #[arg(long)]
        json: bool,
    },
}

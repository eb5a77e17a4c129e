//! CLI command implementations.

pub mod check_profile;
pub mod format_profile;
pub mod load;
pub mod ls;
pub mod tokenize;
pub mod unload;

use std::path::Path;

use colored::Colorize;
use lexibench::classifier::InventoryClassifier;
use lexibench::{Lexibench, LexibenchConfig, ProfileIssue, Severity};

/// Build the engine, with a sound inventory when one is given.
pub fn bench(
    config: LexibenchConfig,
    inventory: Option<&Path>,
) -> Result<Lexibench, Box<dyn std::error::Error>> {
    let bench = Lexibench::with_config(config);
    match inventory {
        Some(path) => Ok(bench.with_classifier(InventoryClassifier::from_path(path)?)),
        None => Ok(bench),
    }
}

/// Fail early with a readable message for missing input files.
pub fn require_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    Ok(())
}

/// Print issues with a colored severity label.
pub fn print_issues(issues: &[ProfileIssue]) {
    for issue in issues {
        let label = match issue.severity {
            Severity::Error => issue.severity.label().red().bold(),
            Severity::Warning => issue.severity.label().yellow().bold(),
            Severity::Info => issue.severity.label().blue().bold(),
        };
        println!("  {:8} {}", label, issue.message);
    }
}

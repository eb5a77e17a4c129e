//! Check-profile command - audit an orthography profile.

use std::path::PathBuf;

use colored::Colorize;
use lexibench::{CheckMode, LexibenchConfig, Severity};

use super::{bench, print_issues, require_file};

pub fn run(
    config: LexibenchConfig,
    profile_path: PathBuf,
    inventory: Option<PathBuf>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&profile_path)?;

    let mode = if strict { CheckMode::Raise } else { CheckMode::Log };
    let bench = bench(config.with_check_mode(mode), inventory.as_deref())?;
    let profile = bench.load_profile(&profile_path)?;
    let issues = bench.check_profile(&profile)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&issues)?);
        return Ok(());
    }

    println!(
        "{} {} ({} graphemes)",
        "Checked".cyan().bold(),
        profile_path.display().to_string().white(),
        profile.len()
    );

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count();

    if issues.is_empty() {
        println!("{}", "No issues found - profile looks consistent!".green());
    } else {
        println!(
            "Found {} issues ({} errors, {} warnings)",
            issues.len().to_string().white().bold(),
            errors.to_string().red(),
            warnings.to_string().yellow()
        );
        println!();
        print_issues(&issues);
    }

    Ok(())
}

//! Format-profile command - curate an orthography profile in place.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use lexibench::LexibenchConfig;

use super::{bench, print_issues, require_file};

pub fn run(
    config: LexibenchConfig,
    profile_path: PathBuf,
    forms: Option<PathBuf>,
    output: Option<PathBuf>,
    inventory: Option<PathBuf>,
    sort: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&profile_path)?;

    println!(
        "{} {}",
        "Formatting".cyan().bold(),
        profile_path.display().to_string().white()
    );

    let bench = bench(config, inventory.as_deref())?;
    let mut profile = bench.load_profile(&profile_path)?;

    let forms: Option<Vec<String>> = match forms {
        Some(path) => {
            require_file(&path)?;
            let text = fs::read_to_string(&path)?;
            Some(
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        }
        None => None,
    };

    let report = bench.format_profile(&mut profile, forms.as_deref(), sort)?;
    let written = profile.write(output.as_deref())?;

    println!(
        "Cleaned {} mappings, removed {} redundant rules",
        report.cleaned.to_string().white().bold(),
        report.trimmed.to_string().white().bold()
    );
    if let Some(forms) = &forms {
        println!(
            "Counted grapheme usage over {} forms",
            forms.len().to_string().white().bold()
        );
    }
    if !report.issues.is_empty() {
        println!();
        println!("{}", "Issues:".yellow().bold());
        print_issues(&report.issues);
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        written.display().to_string().white()
    );

    Ok(())
}

//! Tokenize command - segment forms with an orthography profile.

use std::path::PathBuf;

use colored::Colorize;
use lexibench::LexibenchConfig;

use super::{bench, require_file};

pub fn run(
    config: LexibenchConfig,
    profile_path: PathBuf,
    forms: Vec<String>,
    column: String,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&profile_path)?;

    let bench = bench(config, None)?;
    let tokenizer = bench.tokenizer(bench.load_profile(&profile_path)?);

    for form in &forms {
        let segments = tokenizer.tokenize(form, &column)?;
        println!("{}\t{}", form.white().bold(), segments.join(" "));
    }

    Ok(())
}

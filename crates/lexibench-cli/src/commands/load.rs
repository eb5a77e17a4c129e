//! Load command - load a CLDF dataset into the store.

use std::path::PathBuf;

use colored::Colorize;
use lexibench::{CldfDirectory, LexibenchConfig};

use super::{bench, require_file};

pub fn run(
    config: LexibenchConfig,
    metadata: PathBuf,
    id: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&metadata)?;

    let mut dataset = CldfDirectory::open(&metadata)?;
    if let Some(id) = id {
        dataset = dataset.with_id(id);
    }

    let bench = bench(config, None)?;
    println!(
        "{} {} into {}",
        "Loading".cyan().bold(),
        metadata.display().to_string().white(),
        bench.config().db_path.display()
    );

    let report = bench.load(&dataset)?;

    if verbose {
        println!();
        println!("{}", "Rows:".yellow().bold());
        for (table, count) in &report.rows {
            println!("  {:20} {}", table, count);
        }
        println!();
    }

    if !report.added_columns.is_empty() {
        println!(
            "Added columns: {}",
            report.added_columns.join(", ").yellow()
        );
    }
    println!(
        "Loaded {} rows, {} sources, {} citations",
        report.rows.values().sum::<usize>().to_string().white().bold(),
        report.sources.to_string().white().bold(),
        report.references.to_string().white().bold()
    );
    println!(
        "{} {}",
        "Loaded".green().bold(),
        report.dataset_id.white()
    );

    Ok(())
}

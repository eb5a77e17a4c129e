//! Ls command - list the datasets in the store.

use std::collections::HashMap;

use colored::Colorize;
use lexibench::LexibenchConfig;

use super::bench;

pub fn run(config: LexibenchConfig, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = bench(config, None)?.database();
    let datasets = db.datasets()?;

    let lexemes: HashMap<String, String> = if datasets.is_empty() {
        HashMap::new()
    } else {
        db.query("lexemes_by_dataset")?.into_iter().collect()
    };

    if json_output {
        let listing: Vec<_> = datasets
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "name": d.name,
                    "version": d.version,
                    "lexemes": lexemes.get(&d.id).cloned().unwrap_or_default(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if datasets.is_empty() {
        println!("No datasets in {}", db.path().display());
        return Ok(());
    }

    println!(
        "{} {}",
        "Datasets in".cyan().bold(),
        db.path().display().to_string().white()
    );
    println!();
    for dataset in &datasets {
        println!(
            "  {:24} {:>8} lexemes  {}",
            dataset.id.white().bold(),
            lexemes.get(&dataset.id).map(String::as_str).unwrap_or("0"),
            dataset.name.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}

//! Unload command - remove a dataset from the store.

use colored::Colorize;
use lexibench::LexibenchConfig;

use super::bench;

pub fn run(config: LexibenchConfig, dataset: String) -> Result<(), Box<dyn std::error::Error>> {
    let bench = bench(config, None)?;
    if !bench.config().db_path.exists() {
        return Err(format!("Store not found: {}", bench.config().db_path.display()).into());
    }

    bench.unload(&dataset)?;
    println!("{} {}", "Unloaded".green().bold(), dataset.white());

    Ok(())
}

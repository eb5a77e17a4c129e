//! Lexibench CLI - orthography profiles and the CLDF store.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use lexibench::LexibenchConfig;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = LexibenchConfig::default().with_db_path(cli.db);

    let result = match cli.command {
        Commands::FormatProfile {
            profile,
            forms,
            output,
            inventory,
            sort,
            column,
        } => commands::format_profile::run(
            config.with_ipa_column(column),
            profile,
            forms,
            output,
            inventory,
            sort,
        ),

        Commands::CheckProfile {
            profile,
            inventory,
            column,
            strict,
            json,
        } => commands::check_profile::run(
            config.with_ipa_column(column),
            profile,
            inventory,
            strict,
            json,
        ),

        Commands::Tokenize {
            profile,
            forms,
            column,
        } => commands::tokenize::run(config, profile, forms, column),

        Commands::Load { metadata, id } => commands::load::run(config, metadata, id, cli.verbose),

        Commands::Unload { dataset } => commands::unload::run(config, dataset),

        Commands::Ls { json } => commands::ls::run(config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

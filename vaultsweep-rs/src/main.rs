//! Vaultsweep CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vaultsweep::cli::args::{Cli, Commands};
use vaultsweep::cli::output::Output;
use vaultsweep::cli::{block_refs, cards, covers, videos};
use vaultsweep::config::Config;
use vaultsweep::error::{ExitCode as VaultExitCode, VaultError};
use vaultsweep::vault::Vault;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<VaultExitCode, VaultError> {
    let config = Config::load()?;

    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let vault = Vault::new(vault_path)?.with_drawing_suffix(config.block_refs.drawing_suffix.clone());
    tracing::debug!(root = %vault.root.display(), "opened vault");

    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::CleanBlockRefs(args) => {
            block_refs::clean_block_refs(&vault, &config.block_refs, args.dry_run, args.text, &output)
        }
        Commands::CleanCovers(args) => covers::clean_covers(&vault, &config.covers, args.dry_run, &output),
        Commands::Cards(args) => cards::cards(&vault, &config.cards, args, &output),
        Commands::Videos(args) => videos::videos(&vault, &config.videos, args, &output),
    }
}

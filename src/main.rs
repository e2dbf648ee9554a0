//! SNP pathway impact score main executable

pub mod annos;
pub mod common;
pub mod err;
pub mod pathways;
pub mod score;

use clap::{Args, Parser, Subcommand};
use console::{Emoji, Term};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "SNP pathway impact scores",
    long_about = "Per-patient, per-pathway burden scores of damaging SNPs"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute pathway impact scores.
    Score(score::Args),
    /// Pathway mapping related commands.
    Mappings(Mappings),
    /// Annotation related commands.
    Annos(Annos),
}

/// Parsing of "mappings *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Mappings {
    /// The sub command to run
    #[command(subcommand)]
    command: MappingsCommands,
}

/// Enum supporting the parsing of "mappings *" sub commands.
#[derive(Debug, Subcommand)]
enum MappingsCommands {
    Build(pathways::build::Args),
}

/// Parsing of "annos *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Annos {
    /// The sub command to run
    #[command(subcommand)]
    command: AnnosCommands,
}

/// Enum supporting the parsing of "annos *" sub commands.
#[derive(Debug, Subcommand)]
enum AnnosCommands {
    Fetch(annos::fetch::Args),
    Report(annos::report::Args),
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    tracing::subscriber::with_default(collector, || {
        match &cli.command {
            Commands::Score(args) => score::run(&cli.common, args)?,
            Commands::Mappings(mappings) => match &mappings.command {
                MappingsCommands::Build(args) => pathways::build::run(&cli.common, args)?,
            },
            Commands::Annos(annos) => match &annos.command {
                AnnosCommands::Fetch(args) => annos::fetch::run(&cli.common, args)?,
                AnnosCommands::Report(args) => annos::report::run(&cli.common, args)?,
            },
        }

        Ok::<(), anyhow::Error>(())
    })?;
    term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))?;

    Ok(())
}

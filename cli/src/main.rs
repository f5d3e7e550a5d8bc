#![deny(missing_docs)]

//! # Regraft CLI
//!
//! Command Line Interface for the maintenance passes that evolve a
//! generated client library in place.
//!
//! Supported Commands:
//! - `gate`: inject feature guards above flagged declarations.
//! - `retract`: remove previously injected guards.
//! - `annotate`: add explicit types to awaited-call bindings.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod annotate;
mod corpus;
mod error;
mod gate;
mod retract;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Maintenance passes for generated client code")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inject feature guards above flagged declarations.
    Gate(gate::GateArgs),
    /// Remove previously injected feature guards.
    Retract(retract::RetractArgs),
    /// Add explicit type annotations to awaited-call bindings.
    Annotate(annotate::AnnotateArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Gate(args) => gate::execute(args)?,
        Commands::Retract(args) => retract::execute(args)?,
        Commands::Annotate(args) => annotate::execute(args)?,
    }

    Ok(())
}

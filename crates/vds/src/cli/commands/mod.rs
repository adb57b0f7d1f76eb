//! Command implementations and dispatch.

pub mod config;
pub mod hash;
pub mod regions;
pub mod translate;
pub mod validate;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Translate(cmd) => translate::run(ctx, &cmd),
        Commands::Hash(cmd) => hash::run(ctx, &cmd),
        Commands::Validate(input) => validate::run(ctx, &input),
        Commands::Regions(cmd) => regions::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}

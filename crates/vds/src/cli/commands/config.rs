//! Implementation of `vds config`.

use std::process::ExitCode;

use vds_config::is_global_config;

use crate::cli::context::CommandContext;

/// Shows the effective configuration as TOML, preceded by the files it came from.
pub fn run(ctx: &CommandContext) -> ExitCode {
    if ctx.config_files.is_empty() {
        println!("# no configuration files found, using defaults");
    } else {
        println!("# merged from (highest precedence first):");
        for path in &ctx.config_files {
            let marker = if is_global_config(path) { " (global)" } else { "" };
            println!("#   {}{marker}", path.display());
        }
    }
    println!();

    match ctx.config.to_toml() {
        Ok(toml) => {
            print!("{toml}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

//! Implementation of `vds translate`.

use std::process::ExitCode;

use vds_query::es;

use crate::cli::{
    args::TranslateCommand,
    context::{CommandContext, report},
};

/// Compiles a query document and prints the result.
pub fn run(ctx: &CommandContext, cmd: &TranslateCommand) -> ExitCode {
    let query = match ctx.read_query(cmd.input.file.as_deref()) {
        Ok(q) => q,
        Err(code) => return code,
    };

    let schema = match ctx.schema_for(&query) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let node = match schema.translate(&query) {
        Ok(n) => n,
        Err(e) => return report(&e),
    };

    if cmd.tree {
        print!("{node}");
        return ExitCode::SUCCESS;
    }

    let json = es::to_json(&node);
    let rendered = if cmd.compact {
        serde_json::to_string(&json)
    } else {
        serde_json::to_string_pretty(&json)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to render query: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

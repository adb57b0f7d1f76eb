//! Implementation of `vds validate`.

use std::process::ExitCode;

use crate::cli::{
    args::QueryInput,
    context::{CommandContext, report},
};

/// Checks a query document, printing `ok` when it is valid.
pub fn run(ctx: &CommandContext, input: &QueryInput) -> ExitCode {
    let query = match ctx.read_query(input.file.as_deref()) {
        Ok(q) => q,
        Err(code) => return code,
    };

    let schema = match ctx.schema_for(&query) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match schema.validate(&query) {
        Ok(()) => {
            println!("ok ({})", schema.version());
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

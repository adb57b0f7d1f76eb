//! Implementation of `vds hash`.

use std::process::ExitCode;

use serde_json::Value;
use vds_query::{QueryDocument, canonical_string};

use crate::cli::{
    args::HashCommand,
    context::{CommandContext, report},
};

/// Prints the cache key of a query document.
pub fn run(ctx: &CommandContext, cmd: &HashCommand) -> ExitCode {
    let query = match ctx.read_query(cmd.input.file.as_deref()) {
        Ok(q) => q,
        Err(code) => return code,
    };

    if cmd.canonical {
        return print_canonical(&query);
    }

    let schema = match ctx.schema_for_hash() {
        Ok(s) => s,
        Err(code) => return code,
    };

    match schema.hash(&query) {
        Ok(key) => {
            println!("{key}");
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// Prints the `search:` and `filters:` strings fed into the digest, one per line.
fn print_canonical(query: &Value) -> ExitCode {
    let document = match QueryDocument::from_value(query) {
        Ok(d) => d,
        Err(e) => return report(&e),
    };

    if let Some(search) = &document.search {
        println!("search:{search}");
    }
    if let Some(filters) = &document.filters {
        println!("filters:{}", canonical_string(filters));
    }

    ExitCode::SUCCESS
}

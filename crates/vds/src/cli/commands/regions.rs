//! Implementation of `vds regions`.

use std::process::ExitCode;

use serde::Serialize;
use vds_geo::{GeoRegions, RegionCategory};

use crate::cli::{args::RegionsCommand, context::CommandContext};

/// JSON output for one category.
#[derive(Serialize)]
struct JsonCategory<'a> {
    /// Category name.
    category: &'static str,
    /// Area names in sorted order.
    names: Vec<&'a str>,
}

/// Lists the loaded categories, or the area names of one category.
pub fn run(ctx: &CommandContext, cmd: &RegionsCommand) -> ExitCode {
    let regions = match ctx.load_regions() {
        Ok(r) => r,
        Err(code) => return code,
    };

    let categories: Vec<RegionCategory> = match cmd.category {
        Some(category) => vec![category],
        None => RegionCategory::ALL.to_vec(),
    };

    if cmd.json {
        return print_json(&regions, &categories);
    }

    match cmd.category {
        Some(category) => {
            for name in names(&regions, category) {
                println!("{name}");
            }
        }
        None => {
            for category in categories {
                println!(
                    "{:<10} {} areas",
                    category.as_str(),
                    names(&regions, category).len()
                );
            }
        }
    }

    ExitCode::SUCCESS
}

/// Prints the listing as a JSON array.
fn print_json(regions: &GeoRegions, categories: &[RegionCategory]) -> ExitCode {
    let output: Vec<JsonCategory<'_>> = categories
        .iter()
        .map(|&category| JsonCategory {
            category: category.as_str(),
            names: names(regions, category),
        })
        .collect();

    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize regions: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Area names of a category, empty if the category was not loaded.
fn names(regions: &GeoRegions, category: RegionCategory) -> Vec<&str> {
    regions
        .category(category)
        .map(|set| set.names().collect())
        .unwrap_or_default()
}

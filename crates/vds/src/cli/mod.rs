//! CLI support for the `vds` binary.

pub mod args;
pub mod commands;
pub mod context;

pub use context::CommandContext;

//! Command-line interface for flattening cluster trees.
//!
//! Two commands share one pipeline: load a dense or sparse table, build an
//! agglomerative tree over it, and flatten the tree. `flatten` streams the
//! ranked node records as JSON lines; `details` resolves selected nodes.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutput, DetailsCommand, FlattenCommand, InputArgs, InputFormat,
    LinkageArg, render_output, run_cli,
};

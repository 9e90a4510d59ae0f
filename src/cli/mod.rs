use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cmdtree")]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Cli {
    /// Command tree file (defaults to ./cmdtree.yml merged over the global one)
    #[arg(long, global = true)]
    pub tree: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum Commands {
    /// Dispatch already-split arguments against the command tree
    Run(RunArgs),
    /// Tokenize and dispatch a single input line
    Line(LineArgs),
    /// Print completion candidates for a partial line, one per line
    Complete(CompleteArgs),
    /// Validate the command tree and exit
    Check,
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct RunArgs {
    /// Command path, options and arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub args: Vec<String>,
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct LineArgs {
    /// Input line, tokenized the same way as interactive input
    pub text: String,
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct CompleteArgs {
    /// Text before the cursor
    #[arg(allow_hyphen_values = true)]
    pub before: String,

    /// Text after the cursor
    #[arg(long, allow_hyphen_values = true)]
    pub after: Option<String>,
}

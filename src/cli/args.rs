//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    completions::CompletionsArgs,
    generate::GenerateArgs,
    inspect::InspectArgs,
    mask::MaskArgs,
    memo::MemoCommands,
    unmask::UnmaskArgs,
};

#[derive(Parser)]
#[command(name = "sct")]
#[command(author, version, about = "Student Comment Toolkit")]
#[command(
    long_about = "Masks student names in CSV feedback data with pseudonymous tokens before the data is sent to an LLM, and restores the real names afterwards."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mask student names in a CSV and record the session map
    Mask(MaskArgs),

    /// Generate AI comments from a masked CSV
    Generate(GenerateArgs),

    /// Restore real names in generated output using the session map
    Unmask(UnmaskArgs),

    /// Show how the columns of a CSV are classified
    Inspect(InspectArgs),

    /// Quick memo messages
    #[command(subcommand)]
    Memo(MemoCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

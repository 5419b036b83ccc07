//! `sct unmask` command - restore real names in generated output

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{read_input, write_output};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::mask::MaskingSession;
use crate::core::table::Table;
use crate::core::unmask::{unmask_table, unmask_text};

#[derive(clap::Args, Debug)]
pub struct UnmaskArgs {
    /// Generated CSV or text to unmask (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Write unmasked output here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Masking session map written by `sct mask`
    #[arg(long)]
    pub session: Option<PathBuf>,
}

pub fn run(args: UnmaskArgs, global: &GlobalOpts) -> Result<()> {
    let raw = read_input(args.file.as_deref())?;
    if raw.trim().is_empty() {
        return Err(miette::miette!("No data to unmask"));
    }

    let config = Config::load();
    let session_path = args.session.unwrap_or_else(|| config.session_file());
    let session = MaskingSession::load(&session_path).map_err(|e| {
        miette::miette!(
            "Failed to load masking session from {}: {}. Run `sct mask` first or pass --session",
            session_path.display(),
            e
        )
    })?;

    let table = Table::parse(&raw);
    let unmasked = if table.len() >= 2 {
        unmask_table(&table, &session).to_csv()
    } else {
        // Not tabular; fall back to plain-text unmasking. With an empty
        // map this degrades to returning the input unchanged.
        unmask_text(&raw, &session)
    };

    write_output(args.output.as_deref(), &unmasked)?;

    if !global.quiet {
        eprintln!(
            "{} Restored names from {} mapped token(s)",
            style("✓").green(),
            style(session.count()).cyan(),
        );
    }

    Ok(())
}

//! `sct mask` command - mask student names in a CSV

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::utils::{read_input, write_output};
use crate::cli::GlobalOpts;
use crate::core::classify::classify;
use crate::core::config::Config;
use crate::core::mask::{mask, MaskingSession};
use crate::core::normalize::normalize;
use crate::core::table::Table;

#[derive(clap::Args, Debug)]
pub struct MaskArgs {
    /// CSV file to mask (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Write masked CSV here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Where to store the masking session map
    #[arg(long)]
    pub session: Option<PathBuf>,
}

pub fn run(args: MaskArgs, global: &GlobalOpts) -> Result<()> {
    let raw = read_input(args.file.as_deref())?;
    if raw.trim().is_empty() {
        return Err(miette::miette!(
            "No CSV data to mask. Provide a file or pipe CSV on stdin"
        ));
    }

    let table = Table::parse(&raw);
    if table.len() < 2 {
        return Err(miette::miette!(
            "Expected a header row and at least one data row, got {} row(s)",
            table.len()
        ));
    }

    let classification = classify(&table);
    if global.verbose {
        eprintln!(
            "{} name column {}, understanding {}, comment columns {:?}",
            style("→").blue(),
            classification.name_column,
            classification
                .understanding_column
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string()),
            classification.comment_columns,
        );
    }

    let canonical = normalize(&table, &classification);
    let mut session = MaskingSession::new();
    let masked = mask(&canonical, &mut session);

    let config = Config::load();
    let session_path = args.session.unwrap_or_else(|| config.session_file());
    session.save(&session_path).into_diagnostic()?;

    write_output(args.output.as_deref(), &masked.to_csv())?;

    if !global.quiet {
        eprintln!(
            "{} Masked {} name(s) across {} student(s); session saved to {}",
            style("✓").green(),
            style(session.count()).cyan(),
            masked.data_rows().len(),
            style(session_path.display()).yellow(),
        );
    }

    Ok(())
}

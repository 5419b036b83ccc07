//! `sct generate` command - draft AI comments from a masked CSV
//!
//! Consumes the masked canonical table, calls the configured provider
//! once per selected student, and emits a `[名前, AIコメント]` table.
//! Per-student provider failures become an error cell, not an abort.

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::ai::prompt::{mock_response, PromptConfig, StudentData};
use crate::ai::provider::{CompletionClient, Provider};
use crate::cli::commands::utils::{read_input, write_output};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::table::Table;

/// Placeholder for students outside the selected row.
const NOT_PROCESSED: &str = "未実施";

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Masked CSV to generate comments for (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Write the generated CSV here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Process every student (default: only the first data row)
    #[arg(long)]
    pub all: bool,

    /// Process only the Nth data row (1-based)
    #[arg(long, conflicts_with = "all")]
    pub row: Option<usize>,

    /// Override the configured provider
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let raw = read_input(args.file.as_deref())?;
    let table = Table::parse(&raw);
    if table.len() < 2 {
        return Err(miette::miette!(
            "Expected masked CSV with a header row and at least one data row"
        ));
    }

    let config = Config::load();
    let provider = args.provider.or(config.provider).unwrap_or_default();
    let prompts = PromptConfig::from_config(&config);
    let client = CompletionClient::new(provider, &config);
    let selected_row = args.row.unwrap_or(1);

    if !global.quiet {
        eprintln!(
            "{} Generating comments via {}{}",
            style("→").blue(),
            style(provider).cyan(),
            if args.all {
                " for all students".to_string()
            } else {
                format!(" for data row {}", selected_row)
            },
        );
    }

    let mut rows: Vec<Vec<String>> = vec![vec!["名前".to_string(), "AIコメント".to_string()]];
    let mut generated = 0usize;

    for (i, row) in table.data_rows().iter().enumerate() {
        let Some(student) = StudentData::from_row(row) else {
            continue;
        };

        if !args.all && i + 1 != selected_row {
            rows.push(vec![student.name, NOT_PROCESSED.to_string()]);
            continue;
        }

        let comment = if provider == Provider::Mock {
            mock_response(&student)
        } else {
            let user = student.user_prompt(&prompts.user_template);
            match client.complete(&prompts.system, &user) {
                Ok(comment) => comment,
                Err(e) => {
                    if !global.quiet {
                        eprintln!(
                            "{} Generation failed for {}: {}",
                            style("✗").red(),
                            student.name,
                            e
                        );
                    }
                    format!("コメント生成に失敗しました ({})", student.name)
                }
            }
        };
        generated += 1;
        rows.push(vec![student.name, comment]);
    }

    write_output(args.output.as_deref(), &Table { rows }.to_csv())?;

    if !global.quiet {
        eprintln!(
            "{} Generated {} comment(s)",
            style("✓").green(),
            style(generated).cyan(),
        );
    }

    Ok(())
}

//! `sct inspect` command - show how CSV columns are classified
//!
//! Debugging aid for the header/content heuristics: prints one row per
//! column with the roles it was assigned.

use console::style;
use miette::Result;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::read_input;
use crate::cli::GlobalOpts;
use crate::core::classify::{classify, Classification};
use crate::core::table::Table;

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// CSV file to inspect (reads stdin when omitted)
    pub file: Option<PathBuf>,
}

pub fn run(args: InspectArgs, global: &GlobalOpts) -> Result<()> {
    let raw = read_input(args.file.as_deref())?;
    let table = Table::parse(&raw);
    let Some(headers) = table.header() else {
        return Err(miette::miette!("No CSV data to inspect"));
    };

    let classification = classify(&table);

    let mut builder = Builder::default();
    builder.push_record(["#", "Header", "Roles"]);
    for (idx, header) in headers.iter().enumerate() {
        builder.push_record([
            &idx.to_string(),
            header,
            &column_roles(idx, &classification),
        ]);
    }
    println!("{}", builder.build().with(Style::sharp()));

    if !global.quiet {
        println!(
            "{} {} column(s), {} data row(s)",
            style("✓").green(),
            headers.len(),
            table.data_rows().len(),
        );
    }

    Ok(())
}

fn column_roles(idx: usize, cls: &Classification) -> String {
    let mut roles = Vec::new();
    if cls.name_column == idx {
        roles.push("name");
    }
    if cls.id_column == Some(idx) {
        roles.push("id");
    }
    if cls.comment_columns.contains(&idx) {
        roles.push("comment");
    }
    if cls.understanding_column == Some(idx) {
        roles.push("understanding");
    }
    if cls.exclude_columns.contains(&idx) {
        roles.push("excluded");
    }
    if roles.is_empty() {
        "-".to_string()
    } else {
        roles.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_roles_overlap() {
        let cls = Classification {
            name_column: 0,
            id_column: Some(1),
            comment_columns: vec![1, 2],
            understanding_column: None,
            exclude_columns: vec![1],
        };
        assert_eq!(column_roles(0, &cls), "name");
        assert_eq!(column_roles(1, &cls), "id, comment, excluded");
        assert_eq!(column_roles(2, &cls), "comment");
        assert_eq!(column_roles(3, &cls), "-");
    }
}

//! `sct memo` command - quick memo messages

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::memo::{JsonFileStorage, MessageStore};

#[derive(clap::Subcommand, Debug)]
pub enum MemoCommands {
    /// Add a message
    Add(AddArgs),

    /// List stored messages
    List(ListArgs),

    /// Edit a message by number
    Edit(EditArgs),

    /// Delete a message by number
    Delete(DeleteArgs),

    /// Delete every message
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Message text
    pub text: String,

    /// Memo file to use instead of the configured one
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Memo file to use instead of the configured one
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Message number as shown by `sct memo list`
    pub number: usize,

    /// Replacement text
    pub text: String,

    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Message number as shown by `sct memo list`
    pub number: usize,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,

    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,

    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run(cmd: MemoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MemoCommands::Add(args) => add(args, global),
        MemoCommands::List(args) => list(args.file),
        MemoCommands::Edit(args) => edit(args, global),
        MemoCommands::Delete(args) => delete(args, global),
        MemoCommands::Clear(args) => clear(args, global),
    }
}

fn storage(file: Option<PathBuf>) -> JsonFileStorage {
    let path = file.unwrap_or_else(|| Config::load().memo_file());
    JsonFileStorage::new(path)
}

fn add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let storage = storage(args.file);
    let mut store = MessageStore::load_from(&storage).into_diagnostic()?;
    let index = store.add(args.text);
    store.save_to(&storage).into_diagnostic()?;

    if !global.quiet {
        println!("{} Added message #{}", style("✓").green(), index + 1);
    }
    Ok(())
}

fn list(file: Option<PathBuf>) -> Result<()> {
    let storage = storage(file);
    let store = MessageStore::load_from(&storage).into_diagnostic()?;

    if store.is_empty() {
        println!("No messages.");
        return Ok(());
    }

    for (i, message) in store.messages().iter().enumerate() {
        let local = message.timestamp.with_timezone(&Local);
        println!(
            "{} {} {}",
            style(format!("#{}", i + 1)).cyan(),
            style(local.format("%Y-%m-%d %H:%M")).dim(),
            message.text,
        );
    }
    Ok(())
}

fn edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let storage = storage(args.file);
    let mut store = MessageStore::load_from(&storage).into_diagnostic()?;
    let index = resolve_number(args.number, store.len())?;
    store.edit(index, args.text).into_diagnostic()?;
    store.save_to(&storage).into_diagnostic()?;

    if !global.quiet {
        println!("{} Edited message #{}", style("✓").green(), args.number);
    }
    Ok(())
}

fn delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let storage = storage(args.file);
    let mut store = MessageStore::load_from(&storage).into_diagnostic()?;
    let index = resolve_number(args.number, store.len())?;

    if !args.force {
        let text = store.get(index).map(|m| m.text.clone()).unwrap_or_default();
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete message #{}: \"{}\"?", args.number, text))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.delete(index).into_diagnostic()?;
    store.save_to(&storage).into_diagnostic()?;

    if !global.quiet {
        println!("{} Deleted message #{}", style("✓").green(), args.number);
    }
    Ok(())
}

fn clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let storage = storage(args.file);
    let mut store = MessageStore::load_from(&storage).into_diagnostic()?;

    if store.is_empty() {
        println!("No messages.");
        return Ok(());
    }

    if !args.force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete all {} message(s)?", store.len()))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.clear();
    store.save_to(&storage).into_diagnostic()?;

    if !global.quiet {
        println!("{} Cleared all messages", style("✓").green());
    }
    Ok(())
}

/// Convert a 1-based display number to an index, with a friendly error.
fn resolve_number(number: usize, len: usize) -> Result<usize> {
    if number == 0 || number > len {
        return Err(miette::miette!(
            "No message #{} ({} message(s) stored)",
            number,
            len
        ));
    }
    Ok(number - 1)
}

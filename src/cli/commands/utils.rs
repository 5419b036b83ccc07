//! Shared helpers for CLI commands

use miette::{IntoDiagnostic, Result};
use std::io::Read;
use std::path::Path;

/// Read from a file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| miette::miette!("Failed to read {}: {}", p.display(), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
            Ok(buf)
        }
    }
}

/// Write to a file, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, content)
            .map_err(|e| miette::miette!("Failed to write {}: {}", p.display(), e)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

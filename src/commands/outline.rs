//! Outline command implementation
//!
//! Parses a single file in detail mode and prints its declaration
//! structure, indented by block nesting, or as JSON.

use anyhow::{Context, Result};
use std::path::Path;

use crate::parser::{self, ParseOptions};

pub async fn run(file: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {:?}", file))?;

    let mut symbols = parser::parse_file(file, &content, ParseOptions { fetch_details: true });
    symbols.retain(|s| !s.kind.is_control());
    symbols.sort_by_key(|s| s.start_line);

    if json {
        println!("{}", serde_json::to_string_pretty(&symbols)?);
        return Ok(());
    }

    if symbols.is_empty() {
        println!("No symbols found in {}", file.display());
        return Ok(());
    }

    // Indent by containment: a symbol is nested while its start line falls
    // inside an enclosing block's span
    let mut enclosing_ends: Vec<usize> = Vec::new();
    for symbol in &symbols {
        while let Some(&end) = enclosing_ends.last() {
            if end < symbol.start_line {
                enclosing_ends.pop();
            } else {
                break;
            }
        }

        let indent = "  ".repeat(enclosing_ends.len());
        match symbol.end_line {
            Some(end) => println!(
                "{}{} ({}) [{}-{}]",
                indent, symbol.name, symbol.kind, symbol.start_line, end
            ),
            None => println!(
                "{}{} ({}) [{}]",
                indent, symbol.name, symbol.kind, symbol.start_line
            ),
        }

        if let Some(end) = symbol.end_line {
            if end > symbol.start_line {
                enclosing_ends.push(end);
            }
        }
    }

    Ok(())
}

use anyhow::Result;
use std::env;

use crate::search::SearchOptions;
use crate::Config;

/// Run the search command
///
/// Builds the in-memory index for the current directory, then runs the
/// query against it. Supports the full query grammar: `name`,
/// `name@file terms`, and `@file terms`.
///
/// # Arguments
///
/// * `query` - The search query
/// * `limit` - Maximum number of symbol groups to return
/// * `detail` - Track full block nesting while indexing
pub async fn run(query: &str, limit: Option<usize>, detail: bool) -> Result<()> {
    let root = env::current_dir()?;

    let mut config = Config::load(&root).unwrap_or_default();
    if detail {
        config.indexer.fetch_details = true;
    }

    let (index, stats) = super::index::build_index(&root, &config)?;
    eprintln!(
        "Indexed {} symbols across {} files in {:.2}s",
        stats.symbols_indexed,
        stats.files_indexed,
        stats.duration.as_secs_f64()
    );

    let options = SearchOptions {
        limit: Some(limit.unwrap_or(config.search.default_limit)),
        file_scope: None,
    };
    let results = index.search(query, &options);

    if results.is_empty() {
        println!("No symbols found for: {}", query);
        return Ok(());
    }

    println!("Found {} symbols for: \"{}\"\n", results.len(), query);

    for (i, entry) in results.iter().enumerate() {
        println!("{}. {}", i + 1, entry.name);
        for loc in &entry.locations {
            match loc.end_line {
                Some(end) => println!(
                    "   {}:{}-{} ({})",
                    loc.file.display(),
                    loc.start_line,
                    end,
                    loc.kind
                ),
                None => println!("   {}:{} ({})", loc.file.display(), loc.start_line, loc.kind),
            }
        }
    }

    Ok(())
}

//! Index command implementation.
//!
//! Walks the current project, parses every Ruby file, and prints build
//! statistics. The index lives in memory, so the other commands rebuild it
//! on startup; this command exists to inspect what a build picks up.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::Path;

use crate::config::Config;
use crate::index::{IndexStats, SymbolIndex};

/// Build an index for the tree at `root` with a progress bar.
pub(crate) fn build_index(root: &Path, config: &Config) -> Result<(SymbolIndex, IndexStats)> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] Indexing: [{bar:40.cyan/blue}] {pos}/{len}",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut index = SymbolIndex::from_config(config);
    let stats = index.index_tree_with_progress(root, &config.indexer, |done, total| {
        pb.set_length(total);
        pb.set_position(done);
    })?;
    pb.finish_and_clear();

    Ok((index, stats))
}

/// Run the index command.
///
/// # Arguments
///
/// * `detail` - Track full block nesting regardless of what the config says
pub async fn run(detail: bool) -> Result<()> {
    let root = env::current_dir()?;

    let mut config = Config::load(&root).unwrap_or_default();
    if detail {
        config.indexer.fetch_details = true;
    }

    let (index, stats) = build_index(&root, &config)?;

    println!("Project root: {}", root.display());
    println!("Backend: {}", index.backend_name());
    println!(
        "Indexed {} symbols ({} distinct names) across {} files in {:.2}s",
        stats.symbols_indexed,
        index.group_count(),
        stats.files_indexed,
        stats.duration.as_secs_f64()
    );
    if stats.errors > 0 {
        println!("{} paths could not be read", stats.errors);
    }

    Ok(())
}

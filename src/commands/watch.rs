//! Watch command implementation
//!
//! Builds the index, then watches for file changes and keeps it current
//! until interrupted.

use anyhow::{bail, Result};
use std::env;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{oneshot, RwLock};
use tracing::info;

use crate::watcher::{FileWatcher, WatcherConfig};
use crate::Config;

/// Run the watch command
///
/// # Arguments
/// * `debounce_ms` - Debounce delay in milliseconds
pub async fn run(debounce_ms: u64) -> Result<()> {
    let root = env::current_dir()?;

    if !Config::is_initialized(&root) {
        bail!("rubyseek is not initialized. Run 'rubyseek init' first.");
    }

    let config = Config::load(&root)?;

    println!("Starting watch mode...");
    println!("Watching directory: {:?}", root);
    println!("Debounce delay: {}ms", debounce_ms);
    println!("Extensions: {:?}", config.indexer.extensions);
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    let (index, stats) = super::index::build_index(&root, &config)?;
    println!(
        "Initial index: {} symbols across {} files",
        stats.symbols_indexed, stats.files_indexed
    );
    println!();

    let index = Arc::new(RwLock::new(index));
    let watcher_config = WatcherConfig::from_config(&config, debounce_ms);
    let watcher = FileWatcher::new(root, watcher_config, Arc::clone(&index));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let watcher_handle = tokio::spawn(async move { watcher.run(shutdown_rx).await });

    signal::ctrl_c().await?;

    println!();
    println!("Shutting down...");

    let _ = shutdown_tx.send(());

    let stats = watcher_handle.await??;

    println!();
    println!("Watch session complete!");
    println!("----------------------------------------");
    println!("  Files added:    {}", stats.files_added);
    println!("  Files modified: {}", stats.files_modified);
    println!("  Files deleted:  {}", stats.files_deleted);
    if stats.errors > 0 {
        println!("  Errors:         {}", stats.errors);
    }
    println!("----------------------------------------");

    info!("Watch session ended");

    Ok(())
}

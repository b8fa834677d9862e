//! File system watcher for automatic re-indexing
//!
//! Watches a project tree and keeps a shared [`SymbolIndex`] current as
//! files change on disk.

pub mod debouncer;

use anyhow::{Context, Result};
use glob::Pattern;
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebouncedEvent};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::index::SymbolIndex;
use crate::parser::ParseOptions;

pub use debouncer::{ChangeType, FileChange};

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
    /// File extensions to watch (empty = watch everything)
    pub extensions: Vec<String>,
    /// Exclusion globs, matched against path ancestors
    pub exclude_patterns: Vec<String>,
    /// Track full block nesting when re-parsing
    pub fetch_details: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            extensions: vec![],
            exclude_patterns: vec![],
            fetch_details: false,
        }
    }
}

impl WatcherConfig {
    /// Create a new WatcherConfig from the main Config
    pub fn from_config(config: &Config, debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            extensions: config.indexer.extensions.clone(),
            exclude_patterns: config.indexer.exclude_patterns.clone(),
            fetch_details: config.indexer.fetch_details,
        }
    }
}

/// Statistics accumulated while watching
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchStats {
    pub files_added: u64,
    pub files_modified: u64,
    pub files_deleted: u64,
    pub errors: u64,
}

impl WatchStats {
    pub fn merge(&mut self, other: &WatchStats) {
        self.files_added += other.files_added;
        self.files_modified += other.files_modified;
        self.files_deleted += other.files_deleted;
        self.errors += other.errors;
    }
}

/// File system watcher that applies changes to a shared index
pub struct FileWatcher {
    root: PathBuf,
    config: WatcherConfig,
    exclude: Vec<Pattern>,
    index: Arc<RwLock<SymbolIndex>>,
}

impl FileWatcher {
    pub fn new(root: PathBuf, config: WatcherConfig, index: Arc<RwLock<SymbolIndex>>) -> Self {
        let exclude = config
            .exclude_patterns
            .iter()
            .filter_map(|raw| Pattern::new(raw).ok())
            .collect();
        Self {
            root,
            config,
            exclude,
            index,
        }
    }

    /// Start watching for file changes
    ///
    /// Runs until the shutdown signal is received, returning the total
    /// statistics for the session.
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<WatchStats> {
        let debounce_duration = Duration::from_millis(self.config.debounce_ms);

        let (tx, mut rx) = mpsc::channel::<Vec<DebouncedEvent>>(100);

        let tx_clone = tx.clone();
        let mut debouncer = new_debouncer(
            debounce_duration,
            None,
            move |result: std::result::Result<Vec<DebouncedEvent>, Vec<notify::Error>>| {
                match result {
                    Ok(events) => {
                        if !events.is_empty() {
                            if let Err(e) = tx_clone.blocking_send(events) {
                                error!("Failed to send debounced events: {}", e);
                            }
                        }
                    }
                    Err(errors) => {
                        for error in errors {
                            error!("Watch error: {}", error);
                        }
                    }
                }
            },
        )
        .with_context(|| "Failed to create file watcher debouncer")?;

        debouncer
            .watch(&self.root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch directory: {:?}", self.root))?;

        info!("Watching directory: {:?}", self.root);
        info!("Debounce delay: {}ms", self.config.debounce_ms);

        let mut total_stats = WatchStats::default();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received, stopping watcher");
                    break;
                }

                Some(events) = rx.recv() => {
                    let changes = self.convert_events(events);

                    if !changes.is_empty() {
                        info!("Processing {} file changes", changes.len());
                        let stats = self.apply_changes(changes).await;
                        total_stats.merge(&stats);
                        Self::print_stats(&stats);
                    }
                }
            }
        }

        Ok(total_stats)
    }

    /// Apply a batch of changes to the shared index
    pub async fn apply_changes(&self, changes: Vec<FileChange>) -> WatchStats {
        let options = ParseOptions {
            fetch_details: self.config.fetch_details,
        };
        let mut stats = WatchStats::default();
        let mut index = self.index.write().await;

        for change in changes {
            if !change.needs_parse() {
                index.remove_file(&change.path);
                stats.files_deleted += 1;
                continue;
            }

            match std::fs::read_to_string(&change.path) {
                Ok(content) => {
                    index.register_source(&change.path, &content, options);
                    match change.change_type {
                        ChangeType::Created => stats.files_added += 1,
                        _ => stats.files_modified += 1,
                    }
                }
                Err(err) => {
                    warn!("Failed to read {:?}: {}", change.path, err);
                    stats.errors += 1;
                }
            }
        }

        stats
    }

    /// Convert notify debounced events to our FileChange type
    fn convert_events(&self, events: Vec<DebouncedEvent>) -> Vec<FileChange> {
        let mut changes = Vec::new();

        for event in &events {
            for path in &event.paths {
                if path.is_dir() {
                    continue;
                }

                if !self.should_watch(path) {
                    debug!("Skipping file (not in extensions): {:?}", path);
                    continue;
                }

                if self.is_excluded(path) {
                    debug!("Skipping file (excluded): {:?}", path);
                    continue;
                }

                let change_type = match event.kind {
                    notify::EventKind::Create(_) => ChangeType::Created,
                    notify::EventKind::Modify(_) => ChangeType::Modified,
                    notify::EventKind::Remove(_) => ChangeType::Deleted,
                    _ => continue,
                };

                debug!("File change detected: {:?} -> {:?}", change_type, path);
                changes.push(FileChange::new(path.clone(), change_type));
            }
        }

        dedup_changes(changes)
    }

    /// Check if a file should be watched based on extensions
    fn should_watch(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.config.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Check if a path or any of its ancestors matches an exclusion glob
    fn is_excluded(&self, path: &Path) -> bool {
        path.ancestors()
            .any(|p| self.exclude.iter().any(|pattern| pattern.matches_path(p)))
    }

    fn print_stats(stats: &WatchStats) {
        if stats.files_added > 0 {
            println!("  + {} files added", stats.files_added);
        }
        if stats.files_modified > 0 {
            println!("  ~ {} files modified", stats.files_modified);
        }
        if stats.files_deleted > 0 {
            println!("  - {} files deleted", stats.files_deleted);
        }
        if stats.errors > 0 {
            warn!("  {} errors occurred", stats.errors);
        }
    }
}

/// Deduplicate a change batch, keeping the last change per path
fn dedup_changes(changes: Vec<FileChange>) -> Vec<FileChange> {
    let mut seen = HashMap::new();
    for change in changes {
        seen.insert(change.path.clone(), change);
    }
    seen.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_watcher_config_default() {
        let config = WatcherConfig::default();
        assert_eq!(config.debounce_ms, 500);
        assert!(config.extensions.is_empty());
        assert!(config.exclude_patterns.is_empty());
    }

    #[test]
    fn test_dedup_keeps_last_change_per_path() {
        let path = PathBuf::from("a.rb");
        let changes = vec![
            FileChange::new(path.clone(), ChangeType::Created),
            FileChange::new(path.clone(), ChangeType::Deleted),
        ];

        let deduped = dedup_changes(changes);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].change_type, ChangeType::Deleted);
    }

    #[test]
    fn test_exclusion_matches_ancestors() {
        let config = WatcherConfig {
            extensions: vec!["rb".to_string()],
            exclude_patterns: vec!["**/vendor".to_string()],
            ..Default::default()
        };
        let index = Arc::new(RwLock::new(SymbolIndex::from_config(&Config::default())));
        let watcher = FileWatcher::new(PathBuf::from("/proj"), config, index);

        assert!(watcher.is_excluded(Path::new("/proj/vendor/gems/dep.rb")));
        assert!(!watcher.is_excluded(Path::new("/proj/app/models/user.rb")));
        assert!(!watcher.should_watch(Path::new("/proj/notes.txt")));
        assert!(watcher.should_watch(Path::new("/proj/app/models/user.rb")));
    }

    #[tokio::test]
    async fn test_apply_changes_updates_index() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("user.rb");
        fs::write(&file, "class User\n  def save\n  end\nend\n").unwrap();

        let index = Arc::new(RwLock::new(SymbolIndex::from_config(&Config::default())));
        let watcher = FileWatcher::new(
            dir.path().to_path_buf(),
            WatcherConfig::default(),
            Arc::clone(&index),
        );

        let stats = watcher
            .apply_changes(vec![FileChange::new(file.clone(), ChangeType::Created)])
            .await;
        assert_eq!(stats.files_added, 1);
        assert_eq!(index.read().await.group_count(), 2);

        let stats = watcher
            .apply_changes(vec![FileChange::new(file, ChangeType::Deleted)])
            .await;
        assert_eq!(stats.files_deleted, 1);
        assert_eq!(index.read().await.group_count(), 0);
    }
}

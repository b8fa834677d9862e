use glob::Pattern;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::config::IndexerConfig;

/// Walks the filesystem respecting .gitignore and the configured
/// exclusion globs
pub struct Walker {
    root: PathBuf,
    extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
}

impl Walker {
    /// Create a new Walker with the given root directory and configuration.
    /// Invalid glob patterns are dropped with a warning.
    pub fn new(root: PathBuf, config: &IndexerConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::warn!("Skipping invalid exclude pattern {:?}: {}", raw, err);
                    None
                }
            })
            .collect();

        Self {
            root,
            extensions: config.extensions.iter().cloned().collect(),
            exclude_patterns,
        }
    }

    /// Walk the directory tree and collect matching file paths, along with
    /// the number of walk-level errors (missing root, unreadable entries).
    /// Errors are logged and counted, never fatal.
    ///
    /// This respects:
    /// - .gitignore files
    /// - Exclusion globs from config (matching directories are pruned
    ///   before descent, so `**/vendor` never gets walked into)
    /// - File extension filtering
    pub fn collect_files(&self) -> (Vec<PathBuf>, u64) {
        let mut builder = WalkBuilder::new(&self.root);

        // Enable .gitignore support (enabled by default, but explicit)
        builder.git_ignore(true);
        builder.git_global(true);
        builder.git_exclude(true);

        // Skip hidden entries (.git, editor droppings)
        builder.hidden(true);

        let exclude_patterns = self.exclude_patterns.clone();
        builder.filter_entry(move |entry| {
            !exclude_patterns
                .iter()
                .any(|pattern| pattern.matches_path(entry.path()))
        });

        let mut errors = 0;
        let files = builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Walk error under {:?}: {}", self.root, err);
                    errors += 1;
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(OsStr::to_str)
                    .map(|ext| self.extensions.contains(ext))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        (files, errors)
    }
}

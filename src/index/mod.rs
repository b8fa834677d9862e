//! In-memory symbol index for fast lookups

pub mod walker;

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{Config, IndexerConfig, MatchMode};
use crate::parser::{self, ParseOptions, Symbol, SymbolKind};
use crate::search::fuzzy::FuzzyMatcher;
use crate::search::traits::MatchBackend;
use crate::search::weighted::WeightedMatcher;
use crate::search::{SearchEntry, SearchOptions};

use walker::Walker;

/// One recorded occurrence of a symbol name
#[derive(Debug, Clone, Serialize)]
pub struct SymbolLocation {
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: Option<usize>,
    pub kind: SymbolKind,
}

/// All occurrences of one symbol name across the tree
#[derive(Debug, Clone)]
pub struct SymbolGroup {
    /// Registration-order id, used for deterministic ranking ties
    pub id: u64,
    pub locations: Vec<SymbolLocation>,
}

/// Per-file registration record, kept for incremental removal
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Registration-order id, used to order file-browser results
    pub id: u64,
    /// Group ids of the symbols declared in this file
    pub symbol_ids: Vec<u64>,
}

/// The raw index maps, shared read-only with the matching backends
#[derive(Debug, Default)]
pub struct IndexData {
    pub groups: HashMap<String, SymbolGroup>,
    pub files: HashMap<PathBuf, FileRecord>,
    pub names_by_id: HashMap<u64, String>,
    id_counter: u64,
}

impl IndexData {
    fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }
}

/// Statistics from an index build
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub files_indexed: u64,
    pub symbols_indexed: u64,
    pub errors: u64,
    pub duration: Duration,
}

/// In-memory index over one project tree, paired with a matching backend
pub struct SymbolIndex {
    data: IndexData,
    backend: Box<dyn MatchBackend>,
}

impl SymbolIndex {
    pub fn new(backend: Box<dyn MatchBackend>) -> Self {
        Self {
            data: IndexData::default(),
            backend,
        }
    }

    /// Create an index with the backend the configuration selects
    pub fn from_config(config: &Config) -> Self {
        let backend: Box<dyn MatchBackend> = match config.search.mode {
            MatchMode::Weighted => Box::new(WeightedMatcher::new(&config.search)),
            MatchMode::Fuzzy => Box::new(FuzzyMatcher::new(config.search.fuzzy_threshold)),
        };
        Self::new(backend)
    }

    pub fn data(&self) -> &IndexData {
        &self.data
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Register a file's parsed symbols, replacing any previous registration
    /// for the same path. Control-flow occurrences are dropped here; they are
    /// parse artifacts, not searchable names.
    pub fn register_file(&mut self, file: &Path, symbols: &[Symbol]) {
        self.remove_file(file);

        let file_id = self.data.next_id();
        let mut symbol_ids = Vec::new();

        for symbol in symbols {
            if symbol.kind.is_control() {
                continue;
            }

            let group_id = match self.data.groups.get(&symbol.name) {
                Some(group) => group.id,
                None => {
                    let id = self.data.next_id();
                    self.data.groups.insert(
                        symbol.name.clone(),
                        SymbolGroup {
                            id,
                            locations: Vec::new(),
                        },
                    );
                    self.data.names_by_id.insert(id, symbol.name.clone());
                    self.backend.on_add(&symbol.name);
                    id
                }
            };

            if let Some(group) = self.data.groups.get_mut(&symbol.name) {
                group.locations.push(SymbolLocation {
                    file: symbol.file.clone(),
                    start_line: symbol.start_line,
                    end_line: symbol.end_line,
                    kind: symbol.kind,
                });
            }

            if !symbol_ids.contains(&group_id) {
                symbol_ids.push(group_id);
            }
        }

        self.data.files.insert(
            file.to_path_buf(),
            FileRecord {
                id: file_id,
                symbol_ids,
            },
        );
    }

    /// Parse `content` as `file` and register the result.
    pub fn register_source(&mut self, file: &Path, content: &str, options: ParseOptions) {
        let symbols = parser::parse_file(file, content, options);
        self.register_file(file, &symbols);
    }

    /// Drop every occurrence registered from the given file. Groups left
    /// without locations disappear entirely, including from the backend.
    pub fn remove_file(&mut self, file: &Path) {
        let Some(record) = self.data.files.remove(file) else {
            return;
        };

        for symbol_id in record.symbol_ids {
            let Some(name) = self.data.names_by_id.get(&symbol_id).cloned() else {
                continue;
            };
            let Some(group) = self.data.groups.get_mut(&name) else {
                continue;
            };

            group.locations.retain(|loc| loc.file != file);

            if group.locations.is_empty() {
                self.data.groups.remove(&name);
                self.data.names_by_id.remove(&symbol_id);
                self.backend.on_remove(&name);
            }
        }
    }

    /// Walk the tree and index every matching file
    pub fn index_tree(&mut self, root: &Path, config: &IndexerConfig) -> Result<IndexStats> {
        self.index_tree_with_progress(root, config, |_, _| {})
    }

    /// Walk the tree and index every matching file, reporting
    /// (processed, total) after each file
    pub fn index_tree_with_progress<F>(
        &mut self,
        root: &Path,
        config: &IndexerConfig,
        mut progress: F,
    ) -> Result<IndexStats>
    where
        F: FnMut(u64, u64),
    {
        let started = Instant::now();
        let walker = Walker::new(root.to_path_buf(), config);
        let (files, walk_errors) = walker.collect_files();
        let total = files.len() as u64;

        let options = ParseOptions {
            fetch_details: config.fetch_details,
        };

        let mut stats = IndexStats {
            errors: walk_errors,
            ..IndexStats::default()
        };

        for (i, file) in files.iter().enumerate() {
            match std::fs::read_to_string(file) {
                Ok(content) => {
                    let symbols = parser::parse_file(file, &content, options);
                    debug!("Parsed {} symbols from {:?}", symbols.len(), file);
                    stats.symbols_indexed += symbols.len() as u64;
                    stats.files_indexed += 1;
                    self.register_file(file, &symbols);
                }
                Err(err) => {
                    warn!("Failed to read {:?}: {}", file, err);
                    stats.errors += 1;
                }
            }
            progress(i as u64 + 1, total);
        }

        stats.duration = started.elapsed();
        info!(
            "Indexed {} symbols across {} files in {:?} ({} errors)",
            stats.symbols_indexed, stats.files_indexed, stats.duration, stats.errors
        );

        Ok(stats)
    }

    /// Run a query against the index with the configured backend
    pub fn search(&self, raw: &str, options: &SearchOptions) -> Vec<SearchEntry> {
        crate::search::execute(&self.data, self.backend.as_ref(), raw, options)
    }

    /// Distinct symbol names currently indexed
    pub fn group_count(&self) -> usize {
        self.data.groups.len()
    }

    /// Files currently registered
    pub fn file_count(&self) -> usize {
        self.data.files.len()
    }

    /// Total recorded occurrences
    pub fn location_count(&self) -> usize {
        self.data.groups.values().map(|g| g.locations.len()).sum()
    }
}

//! Query engine over the symbol index.
//!
//! A raw query is `name`, `name@file terms`, or `@file terms`. The name part
//! goes to the configured matching backend; file terms filter the resulting
//! locations by substring. A query with only file terms switches to
//! file-browser mode and lists what the matching files declare.

pub mod fuzzy;
pub mod traits;
pub mod weighted;

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::index::{IndexData, SymbolLocation};
use traits::MatchBackend;

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Maximum number of symbol groups to return
    pub limit: Option<usize>,
    /// Extra file terms applied on top of any `@` terms in the query
    pub file_scope: Option<String>,
}

/// One result group: a symbol name and its surviving locations
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    pub name: String,
    pub locations: Vec<SymbolLocation>,
    pub score: f32,
}

/// A parsed query: the name term plus lowercase file terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name_term: String,
    pub file_terms: Vec<String>,
}

impl Query {
    /// Split on the first `@`; everything after it is file terms.
    pub fn parse(raw: &str) -> Self {
        let (name_part, file_part) = match raw.split_once('@') {
            Some((name, file)) => (name, file),
            None => (raw, ""),
        };

        Self {
            name_term: name_part.trim().to_lowercase(),
            file_terms: file_part
                .split_whitespace()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }
}

fn path_matches(path: &Path, terms: &[String]) -> bool {
    let lossy = path.to_string_lossy().to_lowercase();
    terms.iter().all(|term| lossy.contains(term))
}

/// Run a query against the index data with the given backend.
pub fn execute(
    data: &IndexData,
    backend: &dyn MatchBackend,
    raw: &str,
    options: &SearchOptions,
) -> Vec<SearchEntry> {
    let mut query = Query::parse(raw);
    if let Some(scope) = &options.file_scope {
        query
            .file_terms
            .extend(scope.split_whitespace().map(|t| t.to_lowercase()));
    }

    let limit = options.limit.unwrap_or(usize::MAX);

    if query.name_term.is_empty() {
        if query.file_terms.is_empty() {
            return Vec::new();
        }
        return browse_files(data, &query.file_terms, limit);
    }

    let ranked = backend.rank(&query.name_term, data);
    debug!(
        backend = backend.backend_name(),
        term = query.name_term.as_str(),
        candidates = ranked.len(),
        "Ranked name candidates"
    );

    let mut entries = Vec::new();
    for candidate in ranked {
        let Some(group) = data.groups.get(&candidate.name) else {
            continue;
        };

        let locations: Vec<SymbolLocation> = if query.file_terms.is_empty() {
            group.locations.clone()
        } else {
            group
                .locations
                .iter()
                .filter(|loc| path_matches(&loc.file, &query.file_terms))
                .cloned()
                .collect()
        };

        if locations.is_empty() {
            continue;
        }

        entries.push(SearchEntry {
            name: candidate.name,
            locations,
            score: candidate.score,
        });

        if entries.len() >= limit {
            break;
        }
    }

    entries
}

/// File-browser mode: list the symbols declared by files matching every
/// file term, in file registration order.
fn browse_files(data: &IndexData, terms: &[String], limit: usize) -> Vec<SearchEntry> {
    let mut files: Vec<_> = data
        .files
        .iter()
        .filter(|(path, _)| path_matches(path, terms))
        .collect();
    files.sort_by_key(|(_, record)| record.id);

    let mut seen = Vec::new();
    let mut entries = Vec::new();

    for (_, record) in files {
        for symbol_id in &record.symbol_ids {
            if seen.contains(symbol_id) {
                continue;
            }
            seen.push(*symbol_id);

            let Some(name) = data.names_by_id.get(symbol_id) else {
                continue;
            };
            let Some(group) = data.groups.get(name) else {
                continue;
            };

            let locations: Vec<SymbolLocation> = group
                .locations
                .iter()
                .filter(|loc| path_matches(&loc.file, terms))
                .cloned()
                .collect();

            if locations.is_empty() {
                continue;
            }

            entries.push(SearchEntry {
                name: name.clone(),
                locations,
                score: 0.0,
            });

            if entries.len() >= limit {
                return entries;
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::index::SymbolIndex;
    use crate::parser::{Symbol, SymbolKind};
    use crate::search::weighted::WeightedMatcher;
    use std::path::PathBuf;

    fn symbol(name: &str, file: &str, line: usize) -> Symbol {
        Symbol {
            name: name.to_string(),
            file: PathBuf::from(file),
            start_line: line,
            end_line: None,
            kind: SymbolKind::Method,
        }
    }

    fn populated() -> SymbolIndex {
        let mut index =
            SymbolIndex::new(Box::new(WeightedMatcher::new(&SearchConfig::default())));
        index.register_file(
            Path::new("app/models/user.rb"),
            &[
                symbol("save", "app/models/user.rb", 3),
                symbol("full_name", "app/models/user.rb", 8),
            ],
        );
        index.register_file(
            Path::new("app/models/post.rb"),
            &[symbol("save", "app/models/post.rb", 5)],
        );
        index
    }

    #[test]
    fn test_query_parse_splits_on_at() {
        let query = Query::parse("save@user models");
        assert_eq!(query.name_term, "save");
        assert_eq!(query.file_terms, vec!["user", "models"]);

        let query = Query::parse("Save ");
        assert_eq!(query.name_term, "save");
        assert!(query.file_terms.is_empty());
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let index = populated();
        assert!(index.search("", &SearchOptions::default()).is_empty());
        assert!(index.search("   ", &SearchOptions::default()).is_empty());
        assert!(index.search("@", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_file_terms_filter_locations() {
        let index = populated();

        let results = index.search("save@user", &SearchOptions::default());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "save");
        assert_eq!(results[0].locations.len(), 1);
        assert!(results[0].locations[0].file.ends_with("user.rb"));
    }

    #[test]
    fn test_file_scope_option_merges_with_query_terms() {
        let index = populated();
        let options = SearchOptions {
            limit: None,
            file_scope: Some("post".to_string()),
        };

        let results = index.search("save", &options);

        assert_eq!(results.len(), 1);
        assert!(results[0].locations[0].file.ends_with("post.rb"));
    }

    #[test]
    fn test_file_browser_mode() {
        let index = populated();

        let results = index.search("@user", &SearchOptions::default());

        let names: Vec<&str> = results.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["save", "full_name"]);
        assert!(results
            .iter()
            .flat_map(|e| &e.locations)
            .all(|loc| loc.file.ends_with("user.rb")));
    }

    #[test]
    fn test_limit_truncates_groups() {
        let index = populated();
        let options = SearchOptions {
            limit: Some(1),
            file_scope: None,
        };

        let results = index.search("a", &options);

        assert!(results.len() <= 1);
    }
}

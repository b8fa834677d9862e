//! Weighted multi-strategy name matching.
//!
//! Runs four match strategies over the indexed names and fuses them into one
//! score per symbol group. The name strategies (prefix, exact, suffix) each
//! contribute `(list_len - position) * weight`, so earlier positions in a
//! list count for more. The filename strategy is a fallback signal and
//! contributes a flat `file_weight` per group, never scaled by list length,
//! so symbols that merely live in a matching file cannot outscore a direct
//! name match.

use std::collections::HashMap;

use super::traits::{MatchBackend, RankedName};
use crate::config::SearchConfig;
use crate::index::IndexData;

pub struct WeightedMatcher {
    prefix_weight: f32,
    exact_weight: f32,
    file_weight: f32,
    suffix_weight: f32,
}

impl WeightedMatcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            prefix_weight: config.prefix_weight,
            exact_weight: config.exact_weight,
            file_weight: config.file_weight,
            suffix_weight: config.suffix_weight,
        }
    }

    /// Group ids whose file name contains the term, in file registration
    /// order, deduplicated. Maps file matches back onto the symbols the
    /// file declares.
    fn filename_matches(&self, term: &str, data: &IndexData) -> Vec<u64> {
        let mut files: Vec<_> = data.files.iter().collect();
        files.sort_by_key(|(_, record)| record.id);

        let mut seen = Vec::new();
        for (path, record) in files {
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.to_lowercase().contains(term))
                .unwrap_or(false);
            if !matches {
                continue;
            }
            for id in &record.symbol_ids {
                if !seen.contains(id) {
                    seen.push(*id);
                }
            }
        }
        seen
    }
}

fn accumulate(scores: &mut HashMap<u64, f32>, ranked: &[u64], weight: f32) {
    let len = ranked.len();
    for (i, id) in ranked.iter().enumerate() {
        *scores.entry(*id).or_insert(0.0) += (len - i) as f32 * weight;
    }
}

impl MatchBackend for WeightedMatcher {
    fn backend_name(&self) -> &'static str {
        "weighted"
    }

    fn rank(&self, term: &str, data: &IndexData) -> Vec<RankedName> {
        if term.is_empty() {
            return Vec::new();
        }

        let names: Vec<(String, u64)> = data
            .groups
            .iter()
            .map(|(name, group)| (name.to_lowercase(), group.id))
            .collect();

        // Within each strategy list, closer matches come first (shorter
        // names for prefix/suffix, whole-name equality for exact) and group
        // id breaks ties, so every list is deterministic.
        let mut prefix: Vec<(usize, u64)> = names
            .iter()
            .filter(|(lower, _)| lower.starts_with(term))
            .map(|(lower, id)| (lower.len(), *id))
            .collect();
        prefix.sort_unstable();
        let prefix: Vec<u64> = prefix.into_iter().map(|(_, id)| id).collect();

        let mut exact: Vec<(u8, u64)> = names
            .iter()
            .filter(|(lower, _)| lower.as_str() == term || lower.split('_').any(|tok| tok == term))
            .map(|(lower, id)| (u8::from(lower.as_str() != term), *id))
            .collect();
        exact.sort_unstable();
        let exact: Vec<u64> = exact.into_iter().map(|(_, id)| id).collect();

        let mut suffix: Vec<(usize, u64)> = names
            .iter()
            .filter(|(lower, _)| lower.ends_with(term))
            .map(|(lower, id)| (lower.len(), *id))
            .collect();
        suffix.sort_unstable();
        let suffix: Vec<u64> = suffix.into_iter().map(|(_, id)| id).collect();

        let filename = self.filename_matches(term, data);

        let mut scores: HashMap<u64, f32> = HashMap::new();
        accumulate(&mut scores, &prefix, self.prefix_weight);
        accumulate(&mut scores, &exact, self.exact_weight);
        accumulate(&mut scores, &suffix, self.suffix_weight);

        // Flat fallback boost: bounded by file_weight regardless of how many
        // symbols the matching file declares.
        for id in &filename {
            *scores.entry(*id).or_insert(0.0) += self.file_weight;
        }

        let mut ranked: Vec<(u64, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        ranked
            .into_iter()
            .filter_map(|(id, score)| {
                data.names_by_id
                    .get(&id)
                    .map(|name| RankedName {
                        name: name.clone(),
                        score,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SymbolIndex;
    use crate::parser::{Symbol, SymbolKind};
    use std::path::{Path, PathBuf};

    fn matcher() -> WeightedMatcher {
        WeightedMatcher::new(&SearchConfig::default())
    }

    fn populated(entries: &[(&str, &str)]) -> SymbolIndex {
        let mut index = SymbolIndex::new(Box::new(matcher()));
        for (name, file) in entries {
            index.register_file(
                Path::new(file),
                &[Symbol {
                    name: name.to_string(),
                    file: PathBuf::from(file),
                    start_line: 1,
                    end_line: None,
                    kind: SymbolKind::Method,
                }],
            );
        }
        index
    }

    #[test]
    fn test_prefix_outranks_suffix() {
        let index = populated(&[("save_user", "a.rb"), ("user_save", "b.rb")]);

        let ranked = matcher().rank("user", index.data());

        assert_eq!(ranked[0].name, "user_save");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_exact_name_outranks_compound() {
        let index = populated(&[("save_all", "a.rb"), ("save", "b.rb")]);

        let ranked = matcher().rank("save", index.data());

        assert_eq!(ranked[0].name, "save");
    }

    #[test]
    fn test_filename_match_surfaces_declared_symbols() {
        let index = populated(&[("validate_email", "app/models/user.rb")]);

        let ranked = matcher().rank("user", index.data());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "validate_email");
    }

    #[test]
    fn test_name_match_outranks_filename_crowd() {
        let mut index = SymbolIndex::new(Box::new(matcher()));
        let crowd: Vec<Symbol> = ["email", "address", "phone", "login", "logout", "avatar"]
            .iter()
            .enumerate()
            .map(|(i, name)| Symbol {
                name: name.to_string(),
                file: PathBuf::from("app/models/user.rb"),
                start_line: i + 1,
                end_line: None,
                kind: SymbolKind::Method,
            })
            .collect();
        index.register_file(Path::new("app/models/user.rb"), &crowd);
        index.register_file(
            Path::new("lib/current.rb"),
            &[Symbol {
                name: "user".to_string(),
                file: PathBuf::from("lib/current.rb"),
                start_line: 1,
                end_line: None,
                kind: SymbolKind::Method,
            }],
        );

        let ranked = matcher().rank("user", index.data());

        assert_eq!(ranked[0].name, "user");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let index = populated(&[("UserProfile", "a.rb")]);

        let ranked = matcher().rank("userpro", index.data());

        assert_eq!(ranked[0].name, "UserProfile");
    }

    #[test]
    fn test_non_matching_term_returns_nothing() {
        let index = populated(&[("save", "a.rb")]);

        assert!(matcher().rank("zzz", index.data()).is_empty());
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let index = populated(&[("a_save", "a.rb"), ("b_save", "b.rb"), ("save", "c.rb")]);

        let first: Vec<String> = matcher()
            .rank("save", index.data())
            .into_iter()
            .map(|r| r.name)
            .collect();
        let second: Vec<String> = matcher()
            .rank("save", index.data())
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[0], "save");
    }
}

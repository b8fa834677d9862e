//! Fuzzy name matching via Levenshtein similarity.

use super::traits::{MatchBackend, RankedName};
use crate::index::IndexData;

/// Ranks names by normalized edit-distance similarity.
///
/// Keeps its own flat name list, maintained through the backend callbacks,
/// so ranking never has to re-collect the group map.
pub struct FuzzyMatcher {
    names: Vec<String>,
    threshold: f32,
}

impl FuzzyMatcher {
    pub fn new(threshold: f32) -> Self {
        Self {
            names: Vec::new(),
            threshold,
        }
    }
}

impl MatchBackend for FuzzyMatcher {
    fn backend_name(&self) -> &'static str {
        "fuzzy"
    }

    fn on_add(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    fn on_remove(&mut self, name: &str) {
        self.names.retain(|n| n != name);
    }

    fn rank(&self, term: &str, data: &IndexData) -> Vec<RankedName> {
        if term.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(f32, u64, &String)> = self
            .names
            .iter()
            .filter_map(|name| {
                let score = similarity(term, &name.to_lowercase());
                if score < self.threshold {
                    return None;
                }
                data.groups.get(name).map(|group| (score, group.id, name))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        ranked
            .into_iter()
            .map(|(score, _, name)| RankedName {
                name: name.clone(),
                score,
            })
            .collect()
    }
}

/// Normalized similarity in 0.0 - 1.0, where 1.0 is an exact match.
fn similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f32 / max_len as f32
}

/// Two-row Levenshtein distance.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

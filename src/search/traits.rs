//! Matching backend trait for polymorphic name ranking.
//!
//! A backend turns a name term into a ranked list of indexed symbol names.
//! The index owns one backend and notifies it as names appear and disappear,
//! so backends may keep their own auxiliary state (the fuzzy matcher keeps a
//! flat name list).

use crate::index::IndexData;

/// Common trait for name-matching strategies.
pub trait MatchBackend: Send + Sync {
    /// Identifier for logging, such as "weighted" or "fuzzy".
    fn backend_name(&self) -> &'static str;

    /// Called when a name gains its first indexed occurrence.
    fn on_add(&mut self, _name: &str) {}

    /// Called when a name loses its last indexed occurrence.
    fn on_remove(&mut self, _name: &str) {}

    /// Rank indexed names against the term, best first.
    ///
    /// The term is already trimmed and lowercased. Ties must break on group
    /// id (registration order) so repeated queries return identical lists.
    fn rank(&self, term: &str, data: &IndexData) -> Vec<RankedName>;
}

/// One ranked name with its backend-specific score.
#[derive(Debug, Clone)]
pub struct RankedName {
    pub name: String,
    pub score: f32,
}

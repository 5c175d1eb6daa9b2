//! Tunables for a [`Recommender`](crate::Recommender).

use crate::selection::SelectionPolicy;
use neighbors::{DEFAULT_NEIGHBORS_PER_ITEM, UserUniverse};
use serde::{Deserialize, Serialize};

/// Recommendations returned when the caller doesn't ask for a count
pub const DEFAULT_TOP_N: usize = 10;

/// Favourites accepted per request
pub const DEFAULT_MAX_FAVORITES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub default_top_n: usize,
    /// Users kept per favourite movie during neighbor selection
    pub neighbors_per_item: usize,
    pub universe: UserUniverse,
    pub max_favorites: usize,
    pub selection: SelectionPolicy,
}

impl RecommenderConfig {
    pub fn with_universe(mut self, universe: UserUniverse) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_neighbors_per_item(mut self, count: usize) -> Self {
        self.neighbors_per_item = count;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_max_favorites(mut self, max: usize) -> Self {
        self.max_favorites = max;
        self
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            neighbors_per_item: DEFAULT_NEIGHBORS_PER_ITEM,
            universe: UserUniverse::default(),
            max_favorites: DEFAULT_MAX_FAVORITES,
            selection: SelectionPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::default();
        assert_eq!(config.default_top_n, 10);
        assert_eq!(config.neighbors_per_item, 10);
        assert_eq!(config.universe, UserUniverse::Prefix(20_000));
        assert_eq!(config.max_favorites, 3);
        assert_eq!(config.selection, SelectionPolicy::DedupThenTruncate);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: RecommenderConfig =
            serde_json::from_str(r#"{"universe": "full", "selection": "truncate_then_dedup"}"#)
                .unwrap();

        assert_eq!(config.universe, UserUniverse::Full);
        assert_eq!(config.selection, SelectionPolicy::TruncateThenDedup);
        assert_eq!(config.neighbors_per_item, 10);

        let config: RecommenderConfig =
            serde_json::from_str(r#"{"universe": {"prefix": 500}}"#).unwrap();
        assert_eq!(config.universe, UserUniverse::Prefix(500));
    }
}

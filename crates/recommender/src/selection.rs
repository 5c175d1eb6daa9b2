//! Ranking scored (movie, neighbor) pairs into a top-N list.

use data_loader::{MovieId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the sorted pair list is cut down to `top_n` distinct movies.
///
/// A movie is scored once per neighbor, so the sorted list usually holds
/// the same movie several times near the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Drop repeated movies first, then keep `top_n`. Always yields
    /// `top_n` movies when that many distinct ones were scored.
    #[default]
    DedupThenTruncate,
    /// Keep the first `top_n` pairs, then drop repeats. Can return fewer
    /// than `top_n` movies even when more qualify.
    TruncateThenDedup,
}

/// One model estimate for a catalog movie, through one neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub user_id: UserId,
    pub estimate: f32,
}

/// Sort by estimate (descending, stable) and select per `policy`.
///
/// Every returned movie is distinct and carries its best estimate.
pub fn rank(
    mut scored: Vec<ScoredMovie>,
    top_n: usize,
    policy: SelectionPolicy,
) -> Vec<ScoredMovie> {
    scored.sort_by(|a, b| b.estimate.total_cmp(&a.estimate));

    let mut seen = HashSet::new();
    match policy {
        SelectionPolicy::DedupThenTruncate => scored
            .into_iter()
            .filter(|s| seen.insert(s.movie_id))
            .take(top_n)
            .collect(),
        SelectionPolicy::TruncateThenDedup => scored
            .into_iter()
            .take(top_n)
            .filter(|s| seen.insert(s.movie_id))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(movie_id: MovieId, user_id: UserId, estimate: f32) -> ScoredMovie {
        ScoredMovie {
            movie_id,
            user_id,
            estimate,
        }
    }

    fn pairs() -> Vec<ScoredMovie> {
        vec![
            scored(3, 1, 3.0),
            scored(1, 1, 5.0),
            scored(2, 1, 4.0),
            scored(1, 2, 4.5),
            scored(2, 2, 4.0),
            scored(4, 2, 2.0),
        ]
    }

    fn ids(ranked: &[ScoredMovie]) -> Vec<MovieId> {
        ranked.iter().map(|s| s.movie_id).collect()
    }

    #[test]
    fn test_dedup_then_truncate_fills_top_n() {
        let ranked = rank(pairs(), 3, SelectionPolicy::DedupThenTruncate);

        assert_eq!(ids(&ranked), vec![1, 2, 3]);
        assert_eq!(ranked[0].estimate, 5.0, "best estimate wins");
    }

    #[test]
    fn test_truncate_then_dedup_falls_short() {
        // Top 3 pairs are movie 1 twice and movie 2 once
        let ranked = rank(pairs(), 3, SelectionPolicy::TruncateThenDedup);

        assert_eq!(ids(&ranked), vec![1, 2]);
        assert!(ranked.len() < 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(
            vec![scored(9, 1, 4.0), scored(8, 1, 4.0), scored(7, 1, 4.0)],
            10,
            SelectionPolicy::DedupThenTruncate,
        );
        assert_eq!(ids(&ranked), vec![9, 8, 7]);
    }

    #[test]
    fn test_zero_and_empty() {
        assert!(rank(pairs(), 0, SelectionPolicy::DedupThenTruncate).is_empty());
        assert!(rank(pairs(), 0, SelectionPolicy::TruncateThenDedup).is_empty());
        assert!(rank(Vec::new(), 5, SelectionPolicy::DedupThenTruncate).is_empty());
    }

    #[test]
    fn test_top_n_larger_than_distinct_movies() {
        let ranked = rank(pairs(), 50, SelectionPolicy::DedupThenTruncate);
        assert_eq!(ids(&ranked), vec![1, 2, 3, 4]);
    }
}

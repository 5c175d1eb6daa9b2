//! Core domain types for the MovieLens dataset.
//!
//! This module defines the Catalog (movies) and the Rating Store (ratings)
//! and the `DataIndex` that holds both in memory. Everything in here is
//! built once at startup and then only read.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user (`userId` column)
pub type UserId = u32;

/// Unique identifier for a movie (`movieId` column)
pub type MovieId = u32;

/// Lowest rating value accepted in the Rating Store
pub const MIN_RATING: f32 = 0.5;

/// Highest rating value accepted in the Rating Store
pub const MAX_RATING: f32 = 5.0;

// =============================================================================
// Movie-related Types
// =============================================================================

/// Represents a movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    pub year: Option<u16>,
    /// Pipe-separated genres from `movies.csv`, kept verbatim.
    ///
    /// Only used for display; the collaborative path never looks at them.
    pub genres: Vec<String>,
}

// =============================================================================
// Rating Type
// =============================================================================

/// Represents a single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0 in half-star steps
    pub rating: f32,
    /// Unix timestamp when rating was made (0 when the column is absent)
    pub timestamp: i64,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed statistics for a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovieStats {
    pub avg_rating: f32,
    pub rating_count: u32,
    /// Popularity score derived from rating count and average
    pub popularity_score: f32,
}

// =============================================================================
// DataIndex - Rating Store + Catalog
// =============================================================================

/// The in-memory Rating Store and Catalog.
///
/// Movies and ratings are kept in file order. The Neighbor Selector relies
/// on rating order when it enumerates a bounded prefix of users, and the
/// orchestrator walks the catalog in file order so ties rank stably.
#[derive(Debug)]
pub struct DataIndex {
    // Catalog
    pub(crate) movies: Vec<Movie>,
    /// Position of each movie inside `movies`
    pub(crate) movie_positions: HashMap<MovieId, usize>,
    /// Exact title -> first movie id carrying that title
    pub(crate) title_index: HashMap<String, MovieId>,

    // Rating Store
    pub(crate) ratings: Vec<Rating>,
    /// Positions into `ratings` for each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<usize>>,

    // Precomputed statistics
    pub(crate) movie_stats: HashMap<MovieId, MovieStats>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            movie_positions: HashMap::new(),
            title_index: HashMap::new(),
            ratings: Vec::new(),
            movie_ratings: HashMap::new(),
            movie_stats: HashMap::new(),
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Resolve an exact title to its movie id.
    ///
    /// When the catalog carries the same title twice, the first row wins.
    pub fn movie_id_for_title(&self, title: &str) -> Option<MovieId> {
        self.title_index.get(title).copied()
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Each distinct title once, in catalog order, paired with the id it
    /// resolves to.
    pub fn unique_titles(&self) -> impl Iterator<Item = (&str, MovieId)> + '_ {
        self.movies.iter().filter_map(|movie| {
            let resolved = self.movie_id_for_title(&movie.title)?;
            (resolved == movie.id).then_some((movie.title.as_str(), movie.id))
        })
    }

    /// All ratings in file order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> Vec<&Rating> {
        self.movie_ratings
            .get(&movie_id)
            .map(|positions| positions.iter().map(|&pos| &self.ratings[pos]).collect())
            .unwrap_or_default()
    }

    /// Get precomputed statistics for a movie
    pub fn get_movie_stats(&self, movie_id: MovieId) -> Option<&MovieStats> {
        self.movie_stats.get(&movie_id)
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then the rest in
    /// catalog order.
    pub fn search_titles(&self, query: &str) -> Vec<&Movie> {
        let query = query.to_lowercase();
        let mut matches: Vec<(u8, &Movie)> = self
            .movies
            .iter()
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if title == query {
                    Some((0, movie))
                } else if title.contains(&query) {
                    Some((1, movie))
                } else {
                    None
                }
            })
            .collect();
        matches.sort_by_key(|(rank, _)| *rank);
        matches.into_iter().map(|(_, movie)| movie).collect()
    }

    // Mutators - used while the index is being built

    /// Insert a movie into the catalog.
    ///
    /// Returns `false` (and leaves the catalog unchanged) if the id is
    /// already present.
    pub fn insert_movie(&mut self, movie: Movie) -> bool {
        if self.movie_positions.contains_key(&movie.id) {
            return false;
        }
        self.title_index
            .entry(movie.title.clone())
            .or_insert(movie.id);
        self.movie_positions.insert(movie.id, self.movies.len());
        self.movies.push(movie);
        true
    }

    /// Append a rating to the store and update the per-movie index
    pub fn insert_rating(&mut self, rating: Rating) {
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(self.ratings.len());
        self.ratings.push(rating);
    }

    /// Get counts for debugging/validation: (distinct users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let users: std::collections::HashSet<UserId> =
            self.ratings.iter().map(|r| r.user_id).collect();
        (users.len(), self.movies.len(), self.ratings.len())
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}

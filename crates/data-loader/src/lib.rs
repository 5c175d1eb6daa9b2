//! # Data Loader Crate
//!
//! Loads the MovieLens `movies.csv` / `ratings.csv` tables into an
//! immutable in-memory index: the Catalog and the Rating Store that the
//! recommender reads at serving time.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, DataIndex)
//! - **parser**: Parse CSV files into Rust structs
//! - **index**: Build the index, statistics and integrity checks
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("resources/data"))?;
//! let toy_story = index.movie_id_for_title("Toy Story (1995)");
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use index::{MOVIES_FILE, RATINGS_FILE};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    DataIndex,
    MovieStats,
    MIN_RATING,
    MAX_RATING,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_story() -> Movie {
        Movie {
            id: 1,
            title: "Toy Story (1995)".to_string(),
            year: Some(1995),
            genres: vec!["Animation".to_string(), "Children".to_string()],
        }
    }

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        assert_eq!(index.counts(), (0, 0, 0));
    }

    #[test]
    fn test_insert_movie() {
        let mut index = DataIndex::new();

        assert!(index.insert_movie(toy_story()));
        assert!(!index.insert_movie(toy_story()), "duplicate id is rejected");

        let retrieved = index.get_movie(1).unwrap();
        assert_eq!(retrieved.year, Some(1995));
        assert_eq!(index.movie_id_for_title("Toy Story (1995)"), Some(1));
        assert_eq!(index.movies().len(), 1);
    }

    #[test]
    fn test_insert_rating_keeps_file_order() {
        let mut index = DataIndex::new();
        index.insert_movie(toy_story());

        for (user_id, value) in [(3, 4.0), (1, 5.0), (2, 0.5)] {
            index.insert_rating(Rating {
                user_id,
                movie_id: 1,
                rating: value,
                timestamp: 0,
            });
        }

        let users: Vec<UserId> = index.ratings().iter().map(|r| r.user_id).collect();
        assert_eq!(users, vec![3, 1, 2]);
        assert_eq!(index.get_movie_ratings(1).len(), 3);
    }

    #[test]
    fn test_search_titles_exact_first() {
        let mut index = DataIndex::new();
        for (id, title) in [(1, "Heat (1995)"), (2, "Heat"), (3, "Toy Story (1995)")] {
            index.insert_movie(Movie {
                id,
                title: title.to_string(),
                year: None,
                genres: Vec::new(),
            });
        }

        let found: Vec<MovieId> = index.search_titles("heat").iter().map(|m| m.id).collect();
        assert_eq!(found, vec![2, 1]);
        assert!(index.search_titles("jumanji").is_empty());
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_movie(999).is_none());
        assert!(index.movie_id_for_title("Nonexistent Movie (0000)").is_none());
        assert!(index.get_movie_ratings(999).is_empty());
        assert!(index.get_movie_stats(999).is_none());
    }
}

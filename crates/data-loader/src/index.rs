//! DataIndex building and indexing logic.
//!
//! Builds the DataIndex from parsed records:
//! - Catalog and Rating Store, both in file order
//! - Per-movie statistics (parallel, via Rayon)
//! - Integrity checks

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// File name of the catalog inside a data directory
pub const MOVIES_FILE: &str = "movies.csv";

/// File name of the rating table inside a data directory
pub const RATINGS_FILE: &str = "ratings.csv";

impl DataIndex {
    /// Load the Catalog and Rating Store from a directory holding
    /// `movies.csv` and `ratings.csv`.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Build the index (catalog, rating store)
    /// 3. Compute movie statistics
    /// 4. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);

        let (movies, ratings) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies, {} ratings", movies.len(), ratings.len());

        let index = Self::from_records(movies, ratings)?;
        info!("DataIndex successfully built and validated");
        Ok(index)
    }

    /// Build a validated index from already parsed records.
    pub fn from_records(movies: Vec<Movie>, ratings: Vec<Rating>) -> Result<Self> {
        let mut index = DataIndex::new();

        for movie in movies {
            let id = movie.id;
            let title = movie.title.clone();
            if let Some(existing) = index.movie_id_for_title(&title) {
                warn!(
                    "Title {:?} appears more than once (movies {} and {}); lookups use {}",
                    title, existing, id, existing
                );
            }
            if !index.insert_movie(movie) {
                warn!("Duplicate movieId {} ignored", id);
            }
        }

        for rating in ratings {
            index.insert_rating(rating);
        }

        index.compute_movie_stats();
        index.validate()?;
        Ok(index)
    }

    /// Compute aggregate statistics for all rated movies
    pub fn compute_movie_stats(&mut self) {
        let ratings = &self.ratings;
        self.movie_stats = self
            .movie_ratings
            .par_iter()
            .map(|(&movie_id, positions)| {
                let rating_count = positions.len() as u32;
                let avg_rating = if rating_count > 0 {
                    let total: f32 = positions.iter().map(|&pos| ratings[pos].rating).sum();
                    total / rating_count as f32
                } else {
                    0.0
                };

                (
                    movie_id,
                    MovieStats {
                        avg_rating,
                        rating_count,
                        popularity_score: compute_popularity_score(avg_rating, rating_count),
                    },
                )
            })
            .collect();
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - All rating.movie_id references exist in the catalog
    /// - Ratings are in the valid range (0.5 - 5.0)
    pub fn validate(&self) -> Result<()> {
        for rating in &self.ratings {
            if !self.movie_positions.contains_key(&rating.movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: rating.movie_id,
                });
            }
            if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// avg_rating * ln(rating_count + 1): rewards both high ratings and many ratings
fn compute_popularity_score(avg_rating: f32, rating_count: u32) -> f32 {
    avg_rating * (rating_count as f32 + 1.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn movie(id: MovieId, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year: None,
            genres: Vec::new(),
        }
    }

    fn rating(user_id: UserId, movie_id: MovieId, rating: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating,
            timestamp: 0,
        }
    }

    #[test]
    fn test_popularity_score() {
        let few = compute_popularity_score(4.5, 10);
        let many = compute_popularity_score(3.5, 1000);

        assert!(few > 0.0);
        assert!(many > few);
        assert_eq!(compute_popularity_score(4.0, 0), 0.0);
    }

    #[test]
    fn test_from_records_computes_stats() {
        let index = DataIndex::from_records(
            vec![movie(1, "A (2000)"), movie(2, "B (2001)")],
            vec![rating(1, 1, 4.0), rating(2, 1, 5.0), rating(1, 2, 0.5)],
        )
        .unwrap();

        let stats = index.get_movie_stats(1).unwrap();
        assert_eq!(stats.rating_count, 2);
        assert!((stats.avg_rating - 4.5).abs() < 1e-6);
        assert_eq!(index.counts(), (2, 2, 3));
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let index = DataIndex::from_records(
            vec![movie(5, "Same (1990)"), movie(9, "Same (1990)"), movie(2, "Other")],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(index.movie_id_for_title("Same (1990)"), Some(5));
        let titles: Vec<_> = index.unique_titles().collect();
        assert_eq!(titles, vec![("Same (1990)", 5), ("Other", 2)]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let err = DataIndex::from_records(vec![movie(1, "A")], vec![rating(1, 1, 5.5)])
            .unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));

        let err = DataIndex::from_records(vec![movie(1, "A")], vec![rating(1, 1, 0.0)])
            .unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_unknown_movie() {
        let err = DataIndex::from_records(vec![movie(1, "A")], vec![rating(1, 42, 3.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingReference { id: 42, .. }
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = std::env::temp_dir().join(format!("data-loader-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(MOVIES_FILE),
            "movieId,title,genres\n1,Toy Story (1995),Animation\n2,Jumanji (1995),Adventure\n",
        )
        .unwrap();
        fs::write(
            dir.join(RATINGS_FILE),
            "userId,movieId,rating,timestamp\n1,1,4.0,1\n1,2,3.5,2\n2,1,5.0,3\n",
        )
        .unwrap();

        let index = DataIndex::load_from_files(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(index.counts(), (2, 2, 3));
        assert_eq!(index.movie_id_for_title("Jumanji (1995)"), Some(2));
        assert_eq!(index.ratings()[2].user_id, 2);
    }

    #[test]
    fn test_load_from_missing_dir() {
        let err = DataIndex::load_from_files(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}

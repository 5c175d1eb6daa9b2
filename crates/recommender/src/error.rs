//! Failures surfaced by the orchestrator.
//!
//! Unknown titles and users the model never saw are not failures; they are
//! skipped and reported on the result instead.

use data_loader::{MovieId, UserId};
use neighbors::NeighborError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("At most {max} favourite movies are accepted, got {given}")]
    TooManyFavorites { given: usize, max: usize },

    #[error("Model produced a non-finite estimate for user {user_id}, movie {movie_id}")]
    NonFiniteEstimate { user_id: UserId, movie_id: MovieId },
}

impl From<NeighborError> for RecommendError {
    fn from(err: NeighborError) -> Self {
        match err {
            NeighborError::NonFiniteEstimate { user_id, movie_id } => {
                RecommendError::NonFiniteEstimate { user_id, movie_id }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

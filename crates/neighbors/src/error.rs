use data_loader::{MovieId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeighborError {
    #[error("Model produced a non-finite estimate for user {user_id}, movie {movie_id}")]
    NonFiniteEstimate { user_id: UserId, movie_id: MovieId },
}

pub type Result<T> = std::result::Result<T, NeighborError>;

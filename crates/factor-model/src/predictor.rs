//! The inference seam shared by the neighbor selector and the orchestrator.

use data_loader::{MovieId, UserId};

/// A single rating estimate for a (user, movie) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Estimated rating, already clamped to the model's rating scale
    pub estimate: f32,
    /// Whether the user had learned parameters
    pub user_known: bool,
    /// Whether the movie had learned parameters
    pub item_known: bool,
}

impl Prediction {
    /// True when both sides were known and the full model was applied
    pub fn is_full(&self) -> bool {
        self.user_known && self.item_known
    }
}

/// Anything that can estimate ratings for arbitrary (user, movie) pairs.
///
/// Must answer for pairs never seen in training; unknown sides degrade
/// the estimate rather than fail.
pub trait RatingPredictor: Send + Sync {
    /// Estimate how `user_id` would rate `movie_id`
    fn predict(&self, user_id: UserId, movie_id: MovieId) -> Prediction;

    /// Whether `user_id` was part of the training set
    fn knows_user(&self, user_id: UserId) -> bool;

    /// Every user of the training set, in a stable order
    fn known_users(&self) -> &[UserId];
}

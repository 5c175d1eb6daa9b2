//! Neighbor Selector - "who would love this movie?"
//!
//! ## Algorithm
//! 1. Enumerate the user universe (see [`UserUniverse`])
//! 2. For each favourite movie, estimate its rating for every universe user
//! 3. Keep the `neighbors_per_item` users with the highest estimates
//! 4. Concatenate the per-movie lists; a user picked for two favourites
//!    appears twice, which weights their predictions later on

use crate::error::{NeighborError, Result};
use crate::universe::UserUniverse;
use data_loader::{DataIndex, MovieId, UserId};
use factor_model::{Prediction, RatingPredictor};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Users kept per favourite movie by default
pub const DEFAULT_NEIGHBORS_PER_ITEM: usize = 10;

/// Finds the users predicted to rate given movies most highly
#[derive(Clone)]
pub struct NeighborSelector {
    data_index: Arc<DataIndex>,
    predictor: Arc<dyn RatingPredictor>,
    universe: UserUniverse,
    neighbors_per_item: usize,
    /// Resolved once; the Rating Store never changes
    users: Arc<[UserId]>,
}

impl NeighborSelector {
    /// Create a selector that scores the users of `universe`
    pub fn new(
        data_index: Arc<DataIndex>,
        predictor: Arc<dyn RatingPredictor>,
        universe: UserUniverse,
    ) -> Self {
        let users = universe.users(&data_index).into();
        Self {
            data_index,
            predictor,
            universe,
            neighbors_per_item: DEFAULT_NEIGHBORS_PER_ITEM,
            users,
        }
    }

    /// Configure how many users are kept per movie (default: 10)
    pub fn with_neighbors_per_item(mut self, count: usize) -> Self {
        self.neighbors_per_item = count;
        self
    }

    pub fn universe(&self) -> UserUniverse {
        self.universe
    }

    /// Users scored for every movie, in Rating Store order
    pub fn universe_users(&self) -> &[UserId] {
        &self.users
    }

    /// Estimate `movie_id` for every universe user, in universe order
    pub fn predict_item(&self, movie_id: MovieId) -> Vec<Prediction> {
        self.users
            .par_iter()
            .map(|&user_id| self.predictor.predict(user_id, movie_id))
            .collect()
    }

    /// Top users per movie, concatenated in the order of `movie_ids`.
    ///
    /// Fails on the first non-finite estimate in universe order.
    #[instrument(skip(self, movie_ids), fields(movies = movie_ids.len()))]
    pub fn select(&self, movie_ids: &[MovieId]) -> Result<Vec<UserId>> {
        let per_item = self.neighbors_per_item.min(self.users.len());
        let mut selected = Vec::with_capacity(movie_ids.len().saturating_mul(per_item));

        for &movie_id in movie_ids {
            let mut predictions = self.predict_item(movie_id);
            if let Some(bad) = predictions.iter().find(|p| !p.estimate.is_finite()) {
                return Err(NeighborError::NonFiniteEstimate {
                    user_id: bad.user_id,
                    movie_id,
                });
            }
            // Stable: equal estimates keep universe order
            predictions.sort_by(|a, b| b.estimate.total_cmp(&a.estimate));
            selected.extend(predictions.iter().take(per_item).map(|p| p.user_id));
        }

        debug!(
            "Selected {} neighbors from {} universe users",
            selected.len(),
            self.users.len()
        );
        Ok(selected)
    }
}

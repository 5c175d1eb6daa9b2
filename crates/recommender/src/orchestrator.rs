//! # Recommendation Orchestrator
//!
//! Turns up to three favourite titles into a ranked list of titles:
//! 1. Resolve titles to movie ids (unknown titles are skipped)
//! 2. Pick neighbor users for the resolved movies
//! 3. Score every other catalog title for every neighbor the model knows
//! 4. Rank and select the top N distinct titles

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use data_loader::{DataIndex, MovieId, UserId};
use factor_model::RatingPredictor;
use neighbors::NeighborSelector;

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::selection::{self, ScoredMovie};

/// One recommended title
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    /// Highest estimate the movie received across all neighbors
    pub predicted_rating: f32,
}

/// Outcome of a successful request.
///
/// An empty `recommendations` list is a normal answer, not a failure;
/// `resolved` and `unresolved` tell the caller why it might be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationList {
    /// Ranked best first
    pub recommendations: Vec<Recommendation>,
    /// Movie ids the favourites resolved to, in request order
    pub resolved: Vec<MovieId>,
    /// Favourites with no exact match in the catalog
    pub unresolved: Vec<String>,
    /// Neighbors selected, duplicates included
    pub neighbor_count: usize,
}

impl RecommendationList {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.recommendations.iter().map(|r| r.title.as_str())
    }
}

/// Collaborative-filtering recommender over an immutable dataset and model
#[derive(Clone)]
pub struct Recommender {
    data_index: Arc<DataIndex>,
    predictor: Arc<dyn RatingPredictor>,
    selector: NeighborSelector,
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(
        data_index: Arc<DataIndex>,
        predictor: Arc<dyn RatingPredictor>,
        config: RecommenderConfig,
    ) -> Self {
        let selector = NeighborSelector::new(data_index.clone(), predictor.clone(), config.universe)
            .with_neighbors_per_item(config.neighbors_per_item);
        Self {
            data_index,
            predictor,
            selector,
            config,
        }
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    /// `recommend` with the configured default count
    pub fn recommend_default<S: AsRef<str>>(
        &self,
        favorites: &[S],
    ) -> Result<RecommendationList> {
        self.recommend(favorites, self.config.default_top_n)
    }

    /// Main entry point: recommend up to `top_n` titles for `favorites`.
    ///
    /// Never recommends a title listed in `favorites`.
    #[instrument(skip(self, favorites), fields(favorites = favorites.len()))]
    pub fn recommend<S: AsRef<str>>(
        &self,
        favorites: &[S],
        top_n: usize,
    ) -> Result<RecommendationList> {
        let start_time = Instant::now();

        if favorites.len() > self.config.max_favorites {
            return Err(RecommendError::TooManyFavorites {
                given: favorites.len(),
                max: self.config.max_favorites,
            });
        }

        let (resolved, unresolved) = self.resolve_favorites(favorites);
        debug!("Resolved movie ids {:?}, unresolved {:?}", resolved, unresolved);

        if top_n == 0 || resolved.is_empty() {
            return Ok(RecommendationList {
                resolved,
                unresolved,
                ..Default::default()
            });
        }

        let neighbors = self.selector.select(&resolved)?;
        debug!("Neighbor ids {:?}", neighbors);

        let excluded: HashSet<&str> = favorites.iter().map(|f| f.as_ref()).collect();
        let scored = self.score_catalog(&neighbors, &excluded)?;
        info!("Scored {} (movie, neighbor) pairs", scored.len());

        let recommendations = self.rank_and_select(scored, top_n);

        info!(
            "Selected {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );
        Ok(RecommendationList {
            recommendations,
            resolved,
            unresolved,
            neighbor_count: neighbors.len(),
        })
    }

    /// Split favourites into resolved movie ids and unknown titles
    fn resolve_favorites<S: AsRef<str>>(&self, favorites: &[S]) -> (Vec<MovieId>, Vec<String>) {
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for title in favorites {
            let title = title.as_ref();
            match self.data_index.movie_id_for_title(title) {
                Some(movie_id) => resolved.push(movie_id),
                None => unresolved.push(title.to_string()),
            }
        }
        (resolved, unresolved)
    }

    /// Estimate every non-excluded catalog title for every known neighbor.
    ///
    /// Output order is catalog order, then neighbor order, so a stable
    /// sort afterwards is deterministic.
    fn score_catalog(
        &self,
        neighbors: &[UserId],
        excluded: &HashSet<&str>,
    ) -> Result<Vec<ScoredMovie>> {
        let known: Vec<UserId> = neighbors
            .iter()
            .copied()
            .filter(|&user_id| self.predictor.knows_user(user_id))
            .collect();
        if known.len() < neighbors.len() {
            debug!(
                "Skipping {} neighbors unknown to the model",
                neighbors.len() - known.len()
            );
        }
        if known.is_empty() {
            return Ok(Vec::new());
        }

        let movies: Vec<MovieId> = self
            .data_index
            .unique_titles()
            .filter(|(title, _)| !excluded.contains(title))
            .map(|(_, movie_id)| movie_id)
            .collect();

        let per_movie = movies
            .par_iter()
            .map(|&movie_id| {
                known
                    .iter()
                    .map(|&user_id| {
                        let prediction = self.predictor.predict(user_id, movie_id);
                        if !prediction.estimate.is_finite() {
                            return Err(RecommendError::NonFiniteEstimate { user_id, movie_id });
                        }
                        Ok(ScoredMovie {
                            movie_id,
                            user_id,
                            estimate: prediction.estimate,
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(per_movie.into_iter().flatten().collect())
    }

    /// Rank scored pairs and attach titles
    fn rank_and_select(&self, scored: Vec<ScoredMovie>, top_n: usize) -> Vec<Recommendation> {
        selection::rank(scored, top_n, self.config.selection)
            .into_iter()
            .filter_map(|s| {
                let movie = self.data_index.get_movie(s.movie_id)?;
                Some(Recommendation {
                    movie_id: s.movie_id,
                    title: movie.title.clone(),
                    predicted_rating: s.estimate,
                })
            })
            .collect()
    }
}

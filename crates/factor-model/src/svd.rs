//! Biased matrix factorization (SVD-style) inference.
//!
//! The parameters are produced offline and persisted as JSON. Inference
//! follows the usual biased formulation:
//!
//! ```text
//! est = mu + b_u + b_i + q_i . p_u
//! ```
//!
//! A user missing from training contributes neither `b_u` nor `p_u`, an
//! unknown movie neither `b_i` nor `q_i`; the dot product only applies when
//! both are known. The result is clamped to the rating scale.

use crate::error::{ModelError, Result};
use crate::predictor::{Prediction, RatingPredictor};
use data_loader::{MAX_RATING, MIN_RATING, MovieId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;
use tracing::info;

/// Inclusive bounds for estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f32,
    pub max: f32,
}

impl RatingScale {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            min: MIN_RATING,
            max: MAX_RATING,
        }
    }
}

/// Learned bias and latent vector for one user or one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    pub id: u32,
    pub bias: f32,
    pub factors: Vec<f32>,
}

/// On-disk form of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvdParameters {
    #[serde(default)]
    pub rating_scale: RatingScale,
    pub global_mean: f32,
    pub n_factors: usize,
    /// Users in training order; `known_users()` reports this order
    pub users: Vec<FactorRow>,
    pub items: Vec<FactorRow>,
}

/// A validated, indexed SVD model ready for inference.
///
/// Immutable after construction and shared across requests.
#[derive(Debug)]
pub struct SvdModel {
    params: SvdParameters,
    user_order: Vec<UserId>,
    user_rows: HashMap<UserId, usize>,
    item_rows: HashMap<MovieId, usize>,
}

impl SvdModel {
    /// Validate parameters and build the lookup tables
    pub fn new(params: SvdParameters) -> Result<Self> {
        let scale = params.rating_scale;
        if !(scale.min.is_finite() && scale.max.is_finite() && scale.min < scale.max) {
            return Err(ModelError::InvalidRatingScale {
                min: scale.min,
                max: scale.max,
            });
        }
        if !params.global_mean.is_finite() {
            return Err(ModelError::NonFiniteMean(params.global_mean));
        }

        let user_rows = index_rows("User", &params.users, params.n_factors)?;
        let item_rows = index_rows("Movie", &params.items, params.n_factors)?;
        let user_order = params.users.iter().map(|row| row.id).collect();

        Ok(Self {
            params,
            user_order,
            user_rows,
            item_rows,
        })
    }

    /// Load a model persisted as JSON
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ModelError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ModelError::Io(e)
            }
        })?;
        let params: SvdParameters = serde_json::from_reader(BufReader::new(file))?;
        let model = Self::new(params)?;

        info!(
            "Loaded SVD model from {:?}: {} users, {} items, {} factors",
            path,
            model.user_rows.len(),
            model.item_rows.len(),
            model.params.n_factors
        );
        Ok(model)
    }

    /// Persist the model as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &self.params)?;
        Ok(())
    }

    pub fn parameters(&self) -> &SvdParameters {
        &self.params
    }

    pub fn n_factors(&self) -> usize {
        self.params.n_factors
    }

    pub fn item_count(&self) -> usize {
        self.item_rows.len()
    }

    pub fn knows_item(&self, movie_id: MovieId) -> bool {
        self.item_rows.contains_key(&movie_id)
    }

    fn user_row(&self, user_id: UserId) -> Option<&FactorRow> {
        self.user_rows.get(&user_id).map(|&i| &self.params.users[i])
    }

    fn item_row(&self, movie_id: MovieId) -> Option<&FactorRow> {
        self.item_rows.get(&movie_id).map(|&i| &self.params.items[i])
    }
}

impl RatingPredictor for SvdModel {
    fn predict(&self, user_id: UserId, movie_id: MovieId) -> Prediction {
        let user = self.user_row(user_id);
        let item = self.item_row(movie_id);

        let mut estimate = self.params.global_mean;
        if let Some(user) = user {
            estimate += user.bias;
        }
        if let Some(item) = item {
            estimate += item.bias;
        }
        if let (Some(user), Some(item)) = (user, item) {
            estimate += dot(&user.factors, &item.factors);
        }

        Prediction {
            user_id,
            movie_id,
            estimate: self.params.rating_scale.clamp(estimate),
            user_known: user.is_some(),
            item_known: item.is_some(),
        }
    }

    fn knows_user(&self, user_id: UserId) -> bool {
        self.user_rows.contains_key(&user_id)
    }

    fn known_users(&self) -> &[UserId] {
        &self.user_order
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn index_rows(
    entity: &'static str,
    rows: &[FactorRow],
    n_factors: usize,
) -> Result<HashMap<u32, usize>> {
    let mut positions = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        if row.factors.len() != n_factors {
            return Err(ModelError::DimensionMismatch {
                entity,
                id: row.id,
                expected: n_factors,
                found: row.factors.len(),
            });
        }
        if !row.bias.is_finite() || row.factors.iter().any(|f| !f.is_finite()) {
            return Err(ModelError::NonFiniteParameter { entity, id: row.id });
        }
        if positions.insert(row.id, pos).is_some() {
            return Err(ModelError::DuplicateId { entity, id: row.id });
        }
    }
    Ok(positions)
}

//! # Factor Model Crate
//!
//! The Latent Factor Model behind collaborative filtering: a pre-trained
//! biased matrix factorization loaded once at startup and shared read-only
//! by every request.
//!
//! - **predictor**: the `RatingPredictor` trait and `Prediction`
//! - **svd**: persisted parameters, validation and inference
//! - **error**: `ModelError`
//!
//! Training happens offline; this crate only loads and evaluates.

pub mod error;
pub mod predictor;
pub mod svd;

pub use error::{ModelError, Result};
pub use predictor::{Prediction, RatingPredictor};
pub use svd::{FactorRow, RatingScale, SvdModel, SvdParameters};

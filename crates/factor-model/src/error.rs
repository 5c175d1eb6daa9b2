//! Errors raised while loading or validating a trained factor model.

use thiserror::Error;

/// Errors that can occur when loading a persisted model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error while reading model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model file: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid rating scale: min {min}, max {max}")]
    InvalidRatingScale { min: f32, max: f32 },

    #[error("{entity} {id} has {found} factors, expected {expected}")]
    DimensionMismatch {
        entity: &'static str,
        id: u32,
        expected: usize,
        found: usize,
    },

    #[error("Global mean {0} is not finite")]
    NonFiniteMean(f32),

    #[error("{entity} {id} has a non-finite parameter")]
    NonFiniteParameter { entity: &'static str, id: u32 },

    #[error("{entity} {id} appears more than once")]
    DuplicateId { entity: &'static str, id: u32 },
}

pub type Result<T> = std::result::Result<T, ModelError>;

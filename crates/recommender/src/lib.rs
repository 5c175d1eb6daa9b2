//! Collaborative-filtering recommendations for a short list of favourite
//! movies.
//!
//! The caller loads the Catalog/Rating Store and the trained model once,
//! builds a [`Recommender`], and then calls [`Recommender::recommend`] per
//! request. Everything shared is read-only, so a `Recommender` can be
//! cloned into as many threads as needed.
//!
//! ```ignore
//! use recommender::{Recommender, RecommenderConfig};
//!
//! let recommender = Recommender::new(data_index, model, RecommenderConfig::default());
//! let list = recommender.recommend(&["Toy Story (1995)", "Jumanji (1995)", "Heat (1995)"], 10)?;
//! for (rank, title) in list.titles().enumerate() {
//!     println!("{}. {}", rank + 1, title);
//! }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod selection;

pub use config::RecommenderConfig;
pub use error::RecommendError;
pub use orchestrator::{Recommendation, RecommendationList, Recommender};
pub use selection::SelectionPolicy;

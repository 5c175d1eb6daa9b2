//! # Neighbors Crate
//!
//! Turns a handful of favourite movies into a list of "taste proxies":
//! the users the factor model predicts would rate those movies highest.
//!
//! ```ignore
//! use neighbors::{NeighborSelector, UserUniverse};
//!
//! let selector = NeighborSelector::new(data_index.clone(), model.clone(), UserUniverse::Full)
//!     .with_neighbors_per_item(10);
//! let users = selector.select(&[1, 2, 6])?;
//! ```

pub mod error;
pub mod universe;
pub mod selector;

pub use error::NeighborError;
pub use selector::{NeighborSelector, DEFAULT_NEIGHBORS_PER_ITEM};
pub use universe::{UserUniverse, DEFAULT_PREFIX_RECORDS};

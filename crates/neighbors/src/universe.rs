//! Which users the Neighbor Selector scores.

use data_loader::{DataIndex, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rating records scanned by the default universe
pub const DEFAULT_PREFIX_RECORDS: usize = 20_000;

/// The population of users that neighbor selection considers.
///
/// Scoring every user for every favourite is the expensive part of a
/// request, so by default only the users found in the first
/// `DEFAULT_PREFIX_RECORDS` rating records take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserUniverse {
    /// Distinct users of the first `n` rating records
    Prefix(usize),
    /// Every user in the Rating Store
    Full,
}

impl UserUniverse {
    /// Distinct users in order of first appearance in the Rating Store
    pub fn users(&self, index: &DataIndex) -> Vec<UserId> {
        let ratings = index.ratings();
        let records = match *self {
            UserUniverse::Prefix(n) => &ratings[..n.min(ratings.len())],
            UserUniverse::Full => ratings,
        };

        let mut seen = HashSet::new();
        records
            .iter()
            .filter(|r| seen.insert(r.user_id))
            .map(|r| r.user_id)
            .collect()
    }
}

impl Default for UserUniverse {
    fn default() -> Self {
        UserUniverse::Prefix(DEFAULT_PREFIX_RECORDS)
    }
}

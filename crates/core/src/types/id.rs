//! Newtype IDs for type-safe catalog references.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a product in the catalog.
///
/// Ids are assigned sequentially from 1 when the catalog is built and are never
/// reused while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// The product shown when no valid id is requested.
    pub const DEFAULT: Self = Self(1);

    /// Create a new ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Error parsing a [`ProductId`] from a query string value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid product id {value:?}: {source}")]
pub struct ParseProductIdError {
    value: String,
    source: ParseIntError,
}

impl FromStr for ProductId {
    type Err = ParseProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|source| ParseProductIdError {
                value: s.to_owned(),
                source,
            })
    }
}

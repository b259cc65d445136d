//! Error types for the Tote engine.

use crate::{ItemId, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All failures an engine operation can report to its caller.
///
/// Storage corruption never reaches callers; unreadable snapshots load as an
/// empty collection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Lifecycle errors
    #[error("engine not initialized: call bootstrap() first")]
    NotInitialized,

    #[error("another collection mutation is in flight")]
    Busy,

    // Validation errors
    #[error("product already saved: {0}")]
    AlreadyExists(ProductId),

    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("product not found in catalog: {0}")]
    ProductNotFound(ProductId),

    #[error("product lookup failed: {0}")]
    Resolver(String),

    // Remote errors
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("clear failed for {} item(s); collection restored", failures.len())]
    ClearFailed { failures: Vec<ItemFailure> },

    // Unexpected conditions
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// True for failures a later retry may resolve.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Busy)
    }
}

/// A single remote failure collected during a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub item_id: ItemId,
    pub product_id: ProductId,
    pub reason: String,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

//! The outbound cart service seam.
//!
//! The dispatcher relies on exactly one contract: submit a typed mutation,
//! receive a full authoritative cart or an error. The wire format behind it
//! (GraphQL, in the Shopify implementation) is a collaborator detail.

use async_trait::async_trait;
use thiserror::Error;

use crate::mutation::CartMutation;
use crate::snapshot::CartSnapshot;

/// Errors from the external cart service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {0}")]
    GraphQL(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Application-level user error from the mutation (e.g., out of stock).
    #[error("User error: {0}")]
    UserError(String),
}

/// External cart service: one request per mutation descriptor, each
/// returning the full authoritative cart or an error.
#[async_trait]
pub trait CartService {
    /// Apply one mutation and return the resulting authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails in transit or the
    /// service rejects the mutation.
    async fn apply(&self, mutation: &CartMutation) -> Result<CartSnapshot, ServiceError>;

    /// Fetch the current authoritative cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails.
    async fn fetch(&self) -> Result<Option<CartSnapshot>, ServiceError>;
}

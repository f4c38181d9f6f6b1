//! Unified error type for cart operations.
//!
//! Validation errors are rejected synchronously at `submit`; network and
//! service errors come back through `settle`'s `Result` - the same channel
//! the caller used - never thrown across component boundaries.

use thiserror::Error;

use crate::mutation::ValidationError;
use crate::service::ServiceError;

/// Errors surfaced to callers of the cart mutation layer.
#[derive(Debug, Error)]
pub enum CartError {
    /// Malformed descriptor, rejected before submission; never reaches the
    /// network.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request failed or the server returned application-level errors.
    /// The affected projections have been rolled back.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

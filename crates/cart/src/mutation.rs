//! Mutation descriptors: immutable values describing one requested change.
//!
//! Construction is pure and synchronous; descriptors carry no network
//! concerns. Validation happens before any projection write or network call,
//! so a malformed descriptor never reaches the wire.

use thiserror::Error;
use wildroot_core::{LineId, MerchandiseId};

use crate::projection::{Patch, ProjectionKey};

/// Validation errors for malformed descriptors, rejected synchronously at
/// the call site.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity must be a non-negative integer.
    #[error("Quantity must not be negative (got {0})")]
    NegativeQuantity(i64),

    /// A remove must name at least one line.
    #[error("Line ID list must not be empty")]
    EmptyLineIds,

    /// Identity strings are opaque but never blank.
    #[error("Identity must not be empty")]
    EmptyIdentity,
}

/// One requested cart change: kind + target + payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    /// Add merchandise to the cart (a new line, or merged server-side into
    /// an existing line for the same variant).
    LinesAdd {
        /// Product variant to add.
        merchandise_id: MerchandiseId,
        /// Quantity to add.
        quantity: i64,
    },
    /// Set the absolute quantity of an existing line. Quantity 0 is
    /// semantically equivalent to removal.
    LinesUpdate {
        /// Target line.
        line_id: LineId,
        /// New absolute quantity.
        quantity: i64,
    },
    /// Remove lines from the cart.
    LinesRemove {
        /// Target lines.
        line_ids: Vec<LineId>,
    },
    /// Replace the cart's discount codes.
    DiscountCodesUpdate {
        /// The full desired code list (empty clears all codes).
        codes: Vec<String>,
    },
}

impl CartMutation {
    /// Check the descriptor's preconditions.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a negative quantity, an empty
    /// line-id list, or a blank identity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::LinesAdd {
                merchandise_id,
                quantity,
            } => {
                if merchandise_id.as_str().is_empty() {
                    return Err(ValidationError::EmptyIdentity);
                }
                check_quantity(*quantity)
            }
            Self::LinesUpdate { line_id, quantity } => {
                if line_id.as_str().is_empty() {
                    return Err(ValidationError::EmptyIdentity);
                }
                check_quantity(*quantity)
            }
            Self::LinesRemove { line_ids } => {
                if line_ids.is_empty() {
                    return Err(ValidationError::EmptyLineIds);
                }
                if line_ids.iter().any(|id| id.as_str().is_empty()) {
                    return Err(ValidationError::EmptyIdentity);
                }
                Ok(())
            }
            Self::DiscountCodesUpdate { .. } => Ok(()),
        }
    }

    /// The projection patches this descriptor predicts, keyed by the
    /// identity each one affects. Derived deterministically from the kind:
    ///
    /// - `LinesUpdate` projects the new quantity (or removal at quantity 0)
    /// - `LinesRemove` projects removal of each named line
    /// - `DiscountCodesUpdate` projects the pending code list on the
    ///   cart-level sentinel
    /// - `LinesAdd` projects nothing: the line does not exist in any
    ///   snapshot yet, so there is no displayed state to override
    #[must_use]
    pub fn predicted_patches(&self) -> Vec<(ProjectionKey, Patch)> {
        match self {
            Self::LinesAdd { .. } => Vec::new(),
            Self::LinesUpdate { line_id, quantity } => {
                let patch = if *quantity == 0 {
                    Patch::Remove
                } else {
                    Patch::Quantity(*quantity)
                };
                vec![(ProjectionKey::Line(line_id.clone()), patch)]
            }
            Self::LinesRemove { line_ids } => line_ids
                .iter()
                .map(|id| (ProjectionKey::Line(id.clone()), Patch::Remove))
                .collect(),
            Self::DiscountCodesUpdate { codes } => {
                let mut seen = std::collections::HashSet::new();
                let deduped: Vec<String> = codes
                    .iter()
                    .filter(|code| seen.insert(code.as_str()))
                    .cloned()
                    .collect();
                vec![(ProjectionKey::Discounts, Patch::Discounts(deduped))]
            }
        }
    }
}

const fn check_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 0 {
        Err(ValidationError::NegativeQuantity(quantity))
    } else {
        Ok(())
    }
}

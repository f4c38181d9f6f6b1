//! Per-identity pending patches: the optimistic rendering overlay.
//!
//! A projection is created the moment a mutation is submitted, before the
//! network call resolves, and destroyed when the dispatcher settles the
//! matching request. It is purely a rendering overlay - never a source of
//! truth, never persisted.

use std::collections::HashMap;

use wildroot_core::LineId;

/// Identity a projection is keyed by: a cart line, or the cart-level
/// sentinel for discount updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectionKey {
    /// A cart line's stable identity.
    Line(LineId),
    /// Cart-level sentinel for discount code updates.
    Discounts,
}

/// A predicted partial state for one identity, valid only until superseded
/// or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// The line is predicted removed; hide it from the rendered list.
    Remove,
    /// The line's displayed quantity is overridden.
    Quantity(i64),
    /// The pending discount code list, for the cart-level sentinel.
    Discounts(Vec<String>),
}

/// In-memory map from identity to predicted patch.
///
/// Holds no validation logic and cannot fail. Exactly one projection is
/// active per identity: a newer submission for the same identity overwrites
/// the previous one (latest user intent wins). Writes are totally ordered by
/// call order; the store is owned by the dispatcher and shared by reference,
/// never through ambient globals.
#[derive(Debug, Default)]
pub struct ProjectionStore {
    entries: HashMap<ProjectionKey, Patch>,
}

impl ProjectionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the projection for `key`.
    ///
    /// Immediately observable by the view model on the next read.
    pub fn set(&mut self, key: ProjectionKey, patch: Patch) {
        self.entries.insert(key, patch);
    }

    /// Remove the projection for `key`. Called only by the dispatcher once
    /// the matching request settles.
    pub fn clear(&mut self, key: &ProjectionKey) {
        self.entries.remove(key);
    }

    /// The current patch for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &ProjectionKey) -> Option<&Patch> {
        self.entries.get(key)
    }

    /// Whether no projections are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

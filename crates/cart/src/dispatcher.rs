//! Cart mutation dispatcher: submission, sequence gating, reconciliation.
//!
//! `submit` writes the predicted projections synchronously, so the view
//! reflects user intent before any network round-trip; `settle` performs the
//! one network call per submission and reconciles the authoritative result.
//!
//! Responses may complete in any order relative to submission order. Two
//! gates keep reordering harmless:
//!
//! - per-identity: each submission records a monotonically increasing
//!   sequence number as the latest issued for every identity it touches; a
//!   settling response may only clear a projection whose latest issued
//!   sequence is its own, so a stale response cannot clobber a fresher
//!   optimistic write.
//! - snapshot installation: a response's cart replaces the installed
//!   snapshot only if its submission is newer than the one that produced the
//!   current snapshot; an out-of-order response's snapshot is discarded as
//!   stale (silently, logged at debug - never a user-visible error).
//!
//! There is no cancellation of in-flight requests and no automatic retry;
//! retry is a user-initiated re-submission.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument, warn};
use wildroot_core::LineId;

use crate::error::CartError;
use crate::mutation::{CartMutation, ValidationError};
use crate::projection::{Patch, ProjectionKey, ProjectionStore};
use crate::service::CartService;
use crate::snapshot::CartSnapshot;
use crate::view::CartView;

/// Ticket for one submitted mutation: the descriptor plus the sequencing
/// data `settle` needs to reconcile its response.
#[derive(Debug)]
pub struct Submission {
    mutation: CartMutation,
    seq: u64,
    keys: Vec<ProjectionKey>,
}

impl Submission {
    /// The descriptor this submission carries.
    #[must_use]
    pub const fn mutation(&self) -> &CartMutation {
        &self.mutation
    }

    /// The submission's sequence number (monotonically increasing).
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Default)]
struct DispatchState {
    /// Last authoritative cart; replaced wholesale, never patched.
    snapshot: Option<CartSnapshot>,
    /// Pending per-identity patches.
    projections: ProjectionStore,
    /// Latest issued submission sequence per identity.
    latest_issued: HashMap<ProjectionKey, u64>,
    /// Next submission sequence to hand out.
    next_seq: u64,
    /// Sequence of the submission whose snapshot is currently installed
    /// (0 = initial load only).
    installed_seq: u64,
}

struct DispatcherInner<S> {
    service: S,
    state: Mutex<DispatchState>,
}

/// Dispatches cart mutations to the external service and owns the
/// authoritative snapshot and the projection overlay.
///
/// The dispatcher is the sole writer of the snapshot; the dispatcher and the
/// UI event handlers calling [`CartDispatcher::submit`] are the only writers
/// of the projection store. Cheap to clone; all clones share state.
pub struct CartDispatcher<S> {
    inner: Arc<DispatcherInner<S>>,
}

impl<S> Clone for CartDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CartService> CartDispatcher<S> {
    /// Create a dispatcher with no snapshot loaded yet.
    #[must_use]
    pub fn new(service: S) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                service,
                state: Mutex::new(DispatchState {
                    next_seq: 1,
                    ..DispatchState::default()
                }),
            }),
        }
    }

    /// Install an authoritative snapshot from an initial load.
    pub fn install_snapshot(&self, snapshot: CartSnapshot) {
        self.lock().snapshot = Some(snapshot);
    }

    /// Fetch the current cart from the service and install it, if one
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Service`] if the fetch fails.
    pub async fn load(&self) -> Result<Option<CartSnapshot>, CartError> {
        let snapshot = self.inner.service.fetch().await?;
        if let Some(ref cart) = snapshot {
            self.install_snapshot(cart.clone());
        }
        Ok(snapshot)
    }

    /// The display-ready cart: the last authoritative snapshot with pending
    /// projections overlaid. Synchronous and non-blocking - the UI never
    /// waits on the network to show predicted state.
    #[must_use]
    pub fn view(&self) -> CartView {
        let state = self.lock();
        state
            .snapshot
            .as_ref()
            .map_or_else(CartView::empty, |snapshot| {
                crate::view::derive(snapshot, &state.projections)
            })
    }

    /// Submit a mutation: validate, assign a sequence number, and write the
    /// predicted projections. Synchronous; fires no network call.
    ///
    /// The returned ticket must be passed to [`CartDispatcher::settle`] to
    /// perform the request - no projection may outlive its triggering
    /// request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a malformed descriptor; nothing is
    /// projected and nothing reaches the network.
    pub fn submit(&self, mutation: CartMutation) -> Result<Submission, ValidationError> {
        mutation.validate()?;

        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        let patches = mutation.predicted_patches();
        let keys: Vec<ProjectionKey> = patches.iter().map(|(key, _)| key.clone()).collect();
        for (key, patch) in patches {
            state.latest_issued.insert(key.clone(), seq);
            state.projections.set(key, patch);
        }

        debug!(seq, ?keys, "Submitted cart mutation");
        Ok(Submission {
            mutation,
            seq,
            keys,
        })
    }

    /// Submit an absolute-quantity update computed from the *currently
    /// displayed* (already optimistic) quantity, clamped at zero.
    ///
    /// Rapid repeated calls accumulate correctly while requests are still in
    /// flight: each call starts from the previous call's prediction, not the
    /// last authoritative quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the line identity is blank.
    pub fn adjust_line(
        &self,
        line_id: &LineId,
        delta: i64,
    ) -> Result<Submission, ValidationError> {
        let displayed = {
            let state = self.lock();
            displayed_quantity(&state, line_id)
        };
        let quantity = (displayed + delta).max(0);
        self.submit(CartMutation::LinesUpdate {
            line_id: line_id.clone(),
            quantity,
        })
    }

    /// Send the submission to the service and reconcile the response.
    ///
    /// On success the authoritative snapshot is installed (unless a newer
    /// submission's snapshot already is) and the submission's projections
    /// are cleared (unless a newer submission for the same identity is still
    /// in flight). On failure the projections are cleared the same gated
    /// way, snapping the affected lines back to the last authoritative
    /// value - no partial state.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Service`] if the request failed or the service
    /// rejected the mutation.
    #[instrument(skip(self, submission), fields(seq = submission.seq))]
    pub async fn settle(&self, submission: Submission) -> Result<CartSnapshot, CartError> {
        let result = self.inner.service.apply(&submission.mutation).await;

        let mut state = self.lock();
        for key in &submission.keys {
            if state.latest_issued.get(key) == Some(&submission.seq) {
                state.projections.clear(key);
                state.latest_issued.remove(key);
            } else {
                debug!(seq = submission.seq, ?key, "Projection superseded, left intact");
            }
        }

        match result {
            Ok(snapshot) => {
                if submission.seq > state.installed_seq {
                    state.snapshot = Some(snapshot.clone());
                    state.installed_seq = submission.seq;
                } else {
                    // Reordered response from an older submission; its cart
                    // predates the one already installed.
                    debug!(
                        seq = submission.seq,
                        installed_seq = state.installed_seq,
                        "Stale response ignored"
                    );
                }
                Ok(snapshot)
            }
            Err(e) => {
                warn!(seq = submission.seq, error = %e, "Cart mutation failed, projections rolled back");
                Err(CartError::Service(e))
            }
        }
    }

    /// Submit and settle in one call, for callers with no interleaved UI
    /// reads.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] for a malformed descriptor or a failed
    /// request.
    pub async fn apply(&self, mutation: CartMutation) -> Result<CartSnapshot, CartError> {
        let submission = self.submit(mutation)?;
        self.settle(submission).await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DispatchState> {
        // Single-threaded event-loop model: the lock is uncontended and a
        // poisoned mutex means a panic already unwound mid-update.
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// The quantity the UI currently shows for a line: its pending projection if
/// one exists, otherwise the authoritative quantity (0 if absent or
/// predicted removed).
fn displayed_quantity(state: &DispatchState, line_id: &LineId) -> i64 {
    let key = ProjectionKey::Line(line_id.clone());
    match state.projections.get(&key) {
        Some(Patch::Quantity(n)) => *n,
        Some(Patch::Remove) => 0,
        Some(Patch::Discounts(_)) | None => state
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.line(line_id))
            .map_or(0, |line| line.quantity),
    }
}

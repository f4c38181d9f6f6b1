//! Wildroot Cart - Optimistic cart mutation layer.
//!
//! Lets the UI reflect the *predicted* outcome of a cart mutation the moment
//! it is submitted, ahead of any server confirmation, then reconciles with
//! the authoritative cart once the Storefront API responds (or rolls back on
//! failure).
//!
//! # Architecture
//!
//! - [`mutation::CartMutation`] - immutable descriptor of one requested change
//! - [`projection::ProjectionStore`] - per-identity pending patches, a pure
//!   rendering overlay that never outlives its triggering request
//! - [`dispatcher::CartDispatcher`] - submits mutations, tracks in-flight
//!   sequence numbers, and reconciles authoritative snapshots
//! - [`view`] - derives the display-ready cart by overlaying projections onto
//!   the last authoritative snapshot
//! - [`shopify::ShopifyCartService`] - the Storefront API client behind the
//!   [`service::CartService`] seam
//!
//! Shopify is the source of truth: snapshots are replaced wholesale on every
//! successful mutation response and never partially mutated here.
//!
//! # Example
//!
//! ```rust,ignore
//! use wildroot_cart::{CartDispatcher, CartMutation, ShopifyCartService};
//!
//! let service = ShopifyCartService::new(&config);
//! let dispatcher = CartDispatcher::new(service);
//!
//! let submission = dispatcher.submit(CartMutation::LinesAdd {
//!     merchandise_id: variant_id,
//!     quantity: 1,
//! })?;
//! // view() already reflects the prediction here
//! let cart = dispatcher.settle(submission).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dispatcher;
pub mod error;
pub mod mutation;
pub mod projection;
pub mod service;
pub mod shopify;
pub mod snapshot;
pub mod view;

pub use dispatcher::{CartDispatcher, Submission};
pub use error::CartError;
pub use mutation::{CartMutation, ValidationError};
pub use projection::{Patch, ProjectionKey, ProjectionStore};
pub use service::{CartService, ServiceError};
pub use shopify::{ShopifyCartService, ShopifyConfig};
pub use snapshot::CartSnapshot;
pub use view::CartView;

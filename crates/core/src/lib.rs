//! Wildroot Core - Shared types library.
//!
//! This crate provides common types used across all Wildroot components:
//! - `cart` - Optimistic cart mutation layer over the Shopify Storefront API
//! - `cli` - Command-line tools for exercising cart operations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and decimal money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Cart inspection and mutation commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a variant to a new cart (prints the cart ID to reuse)
//! wildroot cart add -m gid://shopify/ProductVariant/123 -q 2
//!
//! # Show an existing cart
//! wildroot cart show -c gid://shopify/Cart/abc
//!
//! # Change a line's quantity
//! wildroot cart update -c gid://shopify/Cart/abc -l gid://shopify/CartLine/1 -q 3
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE` - Store domain (e.g. your-store.myshopify.com)
//! - `SHOPIFY_API_VERSION` - Storefront API version (default: 2026-01)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Private Storefront API token

use thiserror::Error;
use wildroot_cart::{CartDispatcher, CartError, CartMutation, ShopifyCartService};
use wildroot_core::{CartId, LineId, MerchandiseId};

use crate::config::{self, ConfigError};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cart(#[from] CartError),

    /// The cart does not exist or has expired.
    #[error("Cart not found: {0}")]
    NotFound(String),
}

fn dispatcher(
    cart_id: Option<&str>,
) -> Result<CartDispatcher<ShopifyCartService>, CartCommandError> {
    let service = ShopifyCartService::new(&config::shopify_from_env()?);
    if let Some(id) = cart_id {
        service.set_cart_id(CartId::new(id));
    }
    Ok(CartDispatcher::new(service))
}

/// Fetch and print a cart.
pub async fn show(cart_id: &str) -> Result<(), CartCommandError> {
    let dispatcher = dispatcher(Some(cart_id))?;
    if dispatcher.load().await?.is_none() {
        return Err(CartCommandError::NotFound(cart_id.to_owned()));
    }
    print_view(&dispatcher);
    Ok(())
}

/// Add a variant to the cart, creating the cart if no ID is given.
pub async fn add(
    cart_id: Option<&str>,
    merchandise_id: &str,
    quantity: i64,
) -> Result<(), CartCommandError> {
    let dispatcher = dispatcher(cart_id)?;
    if cart_id.is_some() {
        dispatcher.load().await?;
    }

    let snapshot = dispatcher
        .apply(CartMutation::LinesAdd {
            merchandise_id: MerchandiseId::new(merchandise_id),
            quantity,
        })
        .await?;

    tracing::info!("Cart ID: {}", snapshot.id);
    print_view(&dispatcher);
    Ok(())
}

/// Set a line's quantity (0 removes the line).
pub async fn update(cart_id: &str, line_id: &str, quantity: i64) -> Result<(), CartCommandError> {
    let dispatcher = dispatcher(Some(cart_id))?;
    dispatcher.load().await?;

    dispatcher
        .apply(CartMutation::LinesUpdate {
            line_id: LineId::new(line_id),
            quantity,
        })
        .await?;

    print_view(&dispatcher);
    Ok(())
}

/// Remove lines from the cart.
pub async fn remove(cart_id: &str, line_ids: &[String]) -> Result<(), CartCommandError> {
    let dispatcher = dispatcher(Some(cart_id))?;
    dispatcher.load().await?;

    dispatcher
        .apply(CartMutation::LinesRemove {
            line_ids: line_ids.iter().map(LineId::new).collect(),
        })
        .await?;

    print_view(&dispatcher);
    Ok(())
}

/// Replace the cart's discount codes.
pub async fn discount(cart_id: &str, codes: &[String]) -> Result<(), CartCommandError> {
    let dispatcher = dispatcher(Some(cart_id))?;
    dispatcher.load().await?;

    dispatcher
        .apply(CartMutation::DiscountCodesUpdate {
            codes: codes.to_vec(),
        })
        .await?;

    print_view(&dispatcher);
    Ok(())
}

/// Print the checkout URL for a cart.
pub async fn checkout(cart_id: &str) -> Result<(), CartCommandError> {
    let dispatcher = dispatcher(Some(cart_id))?;
    if dispatcher.load().await?.is_none() {
        return Err(CartCommandError::NotFound(cart_id.to_owned()));
    }

    match dispatcher.view().checkout_url {
        Some(url) => tracing::info!("Checkout: {url}"),
        None => tracing::warn!("Cart has no checkout URL"),
    }
    Ok(())
}

fn print_view(dispatcher: &CartDispatcher<ShopifyCartService>) {
    let view = dispatcher.view();

    if view.items.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in &view.items {
        let variant = item
            .variant_title
            .as_deref()
            .map(|t| format!(" ({t})"))
            .unwrap_or_default();
        tracing::info!(
            "  {} x{}  {}{}  {}",
            item.title,
            item.quantity,
            item.line_price,
            variant,
            item.id,
        );
    }

    for d in &view.discounts {
        let status = if d.applicable { "applied" } else { "not applicable" };
        tracing::info!("  Discount {}: {}", d.code, status);
    }

    tracing::info!("  {} items, subtotal {}", view.item_count, view.subtotal);
}

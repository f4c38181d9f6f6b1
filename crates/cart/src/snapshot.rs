//! Authoritative cart state as last confirmed by the Storefront API.
//!
//! A [`CartSnapshot`] is replaced wholesale on every successful mutation
//! response and on initial load; the client never patches it piecemeal. It is
//! the source of truth for every field not actively overridden by a pending
//! projection.

use serde::{Deserialize, Serialize};
use wildroot_core::{CartId, LineId, MerchandiseId, Money, ProductId};

/// Selected option on a cart line's variant (e.g., "Size: Large").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Parent product info for cart merchandise, supplied read-only by the
/// authoritative source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineProduct {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
}

/// Merchandise in a cart line (simplified product variant info).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineMerchandise {
    /// Variant ID.
    pub id: MerchandiseId,
    /// Variant title.
    pub title: String,
    /// Variant image URL.
    pub image_url: Option<String>,
    /// Selected options.
    pub selected_options: Vec<SelectedOption>,
    /// Parent product info.
    pub product: CartLineProduct,
}

/// Cost for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineCost {
    /// Price per unit.
    pub amount_per_quantity: Money,
    /// Subtotal (before discounts).
    pub subtotal_amount: Money,
    /// Total (after discounts).
    pub total_amount: Money,
}

/// A line item in the cart.
///
/// A line with quantity 0 is considered removed; the server never returns
/// one, but the invariant matters to the projection overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Stable cart line identity.
    pub id: LineId,
    /// Quantity.
    pub quantity: i64,
    /// Line cost.
    pub cost: CartLineCost,
    /// Product variant.
    pub merchandise: CartLineMerchandise,
}

/// Cart cost summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal before tax/shipping.
    pub subtotal: Money,
    /// Total amount.
    pub total: Money,
    /// Total tax amount.
    pub total_tax: Option<Money>,
}

/// Discount code applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    /// The discount code.
    pub code: String,
    /// Whether the server judged the code applicable.
    pub applicable: bool,
}

/// The cart state as last confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL (opaque redirect, payment flow is external).
    pub checkout_url: String,
    /// Total item quantity.
    pub total_quantity: i64,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Applied discount codes, deduplicated by code string, in the insertion
    /// order of the last authoritative response.
    pub discount_codes: Vec<DiscountCode>,
    /// Cart lines.
    pub lines: Vec<CartLine>,
    /// Cart note.
    pub note: Option<String>,
    /// Creation timestamp (RFC 3339, as transmitted).
    pub created_at: String,
    /// Last update timestamp (RFC 3339, as transmitted).
    pub updated_at: String,
}

impl CartSnapshot {
    /// Find a line by its identity.
    #[must_use]
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Discount codes deduplicated by code string, first occurrence wins.
    #[must_use]
    pub fn deduped_discount_codes(&self) -> Vec<&DiscountCode> {
        let mut seen = std::collections::HashSet::new();
        self.discount_codes
            .iter()
            .filter(|d| seen.insert(d.code.as_str()))
            .collect()
    }
}

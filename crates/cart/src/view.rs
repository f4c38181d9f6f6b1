//! Cart view model: the data actually rendered.
//!
//! [`derive`] is a pure function overlaying the projection store onto the
//! last authoritative snapshot. Line-level feedback is instant; cart-level
//! monetary totals are *not* recomputed optimistically - they keep the last
//! authoritative value until a new snapshot arrives, since the client cannot
//! replicate the server's tax and discount logic. A deliberate
//! accuracy/responsiveness tradeoff: quantities react immediately, money
//! lags by one round trip.

use wildroot_core::Money;

use crate::projection::{Patch, ProjectionKey, ProjectionStore};
use crate::snapshot::{CartLine, CartSnapshot};

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    /// Cart line identity.
    pub id: String,
    /// Product URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Variant title, omitted for the default variant.
    pub variant_title: Option<String>,
    /// Displayed quantity (optimistic if a projection is pending).
    pub quantity: u32,
    /// Unit price, formatted.
    pub price: String,
    /// Line price, formatted. Recomputed as unit price x quantity while a
    /// quantity projection is pending.
    pub line_price: String,
    /// Variant image URL.
    pub image_url: Option<String>,
    /// Selected option pairs (name, value).
    pub options: Vec<(String, String)>,
    /// Whether this line currently shows a predicted, unconfirmed value.
    pub pending: bool,
}

/// Discount code display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountView {
    /// The code string.
    pub code: String,
    /// Whether the server judged the code applicable (false while pending).
    pub applicable: bool,
    /// Whether the code is an unconfirmed optimistic submission.
    pub pending: bool,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Rendered line list (predicted-removed lines are hidden).
    pub items: Vec<CartItemView>,
    /// Authoritative subtotal, formatted. Never recomputed optimistically.
    pub subtotal: String,
    /// Authoritative total item count.
    pub item_count: u32,
    /// Displayed discount codes.
    pub discounts: Vec<DiscountView>,
    /// Checkout URL from the authoritative cart.
    pub checkout_url: Option<String>,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
            discounts: Vec::new(),
            checkout_url: None,
        }
    }
}

/// Derive the display-ready cart from the authoritative snapshot and the
/// pending projections. Pure; no side effects.
#[must_use]
pub fn derive(snapshot: &CartSnapshot, projections: &ProjectionStore) -> CartView {
    let items = snapshot
        .lines
        .iter()
        .filter_map(|line| derive_item(line, projections))
        .collect();

    CartView {
        items,
        subtotal: snapshot.cost.subtotal.display(),
        item_count: u32::try_from(snapshot.total_quantity).unwrap_or(0),
        discounts: derive_discounts(snapshot, projections),
        checkout_url: Some(snapshot.checkout_url.clone()),
    }
}

fn derive_item(line: &CartLine, projections: &ProjectionStore) -> Option<CartItemView> {
    let key = ProjectionKey::Line(line.id.clone());
    let (quantity, line_price, pending) = match projections.get(&key) {
        Some(Patch::Remove) => return None,
        Some(Patch::Quantity(n)) => (
            *n,
            // The authoritative total for this quantity has not arrived yet;
            // predict it from the unit price.
            line.cost.amount_per_quantity.times(*n),
            true,
        ),
        Some(Patch::Discounts(_)) | None => (line.quantity, line.cost.total_amount.clone(), false),
    };

    Some(CartItemView {
        id: line.id.to_string(),
        handle: line.merchandise.product.handle.clone(),
        title: line.merchandise.product.title.clone(),
        variant_title: if line.merchandise.title == "Default Title" {
            None
        } else {
            Some(line.merchandise.title.clone())
        },
        quantity: u32::try_from(quantity).unwrap_or(0),
        price: line.cost.amount_per_quantity.display(),
        line_price: line_price.display(),
        image_url: line.merchandise.image_url.clone(),
        options: line
            .merchandise
            .selected_options
            .iter()
            .map(|option| (option.name.clone(), option.value.clone()))
            .collect(),
        pending,
    })
}

fn derive_discounts(snapshot: &CartSnapshot, projections: &ProjectionStore) -> Vec<DiscountView> {
    if let Some(Patch::Discounts(codes)) = projections.get(&ProjectionKey::Discounts) {
        // Pending update: show the submitted list; carry over applicability
        // for codes the server has already confirmed.
        return codes
            .iter()
            .map(|code| {
                let confirmed = snapshot
                    .discount_codes
                    .iter()
                    .find(|d| &d.code == code)
                    .map(|d| d.applicable);
                DiscountView {
                    code: code.clone(),
                    applicable: confirmed.unwrap_or(false),
                    pending: confirmed.is_none(),
                }
            })
            .collect();
    }

    snapshot
        .deduped_discount_codes()
        .into_iter()
        .map(|d| DiscountView {
            code: d.code.clone(),
            applicable: d.applicable,
            pending: false,
        })
        .collect()
}

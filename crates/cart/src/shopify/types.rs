//! Wire types for Storefront API cart payloads and their conversion into
//! domain snapshots.
//!
//! The API transmits camelCase JSON with decimal amounts as strings; these
//! structs parse that shape directly, so conversion to [`CartSnapshot`] is
//! infallible.

use rust_decimal::Decimal;
use serde::Deserialize;
use wildroot_core::{CartId, LineId, MerchandiseId, Money, ProductId};

use crate::snapshot::{
    CartCost, CartLine, CartLineCost, CartLineMerchandise, CartLineProduct, CartSnapshot,
    DiscountCode, SelectedOption,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency_code: String,
}

impl From<WireMoney> for Money {
    fn from(money: WireMoney) -> Self {
        Self::new(money.amount, money.currency_code)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartCost {
    pub subtotal_amount: WireMoney,
    pub total_amount: WireMoney,
    pub total_tax_amount: Option<WireMoney>,
}

#[derive(Debug, Deserialize)]
pub struct WireDiscountCode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLineCost {
    pub amount_per_quantity: WireMoney,
    pub subtotal_amount: WireMoney,
    pub total_amount: WireMoney,
}

#[derive(Debug, Deserialize)]
pub struct WireImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct WireSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct WireProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMerchandise {
    pub id: String,
    pub title: String,
    pub image: Option<WireImage>,
    #[serde(default)]
    pub selected_options: Vec<WireSelectedOption>,
    pub product: WireProduct,
}

/// A line node from the cart connection. Non-`CartLine` nodes (e.g.
/// `ComponentizableCartLine`) come back without these fields and are
/// filtered out during conversion.
#[derive(Debug, Deserialize)]
pub struct WireLineNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub cost: Option<WireLineCost>,
    #[serde(default)]
    pub merchandise: Option<WireMerchandise>,
}

#[derive(Debug, Deserialize)]
pub struct WireEdge {
    pub node: WireLineNode,
}

#[derive(Debug, Deserialize)]
pub struct WireLineConnection {
    pub edges: Vec<WireEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: String,
    pub checkout_url: String,
    pub created_at: String,
    pub updated_at: String,
    pub note: Option<String>,
    pub total_quantity: i64,
    pub cost: WireCartCost,
    #[serde(default)]
    pub discount_codes: Vec<WireDiscountCode>,
    pub lines: WireLineConnection,
}

/// User error from a cart mutation.
#[derive(Debug, Deserialize)]
pub struct WireUserError {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Mutation payload: the cart plus any user errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMutationPayload {
    pub cart: Option<WireCart>,
    #[serde(default)]
    pub user_errors: Vec<WireUserError>,
}

pub fn convert_cart(cart: WireCart) -> CartSnapshot {
    CartSnapshot {
        id: CartId::new(cart.id),
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal: cart.cost.subtotal_amount.into(),
            total: cart.cost.total_amount.into(),
            total_tax: cart.cost.total_tax_amount.map(Money::from),
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| DiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        lines: cart
            .lines
            .edges
            .into_iter()
            .filter_map(|edge| convert_line(edge.node))
            .collect(),
        note: cart.note,
        created_at: cart.created_at,
        updated_at: cart.updated_at,
    }
}

fn convert_line(node: WireLineNode) -> Option<CartLine> {
    let (id, quantity, cost, merchandise) =
        match (node.id, node.quantity, node.cost, node.merchandise) {
            (Some(id), Some(quantity), Some(cost), Some(merchandise)) => {
                (id, quantity, cost, merchandise)
            }
            _ => return None,
        };

    Some(CartLine {
        id: LineId::new(id),
        quantity,
        cost: CartLineCost {
            amount_per_quantity: cost.amount_per_quantity.into(),
            subtotal_amount: cost.subtotal_amount.into(),
            total_amount: cost.total_amount.into(),
        },
        merchandise: CartLineMerchandise {
            id: MerchandiseId::new(merchandise.id),
            title: merchandise.title,
            image_url: merchandise.image.map(|img| img.url),
            selected_options: merchandise
                .selected_options
                .into_iter()
                .map(|option| SelectedOption {
                    name: option.name,
                    value: option.value,
                })
                .collect(),
            product: CartLineProduct {
                id: ProductId::new(merchandise.product.id),
                handle: merchandise.product.handle,
                title: merchandise.product.title,
            },
        },
    })
}

/// Join user errors into one message for [`crate::ServiceError::UserError`].
pub fn join_user_errors(errors: &[WireUserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

//! GraphQL documents for the Storefront API cart operations.
//!
//! Hand-written documents over a shared cart fragment; every mutation
//! returns the full authoritative cart so the dispatcher can replace its
//! snapshot wholesale.

/// Fields fetched for every cart payload.
const CART_FIELDS: &str = r"
fragment CartFields on Cart {
  id
  checkoutUrl
  createdAt
  updatedAt
  note
  totalQuantity
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
    totalTaxAmount { amount currencyCode }
  }
  discountCodes { code applicable }
  lines(first: 100) {
    edges {
      node {
        ... on CartLine {
          id
          quantity
          cost {
            amountPerQuantity { amount currencyCode }
            subtotalAmount { amount currencyCode }
            totalAmount { amount currencyCode }
          }
          merchandise {
            ... on ProductVariant {
              id
              title
              image { url }
              selectedOptions { name value }
              product { id handle title }
            }
          }
        }
      }
    }
  }
}";

fn with_cart_fields(operation: &str) -> String {
    format!("{operation}\n{CART_FIELDS}")
}

/// Query one cart by ID.
#[must_use]
pub fn get_cart() -> String {
    with_cart_fields(
        r"query GetCart($cartId: ID!) {
  cart(id: $cartId) { ...CartFields }
}",
    )
}

/// Create a cart, optionally with initial lines and discount codes.
#[must_use]
pub fn cart_create() -> String {
    with_cart_fields(
        r"mutation CreateCart($input: CartInput!) {
  cartCreate(input: $input) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}",
    )
}

/// Add lines to an existing cart.
#[must_use]
pub fn cart_lines_add() -> String {
    with_cart_fields(
        r"mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}",
    )
}

/// Update line quantities.
#[must_use]
pub fn cart_lines_update() -> String {
    with_cart_fields(
        r"mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}",
    )
}

/// Remove lines.
#[must_use]
pub fn cart_lines_remove() -> String {
    with_cart_fields(
        r"mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}",
    )
}

/// Replace the cart's discount codes.
#[must_use]
pub fn cart_discount_codes_update() -> String {
    with_cart_fields(
        r"mutation UpdateCartDiscountCodes($cartId: ID!, $discountCodes: [String!]) {
  cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}",
    )
}

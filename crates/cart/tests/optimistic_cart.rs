//! Integration tests for the optimistic cart mutation flow.
//!
//! A scripted in-memory service stands in for the Storefront API; response
//! order is controlled by the order in which submissions are settled, which
//! is exactly how network reordering manifests on the single-threaded event
//! loop.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use wildroot_cart::snapshot::{
    CartCost, CartLine, CartLineCost, CartLineMerchandise, CartLineProduct, CartSnapshot,
    DiscountCode,
};
use wildroot_cart::{CartDispatcher, CartError, CartMutation, CartService, ServiceError};
use wildroot_core::{CartId, LineId, MerchandiseId, Money, ProductId};

// =============================================================================
// Fixtures
// =============================================================================

fn usd(s: &str) -> Money {
    Money::new(s.parse().unwrap(), "USD")
}

fn line(id: &str, quantity: i64, unit: &str) -> CartLine {
    let unit_price = usd(unit);
    CartLine {
        id: LineId::new(id),
        quantity,
        cost: CartLineCost {
            amount_per_quantity: unit_price.clone(),
            subtotal_amount: unit_price.times(quantity),
            total_amount: unit_price.times(quantity),
        },
        merchandise: CartLineMerchandise {
            id: MerchandiseId::new(format!("variant-{id}")),
            title: "Default Title".to_string(),
            image_url: None,
            selected_options: Vec::new(),
            product: CartLineProduct {
                id: ProductId::new(format!("product-{id}")),
                handle: "pressed-fern".to_string(),
                title: "Pressed Fern".to_string(),
            },
        },
    }
}

fn snapshot(lines: Vec<CartLine>) -> CartSnapshot {
    let total_quantity = lines.iter().map(|l| l.quantity).sum();
    let subtotal = lines
        .iter()
        .map(|l| l.cost.total_amount.amount)
        .sum::<rust_decimal::Decimal>();
    CartSnapshot {
        id: CartId::new("gid://shopify/Cart/1"),
        checkout_url: "https://shop.example/checkout".to_string(),
        total_quantity,
        cost: CartCost {
            subtotal: Money::new(subtotal, "USD"),
            total: Money::new(subtotal, "USD"),
            total_tax: None,
        },
        discount_codes: Vec::new(),
        lines,
        note: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

/// Service returning pre-scripted responses in FIFO order. Settling
/// submissions out of submission order replays network reordering.
struct ScriptedService {
    responses: Mutex<VecDeque<Result<CartSnapshot, ServiceError>>>,
}

impl ScriptedService {
    fn new(responses: Vec<Result<CartSnapshot, ServiceError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl CartService for ScriptedService {
    async fn apply(&self, _: &CartMutation) -> Result<CartSnapshot, ServiceError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::NotFound("script exhausted".to_string())))
    }

    async fn fetch(&self) -> Result<Option<CartSnapshot>, ServiceError> {
        Ok(None)
    }
}

fn update(id: &str, quantity: i64) -> CartMutation {
    CartMutation::LinesUpdate {
        line_id: LineId::new(id),
        quantity,
    }
}

fn displayed_quantity(dispatcher: &CartDispatcher<ScriptedService>, id: &str) -> Option<u32> {
    dispatcher
        .view()
        .items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.quantity)
}

// =============================================================================
// Responsiveness
// =============================================================================

#[tokio::test]
async fn view_reflects_prediction_synchronously_after_submit() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    let _submission = dispatcher.submit(update("L1", 5)).unwrap();

    // No settle, no awaiting: the prediction is already visible.
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(5));
    assert!(dispatcher.view().items[0].pending);
}

#[tokio::test]
async fn repeated_identical_updates_collapse_to_one_patch() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    dispatcher.submit(update("L1", 7)).unwrap();
    dispatcher.submit(update("L1", 7)).unwrap();

    // Absolute quantity, not a delta: no double-increment.
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(7));
}

// =============================================================================
// Scenario A: rapid increases, subtotal lags
// =============================================================================

#[tokio::test]
async fn rapid_increases_accumulate_and_subtotal_stays_authoritative() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    dispatcher.adjust_line(&LineId::new("L1"), 1).unwrap();
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(3));

    dispatcher.adjust_line(&LineId::new("L1"), 1).unwrap();
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(4));

    // Line price is predicted, cart subtotal is not.
    let view = dispatcher.view();
    assert_eq!(view.items[0].line_price, "$40.00");
    assert_eq!(view.subtotal, "$20.00");
}

// =============================================================================
// Scenario B: reordered responses for the same line
// =============================================================================

#[tokio::test]
async fn stale_response_does_not_revert_newer_quantity() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![
        // Settled first (the *second* submission's response): qty 4.
        Ok(snapshot(vec![line("L1", 4, "10.00")])),
        // Settled second (the *first* submission's response): qty 3.
        Ok(snapshot(vec![line("L1", 3, "10.00")])),
    ]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    let first = dispatcher.adjust_line(&LineId::new("L1"), 1).unwrap();
    let second = dispatcher.adjust_line(&LineId::new("L1"), 1).unwrap();

    // Network reordering: the second request's response lands first.
    dispatcher.settle(second).await.unwrap();
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(4));

    dispatcher.settle(first).await.unwrap();
    assert_eq!(
        displayed_quantity(&dispatcher, "L1"),
        Some(4),
        "stale first response must not revert the quantity to 3"
    );
}

#[tokio::test]
async fn final_quantity_matches_last_successful_response_in_order() {
    // Responses settle in submission order; the last one wins.
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![
        Ok(snapshot(vec![line("L1", 3, "10.00")])),
        Ok(snapshot(vec![line("L1", 4, "10.00")])),
    ]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    let first = dispatcher.adjust_line(&LineId::new("L1"), 1).unwrap();
    let second = dispatcher.adjust_line(&LineId::new("L1"), 1).unwrap();

    dispatcher.settle(first).await.unwrap();
    // The first response cannot clear the second submission's projection.
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(4));

    dispatcher.settle(second).await.unwrap();
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(4));
    assert!(!dispatcher.view().items[0].pending, "all projections settled");
}

// =============================================================================
// Scenario C: failed removal rolls back
// =============================================================================

#[tokio::test]
async fn failed_remove_restores_the_line() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![Err(
        ServiceError::UserError("Merchandise is out of stock".to_string()),
    )]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    let submission = dispatcher
        .submit(CartMutation::LinesRemove {
            line_ids: vec![LineId::new("L1")],
        })
        .unwrap();

    // Optimistically hidden.
    assert_eq!(displayed_quantity(&dispatcher, "L1"), None);

    let err = dispatcher.settle(submission).await.unwrap_err();
    assert!(matches!(err, CartError::Service(ServiceError::UserError(_))));

    // Snapped back to the last authoritative snapshot, no residual patch.
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(2));
    assert!(!dispatcher.view().items[0].pending);
}

#[tokio::test]
async fn failure_leaves_view_identical_to_last_snapshot() {
    let authoritative = snapshot(vec![line("L1", 2, "10.00"), line("L2", 1, "5.00")]);
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![Err(
        ServiceError::UserError("rejected".to_string()),
    )]));
    dispatcher.install_snapshot(authoritative);
    let before = dispatcher.view();

    let submission = dispatcher.submit(update("L1", 9)).unwrap();
    assert_ne!(dispatcher.view(), before);

    let _ = dispatcher.settle(submission).await;
    assert_eq!(dispatcher.view(), before);
}

// =============================================================================
// Scenario D: optimistic discount codes
// =============================================================================

#[tokio::test]
async fn discount_update_renders_pending_then_confirms() {
    let mut confirmed = snapshot(vec![line("L1", 1, "10.00")]);
    confirmed.discount_codes = vec![DiscountCode {
        code: "SAVE10".to_string(),
        applicable: true,
    }];

    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![Ok(confirmed)]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 1, "10.00")]));

    let submission = dispatcher
        .submit(CartMutation::DiscountCodesUpdate {
            codes: vec!["SAVE10".to_string()],
        })
        .unwrap();

    // Immediately visible as pending on the cart-level sentinel.
    let view = dispatcher.view();
    assert_eq!(view.discounts.len(), 1);
    assert_eq!(view.discounts[0].code, "SAVE10");
    assert!(view.discounts[0].pending);
    assert!(!view.discounts[0].applicable);

    dispatcher.settle(submission).await.unwrap();

    // Authoritative confirmation replaces the pending entry.
    let view = dispatcher.view();
    assert_eq!(view.discounts.len(), 1);
    assert!(!view.discounts[0].pending);
    assert!(view.discounts[0].applicable);
}

// =============================================================================
// Mixed identities and rollback gating
// =============================================================================

#[tokio::test]
async fn concurrent_submissions_for_different_lines_settle_independently() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![
        Ok(snapshot(vec![line("L1", 3, "10.00"), line("L2", 1, "5.00")])),
        Ok(snapshot(vec![line("L1", 3, "10.00"), line("L2", 6, "5.00")])),
    ]));
    dispatcher.install_snapshot(snapshot(vec![
        line("L1", 2, "10.00"),
        line("L2", 1, "5.00"),
    ]));

    let first = dispatcher.submit(update("L1", 3)).unwrap();
    let second = dispatcher.submit(update("L2", 6)).unwrap();

    dispatcher.settle(first).await.unwrap();
    // L2's projection is still pending, L1's is settled.
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(3));
    assert_eq!(displayed_quantity(&dispatcher, "L2"), Some(6));
    let view = dispatcher.view();
    assert!(!view.items[0].pending);
    assert!(view.items[1].pending);

    dispatcher.settle(second).await.unwrap();
    assert_eq!(displayed_quantity(&dispatcher, "L2"), Some(6));
    assert!(!dispatcher.view().items[1].pending);
}

#[tokio::test]
async fn stale_failure_does_not_clear_fresher_projection() {
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![
        Err(ServiceError::UserError("first rejected".to_string())),
        Ok(snapshot(vec![line("L1", 8, "10.00")])),
    ]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));

    let first = dispatcher.submit(update("L1", 5)).unwrap();
    let second = dispatcher.submit(update("L1", 8)).unwrap();

    // The first submission fails while the second is still in flight; the
    // newer optimistic value must survive.
    let _ = dispatcher.settle(first).await;
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(8));

    dispatcher.settle(second).await.unwrap();
    assert_eq!(displayed_quantity(&dispatcher, "L1"), Some(8));
}

#[tokio::test]
async fn validation_error_never_reaches_the_service() {
    // An exhausted script errors on any apply(), so reaching the network
    // would fail the later assertions.
    let dispatcher = CartDispatcher::new(ScriptedService::new(vec![]));
    dispatcher.install_snapshot(snapshot(vec![line("L1", 2, "10.00")]));
    let before = dispatcher.view();

    assert!(dispatcher.submit(update("L1", -2)).is_err());
    assert!(
        dispatcher
            .submit(CartMutation::LinesRemove {
                line_ids: Vec::new()
            })
            .is_err()
    );

    assert_eq!(dispatcher.view(), before);
}

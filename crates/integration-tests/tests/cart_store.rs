//! Cart store flows against the in-memory commerce backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cartwheel_core::{CartError, CartId, CartIdStorage, ErrorCode, VariantId};
use cartwheel_integration_tests::{Operation, item, merchandise, store, store_with_remote_cart};
use rust_decimal::Decimal;

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_first_visit_creates_and_persists_cart() {
    let store = store();
    store.client().queue_cart_id("abc");

    store.initialize().await.unwrap();

    assert_eq!(store.cart_id(), Some(CartId::new("abc")));
    assert_eq!(store.storage().load().unwrap().as_deref(), Some("abc"));
    assert!(store.items().is_empty());
    assert!(!store.is_loading());
    assert_eq!(store.client().calls_to(Operation::CreateCart), 1);
}

#[tokio::test]
async fn test_initialize_then_add_mirrors_to_backend() {
    let store = store();
    store.client().queue_cart_id("abc");
    store.initialize().await.unwrap();

    store.add_item(item("v1", 2, 1200)).await.unwrap();

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);

    let calls = store.client().calls();
    let add = calls
        .iter()
        .find(|c| c.operation == Operation::AddToCart)
        .unwrap();
    assert_eq!(add.cart_id, Some(CartId::new("abc")));
    assert_eq!(add.variant_id, Some(VariantId::new("v1")));
    assert_eq!(add.quantity, Some(2));

    let remote = store.client().cart(&CartId::new("abc")).unwrap();
    assert_eq!(remote.total_quantity, 2);
    assert_eq!(items[0].id, Some(remote.lines[0].id.clone()));
}

#[tokio::test]
async fn test_initialize_restores_stored_cart() {
    let store = store_with_remote_cart("abc", &[("v1", 2), ("v2", 1)]);

    store.initialize().await.unwrap();

    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].variant_id.as_str(), "v1");
    assert_eq!(items[0].quantity, 2);
    assert!(items.iter().all(|i| i.id.is_some()));
    assert_eq!(store.cart_id(), Some(CartId::new("abc")));
    assert_eq!(store.client().calls_to(Operation::CreateCart), 0);
}

#[tokio::test]
async fn test_initialize_replaces_expired_cart() {
    let store = store_with_remote_cart("old", &[("v1", 1)]);
    store.client().expire_cart(&CartId::new("old"));
    store.client().queue_cart_id("new");

    store.initialize().await.unwrap();

    assert_eq!(store.cart_id(), Some(CartId::new("new")));
    assert_eq!(store.storage().load().unwrap().as_deref(), Some("new"));
    assert!(store.items().is_empty());

    let operations: Vec<_> = store.client().calls().iter().map(|c| c.operation).collect();
    assert_eq!(operations, [Operation::GetCart, Operation::CreateCart]);
}

#[tokio::test]
async fn test_initialize_surfaces_create_failure() {
    let store = store();
    store.client().fail(Operation::CreateCart);

    let err = store.initialize().await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::Transport);
    assert!(err.is_retryable());
    assert_eq!(store.cart_id(), None);
    assert_eq!(store.storage().load().unwrap(), None);
    assert!(!store.is_loading());
}

// ============================================================================
// Adding Items
// ============================================================================

#[tokio::test]
async fn test_adding_same_variant_merges() {
    let store = store();
    store.initialize().await.unwrap();

    store.add_item(item("v1", 1, 1200)).await.unwrap();
    store.add_item(item("v1", 1, 1200)).await.unwrap();

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);

    let remote = store.client().cart(&store.cart_id().unwrap()).unwrap();
    assert_eq!(remote.lines.len(), 1);
    assert_eq!(remote.lines[0].quantity, 2);
    assert_eq!(store.client().calls_to(Operation::AddToCart), 2);
}

#[tokio::test]
async fn test_add_opens_cart_and_notifies_subscribers() {
    let store = store();
    store.initialize().await.unwrap();
    let mut rx = store.subscribe();
    rx.mark_unchanged();

    store.add_item(item("v1", 1, 500)).await.unwrap();

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(state.is_open);
    assert!(!state.is_loading);
    assert_eq!(state.subtotal(), Decimal::new(500, 2));
}

#[tokio::test]
async fn test_add_failure_reconciles_with_remote() {
    let store = store_with_remote_cart("abc", &[("v1", 1)]);
    store.initialize().await.unwrap();
    store.client().fail(Operation::AddToCart);

    let err = store.add_item(item("v2", 3, 800)).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].variant_id.as_str(), "v1");
    assert!(store.is_open());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_remote_display_data_wins_after_sync() {
    let store = store();
    store
        .client()
        .add_product(merchandise("v1", "Canvas Tote", 2400));
    store.initialize().await.unwrap();

    store.add_item(item("v1", 1, 0)).await.unwrap();
    assert_eq!(store.items()[0].price, Decimal::ZERO);

    store.sync_from_remote().await.unwrap();

    let items = store.items();
    assert_eq!(items[0].title, "Canvas Tote");
    assert_eq!(items[0].price, Decimal::new(2400, 2));
}

// ============================================================================
// Updating and Removing
// ============================================================================

#[tokio::test]
async fn test_update_quantity_below_one_is_ignored() {
    let store = store();
    store.initialize().await.unwrap();
    store.add_item(item("v1", 3, 100)).await.unwrap();
    store.client().clear_calls();

    store.update_quantity(&VariantId::new("v1"), 0).await.unwrap();
    store.update_quantity(&VariantId::new("v1"), -5).await.unwrap();

    assert_eq!(store.items()[0].quantity, 3);
    assert_eq!(store.client().call_count(), 0);
}

#[tokio::test]
async fn test_update_quantity_sets_remote_line() {
    let store = store();
    store.initialize().await.unwrap();
    store.add_item(item("v1", 1, 100)).await.unwrap();
    let line_id = store.items()[0].id.clone().unwrap();

    store.update_quantity(&VariantId::new("v1"), 5).await.unwrap();

    assert_eq!(store.items()[0].quantity, 5);
    let remote = store.client().cart(&store.cart_id().unwrap()).unwrap();
    assert_eq!(remote.lines[0].quantity, 5);

    let calls = store.client().calls();
    let update = calls
        .iter()
        .find(|c| c.operation == Operation::UpdateCart)
        .unwrap();
    assert_eq!(update.line_ids, vec![line_id]);
    assert_eq!(update.quantity, Some(5));
}

#[tokio::test]
async fn test_update_quantity_failure_reconciles_with_remote() {
    let store = store_with_remote_cart("abc", &[("v1", 1), ("v2", 2)]);
    store.initialize().await.unwrap();
    store.client().fail(Operation::UpdateCart);

    let err = store
        .update_quantity(&VariantId::new("v1"), 7)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    let quantities: Vec<_> = store
        .items()
        .iter()
        .map(|i| (i.variant_id.as_str().to_string(), i.quantity))
        .collect();
    assert_eq!(quantities, [("v1".to_string(), 1), ("v2".to_string(), 2)]);
    assert_eq!(store.client().calls_to(Operation::GetCart), 2);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_remove_item_removes_remote_line() {
    let store = store_with_remote_cart("abc", &[("v1", 1), ("v2", 2)]);
    store.initialize().await.unwrap();

    store.remove_item(&VariantId::new("v1")).await.unwrap();

    assert_eq!(store.items().len(), 1);
    let remote = store.client().cart(&CartId::new("abc")).unwrap();
    assert_eq!(remote.lines.len(), 1);
    assert!(remote.line_for_variant(&VariantId::new("v1")).is_none());
    assert!(remote.line_for_variant(&VariantId::new("v2")).is_some());
}

#[tokio::test]
async fn test_remove_failure_restores_item() {
    let store = store_with_remote_cart("abc", &[("v1", 1), ("v2", 2)]);
    store.initialize().await.unwrap();
    store.client().fail(Operation::RemoveLineItem);

    let err = store.remove_item(&VariantId::new("v1")).await.unwrap_err();

    assert!(err.is_retryable());
    let variants: Vec<_> = store
        .items()
        .iter()
        .map(|i| i.variant_id.as_str().to_string())
        .collect();
    assert_eq!(variants, ["v1", "v2"]);
    assert_eq!(store.client().calls_to(Operation::GetCart), 2);
}

#[tokio::test]
async fn test_remove_unsynced_item_stays_local() {
    let store = store();
    store.initialize().await.unwrap();
    store.set_items(vec![item("v1", 1, 100)]);
    store.client().clear_calls();

    store.remove_item(&VariantId::new("v1")).await.unwrap();

    assert!(store.items().is_empty());
    assert_eq!(store.client().call_count(), 0);
}

// ============================================================================
// Clearing
// ============================================================================

#[tokio::test]
async fn test_clear_empty_cart_makes_no_calls() {
    let store = store();
    store.initialize().await.unwrap();
    store.client().clear_calls();

    store.clear_items().await.unwrap();

    assert_eq!(store.client().call_count(), 0);
}

#[tokio::test]
async fn test_clear_starts_new_cart() {
    let store = store_with_remote_cart("abc", &[("v1", 1), ("v2", 2)]);
    store.initialize().await.unwrap();
    store.client().queue_cart_id("fresh");
    store.client().clear_calls();

    store.clear_items().await.unwrap();

    assert!(store.items().is_empty());
    assert_eq!(store.cart_id(), Some(CartId::new("fresh")));
    assert_eq!(store.storage().load().unwrap().as_deref(), Some("fresh"));

    let calls = store.client().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].operation, Operation::RemoveLineItems);
    assert_eq!(calls[0].line_ids.len(), 2);
    assert_eq!(calls[1].operation, Operation::CreateCart);
    assert!(
        store
            .client()
            .cart(&CartId::new("abc"))
            .unwrap()
            .lines
            .is_empty()
    );
}

#[tokio::test]
async fn test_clear_failure_restores_items() {
    let store = store_with_remote_cart("abc", &[("v1", 1), ("v2", 2)]);
    store.initialize().await.unwrap();
    let before = store.snapshot();
    store.client().fail(Operation::RemoveLineItems);

    let err = store.clear_items().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(store.items(), before.items);
    assert_eq!(store.cart_id(), Some(CartId::new("abc")));
    assert_eq!(store.storage().load().unwrap().as_deref(), Some("abc"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_clear_failure_after_lines_removed_restores_items() {
    let store = store_with_remote_cart("abc", &[("v1", 1), ("v2", 2)]);
    store.initialize().await.unwrap();
    let before = store.snapshot();
    store.client().fail(Operation::CreateCart);

    let err = store.clear_items().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(store.items(), before.items);
    assert_eq!(store.cart_id(), Some(CartId::new("abc")));
    assert_eq!(store.storage().load().unwrap().as_deref(), Some("abc"));
    assert!(!store.is_loading());

    // The old cart's lines are already gone remotely
    let remote = store.client().cart(&CartId::new("abc")).unwrap();
    assert!(remote.lines.is_empty());
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_requires_synchronized_cart() {
    let store = store();

    let err = store.checkout().await.unwrap_err();

    assert!(matches!(err, CartError::MissingCartId));
    assert!(err.is_validation());
    assert_eq!(store.client().call_count(), 0);
}

#[tokio::test]
async fn test_checkout_returns_cart_url() {
    let store = store();
    store.client().queue_cart_id("abc");
    store.initialize().await.unwrap();

    let url = store.checkout().await.unwrap();

    assert_eq!(url, "https://checkout.example/cart/c/abc");
}

#[tokio::test]
async fn test_checkout_for_expired_cart_is_not_found() {
    let store = store();
    store.client().queue_cart_id("abc");
    store.initialize().await.unwrap();
    store.client().expire_cart(&CartId::new("abc"));

    let err = store.checkout().await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::CartNotFound);
}

// ============================================================================
// Loading Flag
// ============================================================================

#[tokio::test]
async fn test_loading_settles_after_concurrent_operations() {
    let store = store();
    store.initialize().await.unwrap();
    let other = store.clone();

    let (a, b) = tokio::join!(
        store.add_item(item("v1", 1, 100)),
        other.add_item(item("v2", 1, 100)),
    );
    a.unwrap();
    b.unwrap();

    assert!(!store.is_loading());
    assert_eq!(store.items().len(), 2);
}

#[tokio::test]
async fn test_loading_cleared_after_failure() {
    let store = store();
    store.initialize().await.unwrap();
    store.client().fail(Operation::AddToCart);
    store.client().fail(Operation::GetCart);

    store.add_item(item("v1", 1, 100)).await.unwrap_err();

    assert!(!store.is_loading());
}

//! Integration tests against a real Storefront API.
//!
//! These tests require:
//! - `SHOPIFY_STORE` and a storefront token in the environment (or `.env`)
//! - `CARTWHEEL_TEST_PRODUCT_HANDLE` naming a product that is for sale
//!
//! Run with: cargo test -p cartwheel-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cartwheel_core::{CartError, CartId, MemoryStorage};
use cartwheel_storefront::config::CartwheelConfig;
use cartwheel_storefront::shopify::StorefrontClient;
use cartwheel_storefront::stores::CartStore;

fn client() -> StorefrontClient {
    let config = CartwheelConfig::from_env().expect("Storefront configuration");
    StorefrontClient::new(&config.shopify).expect("Failed to create Storefront client")
}

fn product_handle() -> String {
    std::env::var("CARTWHEEL_TEST_PRODUCT_HANDLE").expect("CARTWHEEL_TEST_PRODUCT_HANDLE")
}

#[tokio::test]
#[ignore = "Requires Shopify Storefront credentials"]
async fn test_cart_round_trip() {
    let client = client();
    let product = client.product_by_handle(&product_handle()).await.unwrap();
    let variant = product.default_variant().unwrap();

    let store = CartStore::new(client.clone(), MemoryStorage::default());
    store.initialize().await.unwrap();

    store
        .add_item(product.cart_item(variant, 2))
        .await
        .unwrap();
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert!(items[0].id.is_some());

    store.update_quantity(&variant.id, 3).await.unwrap();
    store.sync_from_remote().await.unwrap();
    assert_eq!(store.items()[0].quantity, 3);

    let url = store.checkout().await.unwrap();
    assert!(url.starts_with("https://"));

    store.clear_items().await.unwrap();
    assert!(store.items().is_empty());
}

#[tokio::test]
#[ignore = "Requires Shopify Storefront credentials"]
async fn test_unknown_cart_is_not_found() {
    let client = client();

    let err = client
        .get_cart(&CartId::new("does-not-exist"))
        .await
        .map_err(CartError::from)
        .unwrap_err();

    assert!(matches!(err, CartError::CartNotFound { .. }));
}

#[tokio::test]
#[ignore = "Requires Shopify Storefront credentials"]
async fn test_unknown_product_is_not_found() {
    let err = client()
        .product_by_handle("cartwheel-no-such-product")
        .await
        .map_err(CartError::from)
        .unwrap_err();

    assert!(matches!(err, CartError::ProductNotFound(_)));
}

//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! # Store behaviour against the in-memory backend
//! cargo test -p cartwheel-integration-tests
//!
//! # Live Storefront API tests (needs SHOPIFY_STORE and a storefront token)
//! cargo test -p cartwheel-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - cart store flows against [`FakeCommerce`]
//! - `cart_persistence` - cart id persistence across store instances
//! - `storefront_live` - the real Storefront API

use std::path::Path;
use std::sync::Arc;

use cartwheel_core::{CartItem, MemoryStorage, Price, RemoteMerchandise, VariantId};
use cartwheel_storefront::storage::FileStorage;
use cartwheel_storefront::stores::CartStore;
use cartwheel_storefront::testing::FakeCommerce;
use rust_decimal::Decimal;

pub use cartwheel_storefront::testing::{Call, Operation};

/// Store over the in-memory backend and in-memory storage.
pub type TestStore = CartStore<FakeCommerce, MemoryStorage>;

/// Store over a shared in-memory backend and a cart id file.
pub type FileStore = CartStore<Arc<FakeCommerce>, FileStorage>;

/// Uninitialized store with nothing persisted.
#[must_use]
pub fn store() -> TestStore {
    CartStore::new(FakeCommerce::new(), MemoryStorage::default())
}

/// Store whose storage already points at a remote cart with `lines`.
///
/// The store is not initialized.
#[must_use]
pub fn store_with_remote_cart(opaque: &str, lines: &[(&str, u32)]) -> TestStore {
    let client = FakeCommerce::new();
    client.seed_cart(opaque, lines);
    CartStore::new(client, MemoryStorage::with_cart_id(opaque))
}

/// Store persisting its cart id in `dir`.
///
/// Stores built over the same backend and directory behave like two
/// sessions of the same shopper.
#[must_use]
pub fn file_store(client: &Arc<FakeCommerce>, dir: &Path) -> FileStore {
    CartStore::new(
        Arc::clone(client),
        FileStorage::new(dir.join(cartwheel_core::CART_ID_KEY)),
    )
}

/// Cart item with display data, priced in cents.
#[must_use]
pub fn item(variant: &str, quantity: u32, cents: i64) -> CartItem {
    CartItem {
        title: format!("Product {variant}"),
        variant_title: "Default Title".to_string(),
        price: Decimal::new(cents, 2),
        image: format!("https://cdn.example/{variant}.jpg"),
        ..CartItem::new(variant, quantity)
    }
}

/// Catalog entry for the fake backend, priced in cents.
#[must_use]
pub fn merchandise(variant: &str, title: &str, cents: i64) -> RemoteMerchandise {
    RemoteMerchandise {
        id: VariantId::new(variant),
        title: "Default Title".to_string(),
        price: Price::new(Decimal::new(cents, 2), "USD"),
        image: Some(format!("https://cdn.example/{variant}.jpg")),
        product_title: title.to_string(),
    }
}

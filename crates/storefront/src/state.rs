//! Application state shared across commands.

use std::sync::Arc;

use crate::config::CartwheelConfig;
use crate::shopify::{ShopifyError, StorefrontClient};
use crate::storage::FileStorage;
use crate::stores::{CartStore, NavStore};

/// Cart store backed by Shopify and a cart id file.
pub type StorefrontCart = CartStore<StorefrontClient, FileStorage>;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// Storefront client and the stores built on it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CartwheelConfig,
    storefront: StorefrontClient,
    cart: StorefrontCart,
    nav: NavStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: CartwheelConfig) -> Result<Self, ShopifyError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let cart = CartStore::new(storefront.clone(), FileStorage::new(&config.cart_file));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                cart,
                nav: NavStore::new(),
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &CartwheelConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &StorefrontCart {
        &self.inner.cart
    }

    /// Get a reference to the navigation store.
    #[must_use]
    pub fn nav(&self) -> &NavStore {
        &self.inner.nav
    }
}

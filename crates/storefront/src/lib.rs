//! Cartwheel storefront library.
//!
//! Connects the cart model from `cartwheel_core` to the Shopify Storefront
//! API: the GraphQL client, file-backed cart id storage, and the observable
//! cart and navigation stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod shopify;
pub mod state;
pub mod storage;
pub mod stores;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

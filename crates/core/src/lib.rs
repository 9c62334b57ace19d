//! Cartwheel Core - Shared cart types library.
//!
//! This crate provides the types used across all Cartwheel components:
//! - `storefront` - Shopify Storefront API client and the reactive cart store
//! - `cli` - Terminal front end driving a cart store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no async runtime. Cart state transitions that do not need the network
//! (merging, removal, line id reconciliation) live here as plain methods so
//! they can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, local cart state and remote cart shapes
//! - [`error`] - The [`CartError`] taxonomy shared by every backend
//! - [`commerce`] - The [`CommerceClient`] trait the cart store talks to
//! - [`storage`] - Durable storage for the remote cart id

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commerce;
pub mod error;
pub mod storage;
pub mod types;

pub use commerce::CommerceClient;
pub use error::{CartError, ErrorCode};
pub use storage::{CART_ID_KEY, CartIdStorage, MemoryStorage, NoStorage};
pub use types::*;

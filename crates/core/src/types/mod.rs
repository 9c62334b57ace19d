//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod remote;

pub use cart::{CartItem, CartState};
pub use id::*;
pub use price::Price;
pub use remote::{RemoteCart, RemoteLine, RemoteMerchandise};

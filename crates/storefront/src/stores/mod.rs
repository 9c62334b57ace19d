//! Observable UI stores.

pub mod cart;
pub mod nav;

pub use cart::CartStore;
pub use nav::{NavState, NavStore};

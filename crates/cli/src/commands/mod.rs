//! CLI command implementations.

pub mod cart;

use cartwheel_core::CartError;
use cartwheel_storefront::config::ConfigError;
use cartwheel_storefront::shopify::ShopifyError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Storefront client could not be created or a lookup failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// A cart operation failed.
    #[error("{0} [{code}]", code = .0.code())]
    Cart(#[from] CartError),

    /// The product has no variant with the requested title.
    #[error("Product '{handle}' has no variant titled '{variant}'")]
    VariantNotFound { handle: String, variant: String },

    /// The product has no variants at all.
    #[error("Product '{0}' has no variants")]
    NoVariants(String),
}

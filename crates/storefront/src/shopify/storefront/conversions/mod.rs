//! Type conversion functions for Shopify Storefront API responses.
//!
//! Conversions are strict: a response that decodes but is missing data the
//! cart layer depends on is rejected with [`ShopifyError::Malformed`].

pub mod cart;
pub mod products;

pub use cart::{cart_from_payload, convert_cart};
pub use products::convert_product;

use cartwheel_core::Price;

use super::queries::{ImageFields, MoneyV2};
use crate::shopify::ShopifyError;
use crate::shopify::types::Image;

/// Convert a `MoneyV2` into a decimal price.
fn convert_money(money: MoneyV2) -> Result<Price, ShopifyError> {
    Price::parse(&money.amount, money.currency_code).map_err(|e| {
        ShopifyError::Malformed(format!("invalid amount '{}': {e}", money.amount))
    })
}

fn convert_image(image: ImageFields) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
    }
}

//! Flat shapes of the remote (commerce backend) cart.
//!
//! These mirror the authoritative cart after the backend client has stripped
//! the GraphQL edge/node wrappers. Nothing outside the client edge sees the
//! wire format.

use serde::{Deserialize, Serialize};

use super::id::{CartId, LineId, VariantId};
use super::price::Price;

/// The product variant a remote cart line points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title ("Default Title" for single-variant products).
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Variant image URL.
    pub image: Option<String>,
    /// Parent product title.
    pub product_title: String,
}

/// One line of the remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLine {
    /// Line ID assigned by the backend.
    pub id: LineId,
    /// Quantity.
    pub quantity: u32,
    /// The variant on this line.
    pub merchandise: RemoteMerchandise,
}

/// The commerce backend's authoritative cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCart {
    /// Cart ID (prefixed form).
    pub id: CartId,
    /// Hosted checkout URL.
    pub checkout_url: String,
    /// Total item quantity across lines.
    pub total_quantity: u32,
    /// Cart lines in backend order.
    pub lines: Vec<RemoteLine>,
}

impl RemoteCart {
    /// Find the line holding a variant.
    #[must_use]
    pub fn line_for_variant(&self, variant_id: &VariantId) -> Option<&RemoteLine> {
        self.lines.iter().find(|l| &l.merchandise.id == variant_id)
    }
}

//! The commerce backend contract consumed by the cart store.

use std::future::Future;

use crate::error::CartError;
use crate::types::{CartId, LineId, RemoteCart, VariantId};

/// Remote cart operations.
///
/// Every method validates its id arguments before touching the network and
/// fails with [`CartError::MissingCartId`], [`CartError::MissingVariantId`]
/// or [`CartError::MissingItemId`] when one is blank. Mutations that come
/// back with user errors fail with [`CartError::Protocol`].
pub trait CommerceClient: Send + Sync {
    /// Create an empty remote cart.
    fn create_cart(&self) -> impl Future<Output = Result<RemoteCart, CartError>> + Send;

    /// Fetch a remote cart. Fails with [`CartError::CartNotFound`] when the id
    /// is invalid or the cart has expired.
    fn get_cart(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send;

    /// Add `quantity` of a variant as a new or merged line.
    fn add_to_cart(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send;

    /// Set the quantity of an existing line.
    fn update_cart(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send;

    /// Remove one line.
    fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send;

    /// Remove several lines in one mutation. An empty list returns the
    /// current cart unchanged.
    fn remove_line_items(
        &self,
        cart_id: &CartId,
        line_ids: &[LineId],
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send;

    /// Hosted checkout URL for the cart.
    fn get_checkout_url(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<String, CartError>> + Send;
}

impl<T: CommerceClient> CommerceClient for std::sync::Arc<T> {
    fn create_cart(&self) -> impl Future<Output = Result<RemoteCart, CartError>> + Send {
        (**self).create_cart()
    }

    fn get_cart(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send {
        (**self).get_cart(cart_id)
    }

    fn add_to_cart(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send {
        (**self).add_to_cart(cart_id, variant_id, quantity)
    }

    fn update_cart(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send {
        (**self).update_cart(cart_id, line_id, variant_id, quantity)
    }

    fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send {
        (**self).remove_line_item(cart_id, line_id)
    }

    fn remove_line_items(
        &self,
        cart_id: &CartId,
        line_ids: &[LineId],
    ) -> impl Future<Output = Result<RemoteCart, CartError>> + Send {
        (**self).remove_line_items(cart_id, line_ids)
    }

    fn get_checkout_url(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<String, CartError>> + Send {
        (**self).get_checkout_url(cart_id)
    }
}

/// Reject a blank cart id.
///
/// # Errors
///
/// Returns [`CartError::MissingCartId`] if the opaque part is empty.
pub fn require_cart_id(cart_id: &CartId) -> Result<(), CartError> {
    if cart_id.is_blank() {
        return Err(CartError::MissingCartId);
    }
    Ok(())
}

/// Reject a blank variant id.
///
/// # Errors
///
/// Returns [`CartError::MissingVariantId`] if the id is empty.
pub fn require_variant_id(variant_id: &VariantId) -> Result<(), CartError> {
    if variant_id.is_blank() {
        return Err(CartError::MissingVariantId);
    }
    Ok(())
}

/// Reject blank line ids.
///
/// # Errors
///
/// Returns [`CartError::MissingItemId`] if any id is empty.
pub fn require_line_ids<'a>(line_ids: impl IntoIterator<Item = &'a LineId>) -> Result<(), CartError> {
    if line_ids.into_iter().any(LineId::is_blank) {
        return Err(CartError::MissingItemId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_cart_id() {
        assert!(matches!(
            require_cart_id(&CartId::new("")),
            Err(CartError::MissingCartId)
        ));
        assert!(require_cart_id(&CartId::new("abc")).is_ok());
    }

    #[test]
    fn test_require_variant_id() {
        assert!(matches!(
            require_variant_id(&VariantId::new(" ")),
            Err(CartError::MissingVariantId)
        ));
    }

    #[test]
    fn test_require_line_ids() {
        let ids = [LineId::new("a"), LineId::new("")];
        assert!(matches!(
            require_line_ids(&ids),
            Err(CartError::MissingItemId)
        ));
        assert!(require_line_ids(&[LineId::new("a")]).is_ok());
        assert!(require_line_ids(std::iter::empty()).is_ok());
    }
}

//! Cart type conversion functions.

use cartwheel_core::{CartId, LineId, RemoteCart, RemoteLine, RemoteMerchandise, VariantId};

use super::super::queries::{CartFields, CartLineFields, CartMutationPayload, UserErrorFields};
use super::convert_money;
use crate::shopify::ShopifyError;

/// Convert the `CartFields` fragment into a [`RemoteCart`].
///
/// # Errors
///
/// Returns [`ShopifyError::Malformed`] if a line is not a product variant, or
/// carries a negative quantity or an unparseable price.
pub fn convert_cart(cart: CartFields) -> Result<RemoteCart, ShopifyError> {
    let lines = cart
        .lines
        .edges
        .into_iter()
        .map(|edge| convert_line(edge.node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RemoteCart {
        id: CartId::new(cart.id),
        checkout_url: cart.checkout_url,
        total_quantity: convert_quantity(cart.total_quantity)?,
        lines,
    })
}

fn convert_line(line: CartLineFields) -> Result<RemoteLine, ShopifyError> {
    let malformed = |what: &str| ShopifyError::Malformed(format!("cart line {} {what}", line.id));

    let merchandise = line
        .merchandise
        .ok_or_else(|| malformed("has no merchandise"))?;
    let variant_id = merchandise
        .id
        .ok_or_else(|| malformed("merchandise is not a product variant"))?;
    let price = merchandise
        .price
        .ok_or_else(|| malformed("has no price"))?;

    Ok(RemoteLine {
        id: LineId::new(line.id.clone()),
        quantity: convert_quantity(line.quantity)?,
        merchandise: RemoteMerchandise {
            id: VariantId::new(variant_id),
            title: merchandise.title.unwrap_or_default(),
            price: convert_money(price)?,
            image: merchandise.image.map(|i| i.url),
            product_title: merchandise.product.map(|p| p.title).unwrap_or_default(),
        },
    })
}

fn convert_quantity(quantity: i64) -> Result<u32, ShopifyError> {
    u32::try_from(quantity)
        .map_err(|_| ShopifyError::Malformed(format!("invalid quantity {quantity}")))
}

/// Join mutation user errors into one message.
#[must_use]
pub fn convert_user_errors(errors: Vec<UserErrorFields>) -> String {
    errors
        .into_iter()
        .map(|e| {
            let mut message = e.message;
            if let Some(field) = e.field.filter(|f| !f.is_empty()) {
                message.push_str(&format!(" (field: {})", field.join(".")));
            }
            if let Some(code) = e.code {
                message.push_str(&format!(" [{code}]"));
            }
            message
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Unwrap a cart mutation payload.
///
/// # Errors
///
/// Returns [`ShopifyError::UserError`] if the mutation reported user errors,
/// [`ShopifyError::EmptyResponse`] if it returned no cart, or any error from
/// [`convert_cart`].
pub fn cart_from_payload(
    payload: Option<CartMutationPayload>,
    operation: &'static str,
) -> Result<RemoteCart, ShopifyError> {
    let payload = payload.ok_or(ShopifyError::EmptyResponse(operation))?;

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserError(convert_user_errors(
            payload.user_errors,
        )));
    }

    payload
        .cart
        .ok_or(ShopifyError::EmptyResponse(operation))
        .and_then(convert_cart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn cart_json(lines: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "gid://shopify/Cart/abc?key=123",
            "checkoutUrl": "https://shop.example/cart/c/abc",
            "totalQuantity": 2,
            "lines": { "edges": lines }
        })
    }

    fn variant_line(id: &str, variant: &str, quantity: i64, amount: &str) -> serde_json::Value {
        json!({
            "node": {
                "id": id,
                "quantity": quantity,
                "merchandise": {
                    "id": variant,
                    "title": "Large",
                    "price": { "amount": amount, "currencyCode": "USD" },
                    "image": { "url": "https://cdn.shopify.com/tee.png" },
                    "product": { "title": "Canvas Tote" }
                }
            }
        })
    }

    #[test]
    fn test_convert_cart() {
        let fields: CartFields = serde_json::from_value(cart_json(json!([variant_line(
            "gid://shopify/CartLine/1",
            "gid://shopify/ProductVariant/9",
            2,
            "24.50"
        )])))
        .unwrap();

        let cart = convert_cart(fields).unwrap();

        assert_eq!(cart.id.opaque(), "abc?key=123");
        assert_eq!(cart.total_quantity, 2);
        assert_eq!(cart.lines.len(), 1);

        let line = &cart.lines[0];
        assert_eq!(line.id.as_str(), "gid://shopify/CartLine/1");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.merchandise.id.as_str(), "gid://shopify/ProductVariant/9");
        assert_eq!(line.merchandise.title, "Large");
        assert_eq!(line.merchandise.product_title, "Canvas Tote");
        assert_eq!(line.merchandise.price.amount, Decimal::new(2450, 2));
        assert_eq!(
            line.merchandise.image.as_deref(),
            Some("https://cdn.shopify.com/tee.png")
        );
    }

    #[test]
    fn test_convert_empty_cart() {
        let mut value = cart_json(json!([]));
        value["totalQuantity"] = json!(0);
        let cart = convert_cart(serde_json::from_value(value).unwrap()).unwrap();
        assert!(cart.lines.is_empty());
        assert_eq!(cart.total_quantity, 0);
    }

    #[test]
    fn test_reject_non_variant_merchandise() {
        let fields: CartFields = serde_json::from_value(cart_json(json!([{
            "node": { "id": "gid://shopify/CartLine/1", "quantity": 1, "merchandise": {} }
        }])))
        .unwrap();

        let err = convert_cart(fields).unwrap_err();
        assert!(matches!(err, ShopifyError::Malformed(ref m) if m.contains("not a product variant")));
    }

    #[test]
    fn test_reject_unparseable_price() {
        let fields: CartFields = serde_json::from_value(cart_json(json!([variant_line(
            "gid://shopify/CartLine/1",
            "gid://shopify/ProductVariant/9",
            1,
            "twelve"
        )])))
        .unwrap();

        assert!(matches!(
            convert_cart(fields),
            Err(ShopifyError::Malformed(_))
        ));
    }

    #[test]
    fn test_reject_negative_quantity() {
        let fields: CartFields = serde_json::from_value(cart_json(json!([variant_line(
            "gid://shopify/CartLine/1",
            "gid://shopify/ProductVariant/9",
            -1,
            "1.00"
        )])))
        .unwrap();

        assert!(matches!(
            convert_cart(fields),
            Err(ShopifyError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_edges_fails_to_decode() {
        let result = serde_json::from_value::<CartFields>(json!({
            "id": "gid://shopify/Cart/abc",
            "checkoutUrl": "https://shop.example/cart/c/abc",
            "totalQuantity": 0,
            "lines": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_user_errors() {
        let payload: CartMutationPayload = serde_json::from_value(json!({
            "cart": null,
            "userErrors": [
                { "code": "INVALID", "field": ["lines", "0", "merchandiseId"], "message": "The merchandise does not exist." },
                { "code": null, "field": null, "message": "Cart is locked." }
            ]
        }))
        .unwrap();

        let err = cart_from_payload(Some(payload), "cartLinesAdd").unwrap_err();
        assert_eq!(
            err.to_string(),
            "User error: The merchandise does not exist. (field: lines.0.merchandiseId) [INVALID]; Cart is locked."
        );
    }

    #[test]
    fn test_payload_without_cart() {
        let payload: CartMutationPayload =
            serde_json::from_value(json!({ "cart": null, "userErrors": [] })).unwrap();
        assert!(matches!(
            cart_from_payload(Some(payload), "cartCreate"),
            Err(ShopifyError::EmptyResponse("cartCreate"))
        ));
        assert!(matches!(
            cart_from_payload(None, "cartCreate"),
            Err(ShopifyError::EmptyResponse("cartCreate"))
        ));
    }
}

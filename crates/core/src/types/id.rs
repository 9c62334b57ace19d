//! Newtype IDs for type-safe references to remote commerce objects.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally passing a line id where a variant id is expected.
//!
//! [`CartId`] is special: Shopify addresses carts by a prefixed global id
//! (`gid://shopify/Cart/<opaque>`) while the browser-side storage only keeps
//! the opaque part. `CartId` always holds the prefixed form and converts at
//! the storage boundary.

use serde::{Deserialize, Serialize};

/// Prefix of every Shopify cart global id.
pub const CART_GID_PREFIX: &str = "gid://shopify/Cart/";

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `is_blank()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use cartwheel_core::define_id;
/// define_id!(OrderId);
/// define_id!(ProductId);
///
/// let order_id = OrderId::new("gid://shopify/Order/1");
/// let product_id = ProductId::new("gid://shopify/Product/1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is empty or only whitespace.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Product variant ID. The stable merge key for cart items.
    VariantId
);
define_id!(
    /// Remote cart line ID, assigned by the commerce backend.
    LineId
);
define_id!(
    /// Product ID.
    ProductId
);

/// Remote cart identifier, always stored in its prefixed global id form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CartId(String);

impl CartId {
    /// Create a cart ID from either the prefixed or the opaque form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.starts_with(CART_GID_PREFIX) {
            Self(id)
        } else {
            Self(format!("{CART_GID_PREFIX}{id}"))
        }
    }

    /// The full global id, as sent in GraphQL queries.
    #[must_use]
    pub fn as_gid(&self) -> &str {
        &self.0
    }

    /// The opaque part without the prefix, as kept in durable storage.
    #[must_use]
    pub fn opaque(&self) -> &str {
        self.0.strip_prefix(CART_GID_PREFIX).unwrap_or(&self.0)
    }

    /// Whether the opaque part is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.opaque().trim().is_empty()
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CartId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for CartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<CartId> for String {
    fn from(id: CartId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_id_adds_prefix_to_opaque_form() {
        let id = CartId::new("abc123");
        assert_eq!(id.as_gid(), "gid://shopify/Cart/abc123");
        assert_eq!(id.opaque(), "abc123");
    }

    #[test]
    fn test_cart_id_keeps_prefixed_form() {
        let id = CartId::new("gid://shopify/Cart/c1-xyz?key=k");
        assert_eq!(id.as_gid(), "gid://shopify/Cart/c1-xyz?key=k");
        assert_eq!(id.opaque(), "c1-xyz?key=k");
    }

    #[test]
    fn test_cart_id_storage_round_trip() {
        let id = CartId::new("gid://shopify/Cart/abc");
        assert_eq!(CartId::new(id.opaque()), id);
    }

    #[test]
    fn test_cart_id_blank() {
        assert!(CartId::new("").is_blank());
        assert!(CartId::new(CART_GID_PREFIX).is_blank());
        assert!(!CartId::new("abc").is_blank());
    }

    #[test]
    fn test_cart_id_serde_uses_gid() {
        let json = serde_json::to_string(&CartId::new("abc")).unwrap();
        assert_eq!(json, "\"gid://shopify/Cart/abc\"");

        let parsed: CartId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed.as_gid(), "gid://shopify/Cart/abc");
    }

    #[test]
    fn test_string_ids() {
        let variant = VariantId::new("gid://shopify/ProductVariant/1");
        assert_eq!(variant.to_string(), "gid://shopify/ProductVariant/1");
        assert!(!variant.is_blank());
        assert!(LineId::from("  ").is_blank());
    }
}

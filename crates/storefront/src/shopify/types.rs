//! Catalog types for the Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the GraphQL wire
//! shapes. Cart types live in `cartwheel_core`.

use cartwheel_core::{CartItem, Price, ProductId, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Image Types
// =============================================================================

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID (cart merchandise ID).
    pub id: VariantId,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Variant title (e.g., "Large / Blue").
    pub title: String,
    /// Whether the variant can be purchased.
    pub available_for_sale: bool,
    /// Unit price.
    pub price: Price,
    /// Variant image.
    pub image: Option<Image>,
    /// Option values that identify this variant.
    pub selected_options: Vec<SelectedOption>,
}

/// A product with its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// Whether any variant can be purchased.
    pub available_for_sale: bool,
    /// `custom.material` metafield.
    pub material: Option<String>,
    /// `custom.shipping` metafield.
    pub shipping: Option<String>,
    /// Option definitions.
    pub options: Vec<ProductOption>,
    /// Product images.
    pub images: Vec<Image>,
    /// Variants in catalog order.
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Find a variant by its title, ignoring ASCII case.
    #[must_use]
    pub fn variant_by_title(&self, title: &str) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.title.eq_ignore_ascii_case(title))
    }

    /// The first variant available for sale, falling back to the first one.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Build a cart item for one of this product's variants.
    ///
    /// The variant image is used when present, otherwise the first product
    /// image.
    #[must_use]
    pub fn cart_item(&self, variant: &ProductVariant, quantity: u32) -> CartItem {
        let image = variant
            .image
            .as_ref()
            .or_else(|| self.images.first())
            .map(|i| i.url.clone())
            .unwrap_or_default();

        CartItem {
            id: None,
            variant_id: variant.id.clone(),
            quantity,
            title: self.title.clone(),
            variant_title: variant.title.clone(),
            price: variant.price.amount,
            image,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn variant(id: &str, title: &str, available: bool) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(id),
            sku: None,
            title: title.to_string(),
            available_for_sale: available,
            price: Price::new(Decimal::new(2400, 2), "USD"),
            image: None,
            selected_options: vec![],
        }
    }

    fn product(variants: Vec<ProductVariant>) -> Product {
        Product {
            id: ProductId::new("gid://shopify/Product/1"),
            handle: "tee".to_string(),
            title: "Canvas Tote".to_string(),
            description: String::new(),
            available_for_sale: true,
            material: None,
            shipping: None,
            options: vec![],
            images: vec![Image {
                url: "https://cdn.shopify.com/tee.png".to_string(),
                alt_text: None,
            }],
            variants,
        }
    }

    #[test]
    fn test_variant_by_title_ignores_case() {
        let product = product(vec![variant("v1", "Small", true), variant("v2", "Large", true)]);
        assert_eq!(
            product.variant_by_title("large").unwrap().id.as_str(),
            "v2"
        );
        assert!(product.variant_by_title("XL").is_none());
    }

    #[test]
    fn test_default_variant_prefers_available() {
        let mixed = product(vec![variant("v1", "Small", false), variant("v2", "Large", true)]);
        assert_eq!(mixed.default_variant().unwrap().id.as_str(), "v2");

        let sold_out = product(vec![variant("v1", "Small", false)]);
        assert_eq!(sold_out.default_variant().unwrap().id.as_str(), "v1");
    }

    #[test]
    fn test_cart_item_from_variant() {
        let product = product(vec![variant("v1", "Small", true)]);
        let item = product.cart_item(&product.variants[0], 2);

        assert_eq!(item.id, None);
        assert_eq!(item.variant_id.as_str(), "v1");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.title, "Canvas Tote");
        assert_eq!(item.variant_title, "Small");
        assert_eq!(item.price, Decimal::new(24, 0));
        assert_eq!(item.image, "https://cdn.shopify.com/tee.png");
    }
}

//! Product type conversion functions.

use cartwheel_core::{ProductId, VariantId};

use super::super::queries::get_product_by_handle::{ProductFields, VariantFields};
use super::{convert_image, convert_money};
use crate::shopify::ShopifyError;
use crate::shopify::types::{Product, ProductOption, ProductVariant, SelectedOption};

/// Convert a product query result into a [`Product`].
///
/// # Errors
///
/// Returns [`ShopifyError::Malformed`] if a variant price cannot be parsed.
pub fn convert_product(product: ProductFields) -> Result<Product, ShopifyError> {
    let variants = product
        .variants
        .edges
        .into_iter()
        .map(|e| convert_variant(e.node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        description: product.description,
        available_for_sale: product.available_for_sale,
        material: product.material.map(|m| m.value),
        shipping: product.shipping.map(|m| m.value),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        images: product
            .images
            .edges
            .into_iter()
            .map(|e| convert_image(e.node))
            .collect(),
        variants,
    })
}

fn convert_variant(variant: VariantFields) -> Result<ProductVariant, ShopifyError> {
    Ok(ProductVariant {
        id: VariantId::new(variant.id),
        sku: variant.sku.filter(|s| !s.is_empty()),
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        price: convert_money(variant.price)?,
        image: variant.image.map(convert_image),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
    })
}

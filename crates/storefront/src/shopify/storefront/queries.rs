//! GraphQL operation definitions for the Shopify Storefront API.
//!
//! Each operation is a [`GraphQLQuery`] over one of the documents in
//! `graphql/storefront/`. Response types mirror the selection sets exactly
//! and are converted into domain types in `conversions`.
//!
//! The wire structs below are written by hand and must stay in sync with
//! `graphql/storefront/*.graphql`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

const CART_DOCUMENT: &str = include_str!("../../../graphql/storefront/cart.graphql");
const PRODUCTS_DOCUMENT: &str = include_str!("../../../graphql/storefront/products.graphql");

macro_rules! operation {
    ($(#[$meta:meta])* $name:ident, $document:expr, $variables:ty => $data:ty) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $variables;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

// =============================================================================
// Shared Shapes
// =============================================================================

/// `edges { node }` connection wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub url: String,
    pub alt_text: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// `fragment CartFields on Cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFields {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub lines: Connection<CartLineFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineFields {
    pub id: String,
    pub quantity: i64,
    pub merchandise: Option<MerchandiseFields>,
}

/// `... on ProductVariant`. Every field is absent for other merchandise types.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseFields {
    pub id: Option<String>,
    pub title: Option<String>,
    pub price: Option<MoneyV2>,
    pub image: Option<ImageFields>,
    pub product: Option<MerchandiseProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseProduct {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorFields {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartFields>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorFields>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: String,
    pub merchandise_id: String,
    pub quantity: i64,
}

pub mod create_cart {
    use super::{CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartMutationPayload>,
    }
}

pub mod get_cart {
    use super::{CartFields, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartFields>,
    }
}

pub mod add_to_cart {
    use super::{CartLineInput, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

pub mod update_cart_lines {
    use super::{CartLineUpdateInput, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

pub mod remove_from_cart {
    use super::{CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub line_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

pub mod get_checkout_url {
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CheckoutUrlFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CheckoutUrlFields {
        pub checkout_url: String,
    }
}

operation!(
    /// `mutation CreateCart`
    CreateCart, CART_DOCUMENT, create_cart::Variables => create_cart::ResponseData
);
operation!(
    /// `query GetCart`
    GetCart, CART_DOCUMENT, get_cart::Variables => get_cart::ResponseData
);
operation!(
    /// `mutation AddToCart`
    AddToCart, CART_DOCUMENT, add_to_cart::Variables => add_to_cart::ResponseData
);
operation!(
    /// `mutation UpdateCartLines`
    UpdateCartLines, CART_DOCUMENT, update_cart_lines::Variables => update_cart_lines::ResponseData
);
operation!(
    /// `mutation RemoveFromCart`
    RemoveFromCart, CART_DOCUMENT, remove_from_cart::Variables => remove_from_cart::ResponseData
);
operation!(
    /// `query GetCheckoutUrl`
    GetCheckoutUrl, CART_DOCUMENT, get_checkout_url::Variables => get_checkout_url::ResponseData
);

// =============================================================================
// Products
// =============================================================================

pub mod get_product_by_handle {
    use super::{Connection, Deserialize, ImageFields, MoneyV2, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub image_count: Option<i64>,
        pub variant_count: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub description: String,
        pub available_for_sale: bool,
        pub material: Option<MetafieldValue>,
        pub shipping: Option<MetafieldValue>,
        pub options: Vec<ProductOptionFields>,
        pub images: Connection<ImageFields>,
        pub variants: Connection<VariantFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetafieldValue {
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductOptionFields {
        pub name: String,
        pub option_values: Vec<OptionValueFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct OptionValueFields {
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantFields {
        pub id: String,
        pub sku: Option<String>,
        pub title: String,
        pub available_for_sale: bool,
        pub price: MoneyV2,
        pub image: Option<ImageFields>,
        pub selected_options: Vec<SelectedOptionFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SelectedOptionFields {
        pub name: String,
        pub value: String,
    }
}

operation!(
    /// `query GetProductByHandle`
    GetProductByHandle, PRODUCTS_DOCUMENT,
    get_product_by_handle::Variables => get_product_by_handle::ResponseData
);

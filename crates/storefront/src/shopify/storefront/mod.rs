//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` query bodies with `reqwest` 0.13 for HTTP.
//! Caches product lookups using `moka` (5-minute TTL). Carts are never cached.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use cartwheel_core::commerce::{require_cart_id, require_line_ids, require_variant_id};
use cartwheel_core::{CartError, CartId, CommerceClient, LineId, RemoteCart, VariantId};
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::{ShopifyStorefrontConfig, StorefrontToken};
use crate::shopify::types::Product;
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{cart_from_payload, convert_cart, convert_product};
use queries::{
    AddToCart, CartLineInput, CartLineUpdateInput, CreateCart, GetCart, GetCheckoutUrl,
    GetProductByHandle, RemoveFromCart, UpdateCartLines, add_to_cart, create_cart, get_cart,
    get_checkout_url, get_product_by_handle, remove_from_cart, update_cart_lines,
};

const BODY_LOG_LIMIT: usize = 500;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides cart operations and product lookups. Products are cached for
/// 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: StorefrontToken,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::MissingToken`] without an access token, or
    /// [`ShopifyError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        Self::with_endpoint(config, config.endpoint())
    }

    /// Create a client that posts to a specific GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::MissingToken`] if the configuration carries no
    /// access token, or [`ShopifyError::Http`] if the HTTP client cannot be
    /// built.
    pub fn with_endpoint(
        config: &ShopifyStorefrontConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        let token = config.token().ok_or(ShopifyError::MissingToken)?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: endpoint.into(),
                token,
                cache,
            }),
        })
    }

    /// GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);
        let operation = request_body.operation_name;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(self.inner.token.header_name(), self.inner.token.expose())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation,
                status = %status,
                body = %excerpt(&response_text, BODY_LOG_LIMIT),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string(),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    operation,
                    error = %e,
                    body = %excerpt(&response_text, BODY_LOG_LIMIT),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(operation, errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation,
                body = %excerpt(&response_text, BODY_LOG_LIMIT),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::EmptyResponse(operation)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::ProductNotFound`] if no product has the handle,
    /// or an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = CacheKey::Product(handle.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = get_product_by_handle::Variables {
            handle: handle.to_string(),
            image_count: Some(10),
            variant_count: Some(100),
        };

        let data = self.execute::<GetProductByHandle>(variables).await?;

        let product_data = data
            .product
            .ok_or_else(|| ShopifyError::ProductNotFound(handle.to_string()))?;

        let product = convert_product(product_data)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Drop every cached catalog read.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a new, empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<RemoteCart, ShopifyError> {
        let data = self.execute::<CreateCart>(create_cart::Variables).await?;
        let cart = cart_from_payload(data.cart_create, "cartCreate")?;
        debug!(cart_id = %cart.id, "Created cart");
        Ok(cart)
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::CartNotFound`] if the cart is invalid or has
    /// expired, or an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<RemoteCart, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.as_gid().to_string(),
        };

        let data = self.execute::<GetCart>(variables).await?;

        data.cart
            .ok_or_else(|| ShopifyError::CartNotFound(cart_id.as_gid().to_string()))
            .and_then(convert_cart)
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    pub async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<(VariantId, u32)>,
    ) -> Result<RemoteCart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.as_gid().to_string(),
            lines: lines
                .into_iter()
                .map(|(variant_id, quantity)| CartLineInput {
                    merchandise_id: variant_id.as_str().to_string(),
                    quantity: i64::from(quantity),
                })
                .collect(),
        };

        let data = self.execute::<AddToCart>(variables).await?;
        cart_from_payload(data.cart_lines_add, "cartLinesAdd")
    }

    /// Update line quantities in a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    pub async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<(LineId, VariantId, u32)>,
    ) -> Result<RemoteCart, ShopifyError> {
        let variables = update_cart_lines::Variables {
            cart_id: cart_id.as_gid().to_string(),
            lines: lines
                .into_iter()
                .map(|(line_id, variant_id, quantity)| CartLineUpdateInput {
                    id: line_id.as_str().to_string(),
                    merchandise_id: variant_id.as_str().to_string(),
                    quantity: i64::from(quantity),
                })
                .collect(),
        };

        let data = self.execute::<UpdateCartLines>(variables).await?;
        cart_from_payload(data.cart_lines_update, "cartLinesUpdate")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id, lines = line_ids.len()))]
    pub async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: &[LineId],
    ) -> Result<RemoteCart, ShopifyError> {
        let variables = remove_from_cart::Variables {
            cart_id: cart_id.as_gid().to_string(),
            line_ids: line_ids.iter().map(|id| id.as_str().to_string()).collect(),
        };

        let data = self.execute::<RemoveFromCart>(variables).await?;
        cart_from_payload(data.cart_lines_remove, "cartLinesRemove")
    }

    /// Get the hosted checkout URL for a cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::CartNotFound`] if the cart is gone, or
    /// [`ShopifyError::Malformed`] if the URL is empty or not absolute.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn checkout_url(&self, cart_id: &CartId) -> Result<String, ShopifyError> {
        let variables = get_checkout_url::Variables {
            cart_id: cart_id.as_gid().to_string(),
        };

        let data = self.execute::<GetCheckoutUrl>(variables).await?;

        let cart = data
            .cart
            .ok_or_else(|| ShopifyError::CartNotFound(cart_id.as_gid().to_string()))?;

        validate_checkout_url(&cart.checkout_url)?;
        Ok(cart.checkout_url)
    }
}

impl CommerceClient for StorefrontClient {
    async fn create_cart(&self) -> Result<RemoteCart, CartError> {
        Ok(Self::create_cart(self).await?)
    }

    async fn get_cart(&self, cart_id: &CartId) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        Ok(Self::get_cart(self, cart_id).await?)
    }

    async fn add_to_cart(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_variant_id(variant_id)?;
        Ok(self
            .add_lines(cart_id, vec![(variant_id.clone(), quantity)])
            .await?)
    }

    async fn update_cart(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_line_ids([line_id])?;
        require_variant_id(variant_id)?;
        Ok(self
            .update_lines(cart_id, vec![(line_id.clone(), variant_id.clone(), quantity)])
            .await?)
    }

    async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_line_ids([line_id])?;
        Ok(self.remove_lines(cart_id, std::slice::from_ref(line_id)).await?)
    }

    async fn remove_line_items(
        &self,
        cart_id: &CartId,
        line_ids: &[LineId],
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_line_ids(line_ids)?;
        if line_ids.is_empty() {
            return Ok(Self::get_cart(self, cart_id).await?);
        }
        Ok(self.remove_lines(cart_id, line_ids).await?)
    }

    async fn get_checkout_url(&self, cart_id: &CartId) -> Result<String, CartError> {
        require_cart_id(cart_id)?;
        Ok(self.checkout_url(cart_id).await?)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn validate_checkout_url(checkout_url: &str) -> Result<(), ShopifyError> {
    if checkout_url.trim().is_empty() {
        return Err(ShopifyError::Malformed("cart has no checkout URL".to_string()));
    }
    let parsed = url::Url::parse(checkout_url)
        .map_err(|e| ShopifyError::Malformed(format!("invalid checkout URL: {e}")))?;
    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(ShopifyError::Malformed(format!(
            "checkout URL has unexpected scheme '{}'",
            parsed.scheme()
        )));
    }
    Ok(())
}

//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Operations are `graphql_client` [`GraphQLQuery`](graphql_client::GraphQLQuery)
//!   types over the documents in `graphql/storefront/`
//! - Shopify is the source of truth for carts, cart reads are never cached
//! - Product lookups are cached in memory via `moka` (5 minute TTL)
//!
//! Failures are captured as [`ShopifyError`] and classified into
//! [`CartError`] when they cross into the cart layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartwheel_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//!
//! let cart = client.create_cart().await?;
//! let cart = client
//!     .add_lines(&cart.id, vec![(VariantId::new("gid://shopify/ProductVariant/1"), 2)])
//!     .await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

use cartwheel_core::CartError;
use thiserror::Error;

/// Errors that can occur when talking to the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No cart exists for the ID.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// No product exists for the handle.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The response had neither data nor errors for the operation.
    #[error("Empty response for {0}")]
    EmptyResponse(&'static str),

    /// The response decoded but violated the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No storefront access token is configured.
    #[error("No Storefront API access token configured")]
    MissingToken,
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ShopifyError> for CartError {
    fn from(err: ShopifyError) -> Self {
        let message = err.to_string();
        match err {
            ShopifyError::CartNotFound(cart_id) => Self::CartNotFound {
                cart_id,
                source: None,
            },
            ShopifyError::ProductNotFound(handle) => Self::ProductNotFound(handle),
            ShopifyError::Http(e) => {
                let status = e.status().map(|s| s.as_u16());
                Self::transport(status, message, e)
            }
            ShopifyError::Status { status, .. } => Self::Transport {
                status: Some(status),
                message,
                source: None,
            },
            ShopifyError::RateLimited(_) => Self::Transport {
                status: Some(429),
                message,
                source: None,
            },
            ShopifyError::Parse(e) => Self::protocol_with_source(message, e),
            ShopifyError::GraphQL(_)
            | ShopifyError::UserError(_)
            | ShopifyError::EmptyResponse(_)
            | ShopifyError::Malformed(_)
            | ShopifyError::MissingToken => Self::protocol(message),
        }
    }
}

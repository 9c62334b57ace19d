//! Cart error taxonomy.
//!
//! Every failure a cart operation can report is a [`CartError`]. Backends
//! classify their low-level failures into one of three families:
//!
//! - application-level: a required id is missing, or the cart/product does
//!   not exist;
//! - transport-level: the request never produced a usable HTTP response;
//! - protocol-level: a response arrived but carried GraphQL errors, user
//!   errors, or a shape that could not be decoded.
//!
//! The underlying low-level error is kept as [`std::error::Error::source`].

use std::fmt;

use thiserror::Error;

/// Boxed low-level error kept for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingCartId,
    MissingVariantId,
    MissingItemId,
    CartNotFound,
    ProductNotFound,
    Transport,
    Protocol,
    ServerSideInitialization,
    Storage,
}

impl ErrorCode {
    /// The code as a stable string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCartId => "MISSING_CART_ID",
            Self::MissingVariantId => "MISSING_VARIANT_ID",
            Self::MissingItemId => "MISSING_ITEM_ID",
            Self::CartNotFound => "CART_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::Transport => "HTTP_ERROR",
            Self::Protocol => "GRAPHQL_ERROR",
            Self::ServerSideInitialization => "SERVER_SIDE_CART_INIT",
            Self::Storage => "CART_STORAGE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by cart operations and commerce backends.
#[derive(Debug, Error)]
pub enum CartError {
    /// A cart ID is required but none is set.
    #[error("Cart ID is required")]
    MissingCartId,

    /// A variant ID is required but was empty.
    #[error("Variant ID is required")]
    MissingVariantId,

    /// A line item ID is required but was empty.
    #[error("Item ID is required")]
    MissingItemId,

    /// The remote cart does not exist (invalid or expired).
    #[error("Cart not found with ID: {cart_id}")]
    CartNotFound {
        cart_id: String,
        #[source]
        source: Option<BoxError>,
    },

    /// No product exists for the handle.
    #[error("Product with handle '{0}' not found")]
    ProductNotFound(String),

    /// Network failure or non-success HTTP status.
    #[error("Transport error{}: {message}", format_status(.status.as_ref()))]
    Transport {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// GraphQL errors, user errors, or an undecodable response.
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Cart initialization attempted without client-side storage.
    #[error("Cannot initialize cart on server-side")]
    ServerSideInitialization,

    /// Reading or writing the persisted cart ID failed.
    #[error("Cart storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

fn format_status(status: Option<&u16>) -> String {
    status.map_or_else(String::new, |s| format!(" (HTTP {s})"))
}

impl CartError {
    /// A missing or expired cart.
    #[must_use]
    pub fn cart_not_found(cart_id: impl Into<String>) -> Self {
        Self::CartNotFound {
            cart_id: cart_id.into(),
            source: None,
        }
    }

    /// A transport failure with the low-level cause.
    #[must_use]
    pub fn transport(
        status: Option<u16>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            status,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// A protocol failure without an underlying error value.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// A protocol failure with the low-level cause.
    #[must_use]
    pub fn protocol_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// A storage failure with the low-level cause.
    #[must_use]
    pub fn storage(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Machine-readable code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCartId => ErrorCode::MissingCartId,
            Self::MissingVariantId => ErrorCode::MissingVariantId,
            Self::MissingItemId => ErrorCode::MissingItemId,
            Self::CartNotFound { .. } => ErrorCode::CartNotFound,
            Self::ProductNotFound(_) => ErrorCode::ProductNotFound,
            Self::Transport { .. } => ErrorCode::Transport,
            Self::Protocol { .. } => ErrorCode::Protocol,
            Self::ServerSideInitialization => ErrorCode::ServerSideInitialization,
            Self::Storage { .. } => ErrorCode::Storage,
        }
    }

    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the error was raised before any remote call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingCartId | Self::MissingVariantId | Self::MissingItemId
        )
    }

    /// Whether retrying the same call later could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status, .. } => match status {
                Some(s) => *s == 429 || *s >= 500,
                None => true,
            },
            _ => false,
        }
    }
}

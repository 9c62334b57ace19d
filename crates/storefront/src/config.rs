//! Cartwheel configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PUBLIC_TOKEN` and/or `SHOPIFY_STOREFRONT_PRIVATE_TOKEN`
//!   - Storefront API access token (at least one)
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-01)
//! - `SHOPIFY_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `CARTWHEEL_CART_FILE` - Cart id file (default: .cartwheel/shopify_cart_id)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2025-01";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CART_FILE: &str = ".cartwheel/shopify_cart_id";
const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct CartwheelConfig {
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// File holding the persisted cart id
    pub cart_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2025-01)
    pub api_version: String,
    /// Storefront API public access token (safe to expose in browser)
    pub storefront_public_token: Option<String>,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: Option<SecretString>,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_public_token", &self.storefront_public_token)
            .field(
                "storefront_private_token",
                &self.storefront_private_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Credentials used to authenticate Storefront API requests.
#[derive(Clone)]
pub enum StorefrontToken {
    /// Sent as `Shopify-Storefront-Private-Token`.
    Private(SecretString),
    /// Sent as `X-Shopify-Storefront-Access-Token`.
    Public(String),
}

impl StorefrontToken {
    /// HTTP header carrying the token.
    #[must_use]
    pub const fn header_name(&self) -> &'static str {
        match self {
            Self::Private(_) => "Shopify-Storefront-Private-Token",
            Self::Public(_) => "X-Shopify-Storefront-Access-Token",
        }
    }

    /// Header value.
    #[must_use]
    pub fn expose(&self) -> &str {
        match self {
            Self::Private(token) => token.expose_secret(),
            Self::Public(token) => token,
        }
    }
}

impl CartwheelConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the private token fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let cart_file = PathBuf::from(get_env_or_default("CARTWHEEL_CART_FILE", DEFAULT_CART_FILE));

        Ok(Self {
            shopify,
            cart_file,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ShopifyStorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store = normalize_store_domain(&get_required_env("SHOPIFY_STORE")?)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar("SHOPIFY_STORE".to_string(), "empty".to_string())
            })?;

        let storefront_public_token = get_optional_env("SHOPIFY_STOREFRONT_PUBLIC_TOKEN");
        let storefront_private_token = get_optional_env("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")
            .map(|value| {
                validate_secret_strength(&value, "SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        if storefront_public_token.is_none() && storefront_private_token.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "SHOPIFY_STOREFRONT_PUBLIC_TOKEN or SHOPIFY_STOREFRONT_PRIVATE_TOKEN".to_string(),
            ));
        }

        let timeout_secs = get_env_or_default("SHOPIFY_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            store,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            storefront_public_token,
            storefront_private_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration for a store with a public token and default settings.
    #[must_use]
    pub fn with_public_token(store: &str, token: impl Into<String>) -> Self {
        Self {
            store: normalize_store_domain(store).unwrap_or_default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            storefront_public_token: Some(token.into()),
            storefront_private_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store, self.api_version
        )
    }

    /// The token to authenticate with, preferring the private token.
    #[must_use]
    pub fn token(&self) -> Option<StorefrontToken> {
        self.storefront_private_token
            .clone()
            .map(StorefrontToken::Private)
            .or_else(|| {
                self.storefront_public_token
                    .clone()
                    .map(StorefrontToken::Public)
            })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reduce a store setting to a bare domain.
///
/// Accepts `shop`, `shop.myshopify.com` or `https://shop.myshopify.com/`.
fn normalize_store_domain(store: &str) -> Option<String> {
    let domain = store
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');

    if domain.is_empty() {
        return None;
    }

    if domain.contains('.') {
        Some(domain.to_string())
    } else {
        Some(format!("{domain}{MYSHOPIFY_SUFFIX}"))
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real access tokens are random hex/base62
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token from the Shopify admin."
            ),
        ));
    }

    Ok(())
}

//! Durable client-side storage for the remote cart id.
//!
//! A single key holds the opaque (unprefixed) cart id. It is read once when
//! the cart store initializes and written whenever a new remote cart is
//! created.

use std::sync::Mutex;

use crate::error::CartError;

/// Storage key for the persisted cart id.
pub const CART_ID_KEY: &str = "shopify_cart_id";

/// Key/value storage for the persisted cart id.
///
/// Calls are synchronous and made from async store operations, so
/// implementations must return quickly. Anything slower than a small local
/// file belongs behind `tokio::task::spawn_blocking`.
pub trait CartIdStorage: Send + Sync {
    /// Whether this storage belongs to a client (browsing) context.
    ///
    /// Cart initialization is refused when it does not.
    fn is_available(&self) -> bool {
        true
    }

    /// Read the stored opaque cart id.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the storage cannot be read.
    fn load(&self) -> Result<Option<String>, CartError>;

    /// Store an opaque cart id, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the storage cannot be written.
    fn save(&self, cart_id: &str) -> Result<(), CartError>;

    /// Forget the stored cart id.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the storage cannot be written.
    fn clear(&self) -> Result<(), CartError>;
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create storage pre-seeded with a cart id.
    #[must_use]
    pub fn with_cart_id(cart_id: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(cart_id.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, CartError> {
        self.value.lock().map_err(|_| CartError::Storage {
            message: "cart id storage lock poisoned".to_string(),
            source: None,
        })
    }
}

impl CartIdStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, CartError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, cart_id: &str) -> Result<(), CartError> {
        *self.lock()? = Some(cart_id.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), CartError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Storage for contexts without a client, such as server-side rendering.
///
/// Loads nothing and refuses cart initialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStorage;

impl CartIdStorage for NoStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn load(&self) -> Result<Option<String>, CartError> {
        Ok(None)
    }

    fn save(&self, _cart_id: &str) -> Result<(), CartError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CartError> {
        Ok(())
    }
}

impl<T: CartIdStorage + ?Sized> CartIdStorage for std::sync::Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn load(&self) -> Result<Option<String>, CartError> {
        (**self).load()
    }

    fn save(&self, cart_id: &str) -> Result<(), CartError> {
        (**self).save(cart_id)
    }

    fn clear(&self) -> Result<(), CartError> {
        (**self).clear()
    }
}

//! Reactive cart store.
//!
//! [`CartStore`] owns the observable [`CartState`] and mediates between UI
//! actions and a [`CommerceClient`]. Mutations are applied locally first and
//! then mirrored to the backend. When a remote mutation fails the store
//! re-fetches the remote cart and overwrites local items before reporting
//! the error, so local state never stays ahead of the backend.
//!
//! Validation errors are raised before any local change or network call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cartwheel_core::commerce::require_variant_id;
use cartwheel_core::{
    CartError, CartId, CartIdStorage, CartItem, CartState, CommerceClient, RemoteCart, RemoteLine,
    VariantId,
};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// Cloneable handle to one cart.
pub struct CartStore<C, S> {
    inner: Arc<CartStoreInner<C, S>>,
}

struct CartStoreInner<C, S> {
    client: C,
    storage: S,
    state: watch::Sender<CartState>,
    in_flight: AtomicUsize,
}

impl<C, S> Clone for CartStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Keeps `is_loading` set while at least one remote operation is running.
///
/// The counter is only touched inside `send_if_modified`, which holds the
/// state lock, so the flag and the counter never disagree.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<CartState>,
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a watch::Sender<CartState>, in_flight: &'a AtomicUsize) -> Self {
        state.send_if_modified(|s| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            let changed = !s.is_loading;
            s.is_loading = true;
            changed
        });
        Self { state, in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_if_modified(|s| {
            let last = in_flight.fetch_sub(1, Ordering::SeqCst) == 1;
            if last && s.is_loading {
                s.is_loading = false;
                return true;
            }
            false
        });
    }
}

impl<C: CommerceClient, S: CartIdStorage> CartStore<C, S> {
    /// Create an uninitialized store.
    #[must_use]
    pub fn new(client: C, storage: S) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            inner: Arc::new(CartStoreInner {
                client,
                storage,
                state,
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// The commerce backend.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    /// The cart id storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Observe every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Current remote cart id.
    #[must_use]
    pub fn cart_id(&self) -> Option<CartId> {
        self.inner.state.borrow().cart_id.clone()
    }

    /// Current items.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.state.borrow().items.clone()
    }

    /// Whether the cart drawer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().is_open
    }

    /// Whether a remote operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        LoadingGuard::begin(&self.inner.state, &self.inner.in_flight)
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Restore the persisted cart, or create a new one.
    ///
    /// A persisted cart that can no longer be fetched is discarded in favor
    /// of a new cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ServerSideInitialization`] without client-side
    /// storage, a storage error, or the error from creating the new cart.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), CartError> {
        if !self.inner.storage.is_available() {
            return Err(CartError::ServerSideInitialization);
        }

        let _loading = self.begin_loading();

        if let Some(stored) = self.inner.storage.load()? {
            let cart_id = CartId::new(stored);
            match self.inner.client.get_cart(&cart_id).await {
                Ok(cart) => {
                    debug!(cart_id = %cart_id, lines = cart.lines.len(), "Restored cart");
                    self.inner.state.send_modify(|s| {
                        s.replace_from_remote(&cart);
                        s.cart_id = Some(cart_id);
                    });
                    return Ok(());
                }
                Err(e) => {
                    warn!(cart_id = %cart_id, error = %e, "Stored cart is unavailable, creating a new one");
                }
            }
        }

        let cart_id = self.create_remote_cart().await?;
        debug!(cart_id = %cart_id, "Initialized new cart");
        Ok(())
    }

    /// Add an item, merging by variant, and open the cart.
    ///
    /// A zero quantity is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingVariantId`] for a blank variant, or the
    /// remote error after local items were reconciled with the backend.
    #[instrument(skip(self, item), fields(variant_id = %item.variant_id, quantity = item.quantity))]
    pub async fn add_item(&self, item: CartItem) -> Result<(), CartError> {
        require_variant_id(&item.variant_id)?;
        if item.quantity == 0 {
            return Ok(());
        }

        let variant_id = item.variant_id.clone();
        let quantity = item.quantity;
        let cart_id = self.cart_id();
        let _loading = cart_id.as_ref().map(|_| self.begin_loading());

        self.inner.state.send_modify(|s| {
            s.merge_item(item);
            s.is_open = true;
        });

        let Some(cart_id) = cart_id else {
            return Ok(());
        };

        let result = self
            .inner
            .client
            .add_to_cart(&cart_id, &variant_id, quantity)
            .await;
        self.settle(result).await
    }

    /// Remove the item for a variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingVariantId`] for a blank variant, or the
    /// remote error after local items were reconciled with the backend.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn remove_item(&self, variant_id: &VariantId) -> Result<(), CartError> {
        require_variant_id(variant_id)?;

        let mut removed = None;
        self.inner.state.send_if_modified(|s| {
            removed = s.remove_item(variant_id);
            removed.is_some()
        });

        let line_id = removed.and_then(|item| item.id).filter(|id| !id.is_blank());
        let (Some(cart_id), Some(line_id)) = (self.cart_id(), line_id) else {
            return Ok(());
        };

        let _loading = self.begin_loading();
        let result = self
            .inner
            .client
            .remove_line_item(&cart_id, &line_id)
            .await;
        self.settle(result).await
    }

    /// Set the quantity of the item for a variant.
    ///
    /// Quantities below 1 and unknown variants are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingVariantId`] for a blank variant, or the
    /// remote error after local items were reconciled with the backend.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn update_quantity(
        &self,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<(), CartError> {
        require_variant_id(variant_id)?;
        if quantity < 1 {
            return Ok(());
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut found = false;
        let mut line_id = None;
        self.inner.state.send_if_modified(|s| {
            let Some(item) = s.set_quantity(variant_id, quantity) else {
                return false;
            };
            found = true;
            line_id = item.id.clone();
            true
        });
        if !found {
            return Ok(());
        }

        let line_id = line_id.filter(|id| !id.is_blank());
        let (Some(cart_id), Some(line_id)) = (self.cart_id(), line_id) else {
            return Ok(());
        };

        let _loading = self.begin_loading();
        let result = self
            .inner
            .client
            .update_cart(&cart_id, &line_id, variant_id, quantity)
            .await;
        self.settle(result).await
    }

    /// Empty the cart and start a new remote cart.
    ///
    /// # Errors
    ///
    /// Returns the remote or storage error after restoring the items that
    /// were in the cart.
    #[instrument(skip(self))]
    pub async fn clear_items(&self) -> Result<(), CartError> {
        let snapshot = self.snapshot();
        if snapshot.items.is_empty() {
            return Ok(());
        }

        let Some(cart_id) = snapshot.cart_id.clone() else {
            self.inner.state.send_modify(|s| s.items.clear());
            return Ok(());
        };

        let _loading = self.begin_loading();
        self.inner.state.send_modify(|s| s.items.clear());

        match self.replace_remote_cart(&cart_id, &snapshot).await {
            Ok(new_id) => {
                debug!(old_cart_id = %cart_id, new_cart_id = %new_id, "Cleared cart");
                Ok(())
            }
            Err(e) => {
                warn!(cart_id = %cart_id, error = %e, "Failed to clear cart, restoring items");
                self.inner.state.send_modify(|s| s.items = snapshot.items);
                Err(e)
            }
        }
    }

    async fn replace_remote_cart(
        &self,
        cart_id: &CartId,
        snapshot: &CartState,
    ) -> Result<CartId, CartError> {
        let line_ids = snapshot.line_ids();
        if !line_ids.is_empty() {
            self.inner.client.remove_line_items(cart_id, &line_ids).await?;
        }
        self.create_remote_cart().await
    }

    /// Hosted checkout URL for the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingCartId`] before any network call when the
    /// cart was never synchronized, or the remote error.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<String, CartError> {
        let cart_id = self.cart_id().ok_or(CartError::MissingCartId)?;
        let _loading = self.begin_loading();
        self.inner.client.get_checkout_url(&cart_id).await
    }

    /// Overwrite local items with the remote cart's lines.
    ///
    /// Does nothing when the cart was never synchronized.
    ///
    /// # Errors
    ///
    /// Returns the remote error. Local state is left unchanged.
    #[instrument(skip(self))]
    pub async fn sync_from_remote(&self) -> Result<(), CartError> {
        let Some(cart_id) = self.cart_id() else {
            return Ok(());
        };

        let _loading = self.begin_loading();
        let cart = self.inner.client.get_cart(&cart_id).await?;
        debug!(cart_id = %cart_id, lines = cart.lines.len(), "Synced cart from remote");
        self.inner.state.send_modify(|s| s.replace_from_remote(&cart));
        Ok(())
    }

    /// Create a remote cart and adopt it, persisting its id.
    async fn create_remote_cart(&self) -> Result<CartId, CartError> {
        let cart = self.inner.client.create_cart().await?;
        self.inner.storage.save(cart.id.opaque())?;
        let cart_id = cart.id.clone();
        self.inner.state.send_modify(|s| {
            s.replace_from_remote(&cart);
            s.cart_id = Some(cart.id);
        });
        Ok(cart_id)
    }

    /// Adopt line ids from a successful mutation, or reconcile after a failed
    /// one and hand the failure back.
    async fn settle(&self, result: Result<RemoteCart, CartError>) -> Result<(), CartError> {
        match result {
            Ok(cart) => {
                self.update_line_item_ids(&cart.lines);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Remote cart mutation failed, reconciling");
                if let Err(sync_error) = self.sync_from_remote().await {
                    warn!(error = %sync_error, "Failed to reconcile cart after remote failure");
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // Local Operations
    // =========================================================================

    /// Adopt remote line ids into items with matching variants.
    pub fn update_line_item_ids(&self, lines: &[RemoteLine]) {
        self.inner.state.send_if_modified(|s| {
            let before = s.line_ids();
            s.update_line_item_ids(lines);
            s.line_ids() != before
        });
    }

    /// Flip the cart drawer.
    pub fn toggle(&self) {
        self.inner.state.send_modify(|s| s.is_open = !s.is_open);
    }

    /// Open the cart drawer.
    pub fn open(&self) {
        self.inner.state.send_if_modified(|s| !std::mem::replace(&mut s.is_open, true));
    }

    /// Close the cart drawer.
    pub fn close(&self) {
        self.inner.state.send_if_modified(|s| std::mem::replace(&mut s.is_open, false));
    }

    /// Replace local items without touching the backend.
    pub fn set_items(&self, items: Vec<CartItem>) {
        self.inner.state.send_modify(|s| s.items = items);
    }

    /// Replace the cart id without touching the backend or storage.
    pub fn set_cart_id(&self, cart_id: Option<CartId>) {
        self.inner.state.send_modify(|s| s.cart_id = cart_id);
    }

    /// Forget the persisted cart and return to an empty, unsynchronized cart.
    ///
    /// The drawer keeps its open state.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the persisted id cannot be removed. Local
    /// state is left unchanged in that case.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<(), CartError> {
        self.inner.storage.clear()?;
        self.inner.state.send_modify(|s| {
            s.items.clear();
            s.cart_id = None;
        });
        debug!("Reset cart");
        Ok(())
    }
}

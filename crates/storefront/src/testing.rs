//! In-memory commerce backend for tests.
//!
//! [`FakeCommerce`] behaves like the Storefront API for the cart operations
//! the store uses: carts get `gid://shopify/Cart/...` ids, adding an existing
//! variant merges into its line, and unknown carts are `CartNotFound`. Every
//! call that passes validation is recorded, and operations can be told to
//! fail with a transport error.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cartwheel_core::commerce::{require_cart_id, require_line_ids, require_variant_id};
use cartwheel_core::{
    CartError, CartId, CommerceClient, LineId, Price, RemoteCart, RemoteLine, RemoteMerchandise,
    VariantId,
};
use rust_decimal::Decimal;

/// A commerce operation, for call assertions and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateCart,
    GetCart,
    AddToCart,
    UpdateCart,
    RemoveLineItem,
    RemoveLineItems,
    GetCheckoutUrl,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub cart_id: Option<CartId>,
    pub variant_id: Option<VariantId>,
    pub line_ids: Vec<LineId>,
    pub quantity: Option<u32>,
}

impl Call {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            cart_id: None,
            variant_id: None,
            line_ids: Vec::new(),
            quantity: None,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    carts: HashMap<CartId, RemoteCart>,
    catalog: HashMap<VariantId, RemoteMerchandise>,
    next_cart_ids: Vec<String>,
    next_id: u64,
    failures: HashSet<Operation>,
    calls: Vec<Call>,
}

impl FakeState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn cart_mut(&mut self, cart_id: &CartId) -> Result<&mut RemoteCart, CartError> {
        self.carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::cart_not_found(cart_id.as_gid()))
    }

    fn record(&mut self, call: Call) -> Result<(), CartError> {
        let operation = call.operation;
        self.calls.push(call);
        if self.failures.contains(&operation) {
            return Err(CartError::transport(
                Some(503),
                "Service Unavailable",
                std::io::Error::other(format!("injected {operation:?} failure")),
            ));
        }
        Ok(())
    }

    fn merchandise(&self, variant_id: &VariantId) -> RemoteMerchandise {
        self.catalog
            .get(variant_id)
            .cloned()
            .unwrap_or_else(|| RemoteMerchandise {
                id: variant_id.clone(),
                title: "Default Title".to_string(),
                price: Price::new(Decimal::ZERO, "USD"),
                image: None,
                product_title: variant_id.as_str().to_string(),
            })
    }
}

fn recount(cart: &mut RemoteCart) {
    cart.total_quantity = cart
        .lines
        .iter()
        .fold(0u32, |acc, l| acc.saturating_add(l.quantity));
}

/// In-memory [`CommerceClient`].
#[derive(Debug, Default)]
pub struct FakeCommerce {
    state: Mutex<FakeState>,
}

impl FakeCommerce {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `operation` fail with a 503 transport error until [`Self::succeed`].
    pub fn fail(&self, operation: Operation) {
        self.lock().failures.insert(operation);
    }

    /// Stop failing `operation`.
    pub fn succeed(&self, operation: Operation) {
        self.lock().failures.remove(&operation);
    }

    /// Queue the opaque id for the next created cart.
    pub fn queue_cart_id(&self, opaque: impl Into<String>) {
        self.lock().next_cart_ids.push(opaque.into());
    }

    /// Register product data returned for a variant.
    pub fn add_product(&self, merchandise: RemoteMerchandise) {
        self.lock()
            .catalog
            .insert(merchandise.id.clone(), merchandise);
    }

    /// Seed a remote cart.
    pub fn insert_cart(&self, mut cart: RemoteCart) {
        recount(&mut cart);
        self.lock().carts.insert(cart.id.clone(), cart);
    }

    /// Seed a remote cart with `(variant, quantity)` lines, returning it.
    pub fn seed_cart(&self, opaque: &str, lines: &[(&str, u32)]) -> RemoteCart {
        let mut state = self.lock();
        let id = CartId::new(opaque);
        let mut cart = RemoteCart {
            checkout_url: format!("https://checkout.example/cart/c/{}", id.opaque()),
            id,
            total_quantity: 0,
            lines: Vec::new(),
        };
        for (variant, quantity) in lines {
            let line_id = LineId::new(format!("gid://shopify/CartLine/{}", state.next_id()));
            let merchandise = state.merchandise(&VariantId::new(*variant));
            cart.lines.push(RemoteLine {
                id: line_id,
                quantity: *quantity,
                merchandise,
            });
        }
        recount(&mut cart);
        state.carts.insert(cart.id.clone(), cart.clone());
        cart
    }

    /// Delete a remote cart, as if it had expired.
    pub fn expire_cart(&self, cart_id: &CartId) {
        self.lock().carts.remove(cart_id);
    }

    /// Current remote state of a cart.
    #[must_use]
    pub fn cart(&self, cart_id: &CartId) -> Option<RemoteCart> {
        self.lock().carts.get(cart_id).cloned()
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of recorded calls of one operation.
    #[must_use]
    pub fn calls_to(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

impl CommerceClient for FakeCommerce {
    async fn create_cart(&self) -> Result<RemoteCart, CartError> {
        let mut state = self.lock();
        state.record(Call::new(Operation::CreateCart))?;

        let opaque = if state.next_cart_ids.is_empty() {
            format!("fake-{}", state.next_id())
        } else {
            state.next_cart_ids.remove(0)
        };
        let id = CartId::new(opaque);
        let cart = RemoteCart {
            checkout_url: format!("https://checkout.example/cart/c/{}", id.opaque()),
            id,
            total_quantity: 0,
            lines: Vec::new(),
        };
        state.carts.insert(cart.id.clone(), cart.clone());
        Ok(cart)
    }

    async fn get_cart(&self, cart_id: &CartId) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        let mut state = self.lock();
        state.record(Call {
            cart_id: Some(cart_id.clone()),
            ..Call::new(Operation::GetCart)
        })?;
        Ok(state.cart_mut(cart_id)?.clone())
    }

    async fn add_to_cart(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_variant_id(variant_id)?;
        let mut state = self.lock();
        state.record(Call {
            cart_id: Some(cart_id.clone()),
            variant_id: Some(variant_id.clone()),
            quantity: Some(quantity),
            ..Call::new(Operation::AddToCart)
        })?;

        let line_id = LineId::new(format!("gid://shopify/CartLine/{}", state.next_id()));
        let merchandise = state.merchandise(variant_id);
        let cart = state.cart_mut(cart_id)?;
        match cart
            .lines
            .iter_mut()
            .find(|l| &l.merchandise.id == variant_id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => cart.lines.push(RemoteLine {
                id: line_id,
                quantity,
                merchandise,
            }),
        }
        recount(cart);
        Ok(cart.clone())
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
        let mut state = self.lock();
        state.record(Call {
            cart_id: Some(cart_id.clone()),
            variant_id: Some(variant_id.clone()),
            line_ids: vec![line_id.clone()],
            quantity: Some(quantity),
            ..Call::new(Operation::UpdateCart)
        })?;

        let cart = state.cart_mut(cart_id)?;
        let line = cart
            .lines
            .iter_mut()
            .find(|l| &l.id == line_id)
            .ok_or_else(|| CartError::protocol(format!("User error: line {line_id} not found")))?;
        line.quantity = quantity;
        recount(cart);
        Ok(cart.clone())
    }

    async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineId,
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_line_ids([line_id])?;
        let mut state = self.lock();
        state.record(Call {
            cart_id: Some(cart_id.clone()),
            line_ids: vec![line_id.clone()],
            ..Call::new(Operation::RemoveLineItem)
        })?;

        let cart = state.cart_mut(cart_id)?;
        cart.lines.retain(|l| &l.id != line_id);
        recount(cart);
        Ok(cart.clone())
    }

    async fn remove_line_items(
        &self,
        cart_id: &CartId,
        line_ids: &[LineId],
    ) -> Result<RemoteCart, CartError> {
        require_cart_id(cart_id)?;
        require_line_ids(line_ids)?;
        if line_ids.is_empty() {
            return self.get_cart(cart_id).await;
        }

        let mut state = self.lock();
        state.record(Call {
            cart_id: Some(cart_id.clone()),
            line_ids: line_ids.to_vec(),
            ..Call::new(Operation::RemoveLineItems)
        })?;

        let cart = state.cart_mut(cart_id)?;
        cart.lines.retain(|l| !line_ids.contains(&l.id));
        recount(cart);
        Ok(cart.clone())
    }

    async fn get_checkout_url(&self, cart_id: &CartId) -> Result<String, CartError> {
        require_cart_id(cart_id)?;
        let mut state = self.lock();
        state.record(Call {
            cart_id: Some(cart_id.clone()),
            ..Call::new(Operation::GetCheckoutUrl)
        })?;
        state.cart_mut(cart_id).map(|c| c.checkout_url.clone())
    }
}

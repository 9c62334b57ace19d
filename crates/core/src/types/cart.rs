//! Local cart state and its pure transitions.
//!
//! Items are keyed by [`VariantId`]. The remote line id ([`LineId`]) is
//! tracked separately because a locally added item only learns it once the
//! backend has answered. Two rules govern that field:
//!
//! - merging a local item never replaces a known line id, it only fills a
//!   missing one;
//! - a remote response always wins ([`CartState::update_line_item_ids`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartId, LineId, VariantId};
use super::remote::{RemoteCart, RemoteLine};

/// A line in the local cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Remote line ID, `None` until reconciled with the backend.
    pub id: Option<LineId>,
    /// Product variant ID (merge key).
    pub variant_id: VariantId,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Product title.
    pub title: String,
    /// Variant title.
    pub variant_title: String,
    /// Unit price.
    pub price: Decimal,
    /// Image URL, empty when the variant has none.
    pub image: String,
}

impl CartItem {
    /// Create an item that has not been synchronized yet.
    #[must_use]
    pub fn new(variant_id: impl Into<VariantId>, quantity: u32) -> Self {
        Self {
            id: None,
            variant_id: variant_id.into(),
            quantity,
            title: String::new(),
            variant_title: String::new(),
            price: Decimal::ZERO,
            image: String::new(),
        }
    }

    /// Line total (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&RemoteLine> for CartItem {
    fn from(line: &RemoteLine) -> Self {
        Self {
            id: Some(line.id.clone()),
            variant_id: line.merchandise.id.clone(),
            quantity: line.quantity,
            title: line.merchandise.product_title.clone(),
            variant_title: line.merchandise.title.clone(),
            price: line.merchandise.price.amount,
            image: line.merchandise.image.clone().unwrap_or_default(),
        }
    }
}

/// Observable cart state.
///
/// `cart_id == None` means the cart has never been synchronized with the
/// backend. Once set it only changes through an explicit reset or clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Whether the cart drawer is open.
    pub is_open: bool,
    /// Items in insertion order.
    pub items: Vec<CartItem>,
    /// Remote cart ID.
    pub cart_id: Option<CartId>,
    /// Whether a remote operation is in flight.
    pub is_loading: bool,
}

impl CartState {
    /// Find an item by variant.
    #[must_use]
    pub fn find(&self, variant_id: &VariantId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.variant_id == variant_id)
    }

    /// Merge an item into the cart by variant.
    ///
    /// An existing item gets the incoming quantity added and adopts the
    /// incoming line id only when it has none of its own. Otherwise the item
    /// is appended.
    pub fn merge_item(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|i| i.variant_id == item.variant_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                if existing.id.is_none() {
                    existing.id = item.id;
                }
            }
            None => self.items.push(item),
        }
    }

    /// Remove the item for a variant, returning it.
    pub fn remove_item(&mut self, variant_id: &VariantId) -> Option<CartItem> {
        let index = self.items.iter().position(|i| &i.variant_id == variant_id)?;
        Some(self.items.remove(index))
    }

    /// Set the quantity of the item for a variant, returning the updated item.
    pub fn set_quantity(&mut self, variant_id: &VariantId, quantity: u32) -> Option<&CartItem> {
        let item = self.items.iter_mut().find(|i| &i.variant_id == variant_id)?;
        item.quantity = quantity;
        Some(item)
    }

    /// Adopt remote line ids into the local items with matching variants.
    ///
    /// Lines without a local counterpart are ignored.
    pub fn update_line_item_ids(&mut self, lines: &[RemoteLine]) {
        for line in lines {
            if let Some(item) = self
                .items
                .iter_mut()
                .find(|i| i.variant_id == line.merchandise.id)
            {
                item.id = Some(line.id.clone());
            }
        }
    }

    /// Overwrite the local items with the remote cart's lines.
    pub fn replace_from_remote(&mut self, cart: &RemoteCart) {
        self.items = cart.lines.iter().map(CartItem::from).collect();
    }

    /// Line ids of every item that has been reconciled.
    #[must_use]
    pub fn line_ids(&self) -> Vec<LineId> {
        self.items.iter().filter_map(|i| i.id.clone()).collect()
    }

    /// Total quantity across items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::price::Price;
    use crate::types::remote::RemoteMerchandise;

    fn remote_line(id: &str, variant: &str, quantity: u32) -> RemoteLine {
        RemoteLine {
            id: LineId::new(id),
            quantity,
            merchandise: RemoteMerchandise {
                id: VariantId::new(variant),
                title: "Large".to_string(),
                price: Price::new(Decimal::new(1000, 2), "USD"),
                image: None,
                product_title: "Tee".to_string(),
            },
        }
    }

    #[test]
    fn test_merge_same_variant_increments_quantity() {
        let mut state = CartState::default();
        state.merge_item(CartItem::new("v1", 1));
        state.merge_item(CartItem::new("v1", 1));

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 2);
    }

    #[test]
    fn test_merge_appends_in_insertion_order() {
        let mut state = CartState::default();
        state.merge_item(CartItem::new("v2", 1));
        state.merge_item(CartItem::new("v1", 3));

        let variants: Vec<_> = state.items.iter().map(|i| i.variant_id.as_str()).collect();
        assert_eq!(variants, ["v2", "v1"]);
    }

    #[test]
    fn test_merge_fills_missing_line_id() {
        let mut state = CartState::default();
        state.merge_item(CartItem::new("v1", 1));

        let mut incoming = CartItem::new("v1", 1);
        incoming.id = Some(LineId::new("line1"));
        state.merge_item(incoming);

        assert_eq!(state.items[0].id, Some(LineId::new("line1")));
    }

    #[test]
    fn test_merge_keeps_existing_line_id() {
        let mut state = CartState::default();
        let mut first = CartItem::new("v1", 1);
        first.id = Some(LineId::new("line1"));
        state.merge_item(first);

        let mut incoming = CartItem::new("v1", 1);
        incoming.id = Some(LineId::new("line2"));
        state.merge_item(incoming);

        assert_eq!(state.items[0].id, Some(LineId::new("line1")));
    }

    #[test]
    fn test_remove_item() {
        let mut state = CartState::default();
        state.merge_item(CartItem::new("v1", 1));
        state.merge_item(CartItem::new("v2", 1));

        let removed = state.remove_item(&VariantId::new("v1")).unwrap();
        assert_eq!(removed.variant_id.as_str(), "v1");
        assert_eq!(state.items.len(), 1);
        assert!(state.remove_item(&VariantId::new("missing")).is_none());
    }

    #[test]
    fn test_update_line_item_ids() {
        let mut state = CartState::default();
        state.merge_item(CartItem::new("v1", 1));
        state.merge_item(CartItem::new("v2", 1));

        state.update_line_item_ids(&[remote_line("line123", "v1", 1), remote_line("x", "v9", 1)]);

        assert_eq!(state.items[0].id, Some(LineId::new("line123")));
        assert_eq!(state.items[1].id, None);
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn test_update_line_item_ids_remote_wins() {
        let mut state = CartState::default();
        let mut item = CartItem::new("v1", 1);
        item.id = Some(LineId::new("stale"));
        state.merge_item(item);

        state.update_line_item_ids(&[remote_line("fresh", "v1", 1)]);

        assert_eq!(state.items[0].id, Some(LineId::new("fresh")));
    }

    #[test]
    fn test_replace_from_remote() {
        let mut state = CartState::default();
        state.merge_item(CartItem::new("local-only", 1));

        let cart = RemoteCart {
            id: CartId::new("abc"),
            checkout_url: "https://shop.example/checkout".to_string(),
            total_quantity: 2,
            lines: vec![remote_line("line1", "v1", 2)],
        };
        state.replace_from_remote(&cart);

        assert_eq!(state.items.len(), 1);
        let item = &state.items[0];
        assert_eq!(item.id, Some(LineId::new("line1")));
        assert_eq!(item.title, "Tee");
        assert_eq!(item.variant_title, "Large");
        assert_eq!(item.price, Decimal::new(10, 0));
        assert_eq!(item.image, "");
    }

    #[test]
    fn test_totals() {
        let mut state = CartState::default();
        let mut item = CartItem::new("v1", 3);
        item.price = Decimal::new(250, 2);
        state.merge_item(item);
        state.merge_item(CartItem::new("v2", 1));

        assert_eq!(state.total_quantity(), 4);
        assert_eq!(state.subtotal(), Decimal::new(750, 2));
        assert!(state.line_ids().is_empty());
    }
}

//! Cart commands.
//!
//! Each command runs after the cart store has been initialized and renders
//! the resulting cart through `tracing`.

use cartwheel_core::{CartError, CartItem, CartState, VariantId};
use cartwheel_storefront::state::AppState;
use rust_decimal::Decimal;
use tracing::info;

use super::CommandError;

/// Item details for `cartwheel add`.
pub struct NewItem {
    pub variant_id: String,
    pub quantity: u32,
    pub title: Option<String>,
    pub variant_title: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
}

impl From<NewItem> for CartItem {
    fn from(item: NewItem) -> Self {
        Self {
            title: item.title.unwrap_or_default(),
            variant_title: item.variant_title.unwrap_or_default(),
            price: item.price.unwrap_or_default(),
            image: item.image.unwrap_or_default(),
            ..Self::new(item.variant_id, item.quantity)
        }
    }
}

pub fn show(state: &AppState) -> Result<(), CommandError> {
    render(&state.cart().snapshot());
    Ok(())
}

pub async fn add(state: &AppState, item: NewItem) -> Result<(), CommandError> {
    state.cart().add_item(item.into()).await?;
    render(&state.cart().snapshot());
    Ok(())
}

pub async fn add_product(
    state: &AppState,
    handle: &str,
    variant: Option<&str>,
    quantity: u32,
) -> Result<(), CommandError> {
    let product = state
        .storefront()
        .product_by_handle(handle)
        .await
        .map_err(CartError::from)?;

    let chosen = match variant {
        Some(title) => product
            .variant_by_title(title)
            .ok_or_else(|| CommandError::VariantNotFound {
                handle: handle.to_string(),
                variant: title.to_string(),
            })?,
        None => product
            .default_variant()
            .ok_or_else(|| CommandError::NoVariants(handle.to_string()))?,
    };

    if !chosen.available_for_sale {
        tracing::warn!(variant = %chosen.title, "Variant is not available for sale");
    }

    state
        .cart()
        .add_item(product.cart_item(chosen, quantity))
        .await?;
    render(&state.cart().snapshot());
    Ok(())
}

pub async fn remove(state: &AppState, variant_id: &str) -> Result<(), CommandError> {
    state.cart().remove_item(&VariantId::new(variant_id)).await?;
    render(&state.cart().snapshot());
    Ok(())
}

pub async fn update(state: &AppState, variant_id: &str, quantity: i64) -> Result<(), CommandError> {
    state
        .cart()
        .update_quantity(&VariantId::new(variant_id), quantity)
        .await?;
    render(&state.cart().snapshot());
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<(), CommandError> {
    state.cart().clear_items().await?;
    render(&state.cart().snapshot());
    Ok(())
}

pub async fn checkout(state: &AppState) -> Result<(), CommandError> {
    let url = state.cart().checkout().await?;
    info!("Checkout: {url}");
    Ok(())
}

pub async fn sync(state: &AppState) -> Result<(), CommandError> {
    state.cart().sync_from_remote().await?;
    render(&state.cart().snapshot());
    Ok(())
}

pub fn reset(state: &AppState) -> Result<(), CommandError> {
    state.cart().reset()?;
    info!(
        path = %state.config().cart_file.display(),
        "Forgot stored cart"
    );
    Ok(())
}

fn render(cart: &CartState) {
    for line in render_lines(cart) {
        info!("{line}");
    }
}

fn render_lines(cart: &CartState) -> Vec<String> {
    let mut lines = Vec::with_capacity(cart.items.len() + 2);

    lines.push(match &cart.cart_id {
        Some(id) => format!("Cart {}", id.opaque()),
        None => "Cart (not synced)".to_string(),
    });

    if cart.items.is_empty() {
        lines.push("  (empty)".to_string());
        return lines;
    }

    for item in &cart.items {
        let name = match (item.title.as_str(), item.variant_title.as_str()) {
            ("", _) => item.variant_id.as_str().to_string(),
            (title, "" | "Default Title") => title.to_string(),
            (title, variant) => format!("{title} - {variant}"),
        };
        lines.push(format!(
            "  {:>3} x {name}  {}",
            item.quantity,
            item.line_total().round_dp(2)
        ));
    }

    lines.push(format!(
        "  {} item(s), subtotal {}",
        cart.total_quantity(),
        cart.subtotal().round_dp(2)
    ));
    lines
}

//! Cart page logic: line edits, wishlist moves and the order summary.

use std::sync::Arc;

use commerce_core::{Action, CommerceError, ItemId, Product, Result, SessionState, Store};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Orders at or above this subtotal ship free with [`ShippingOption::Standard`].
pub const FREE_SHIPPING_THRESHOLD: f64 = 50.0;
pub const PROMO_DISCOUNT_RATE: f64 = 0.10;
pub const TAX_RATE: f64 = 0.08;
/// The only accepted promo code, compared case-insensitively.
pub const PROMO_CODE: &str = "save10";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShippingOption {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingOption {
    /// Listed price before the free-shipping rule.
    pub fn price(self) -> f64 {
        match self {
            ShippingOption::Standard => 0.0,
            ShippingOption::Express => 9.99,
            ShippingOption::Overnight => 24.99,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShippingOption::Standard => "Standard Shipping",
            ShippingOption::Express => "Express Shipping",
            ShippingOption::Overnight => "Overnight Shipping",
        }
    }

    /// Cost charged for an order with `subtotal`.
    pub fn cost_for(self, subtotal: f64) -> f64 {
        if self == ShippingOption::Standard && subtotal >= FREE_SHIPPING_THRESHOLD {
            0.0
        } else {
            self.price()
        }
    }
}

/// Order totals shown beside the cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: f64,
    pub shipping: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
}

impl CartSummary {
    pub fn compute(state: &SessionState, shipping: ShippingOption, promo_applied: bool) -> Self {
        let subtotal = state.cart_subtotal();
        let shipping = shipping.cost_for(subtotal);
        let discount = if promo_applied {
            subtotal * PROMO_DISCOUNT_RATE
        } else {
            0.0
        };
        let tax = (subtotal - discount) * TAX_RATE;

        Self {
            item_count: state.cart_item_count(),
            subtotal,
            shipping,
            discount,
            tax,
            total: subtotal + shipping - discount + tax,
        }
    }

    pub fn is_free_shipping(&self) -> bool {
        self.shipping == 0.0
    }
}

/// Returns whether `code` is a valid promo code.
pub fn apply_promo_code(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(PROMO_CODE)
}

/// Cart and wishlist operations on a shared [`Store`].
#[derive(Debug, Clone)]
pub struct CartUseCase {
    store: Arc<Store>,
}

impl CartUseCase {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn add(&self, product: Product) {
        tracing::debug!("[CartUseCase] Adding {} to cart", product.id);
        self.store.dispatch(Action::AddToCart(product));
    }

    pub fn remove(&self, id: &ItemId) {
        self.store.dispatch(Action::RemoveFromCart(id.clone()));
    }

    pub fn clear(&self) {
        self.store.dispatch(Action::ClearCart);
    }

    /// Sets a line's quantity; zero or below removes the line.
    pub fn update_quantity(&self, id: &ItemId, quantity: i64) {
        let action = if quantity <= 0 {
            Action::RemoveFromCart(id.clone())
        } else {
            Action::UpdateCartQuantity {
                id: id.clone(),
                quantity,
            }
        };
        self.store.dispatch(action);
    }

    /// Removes the line from the cart and saves the product for later.
    pub fn move_to_wishlist(&self, product: Product) {
        self.store.dispatch(Action::RemoveFromCart(product.id.clone()));
        self.store.dispatch(Action::AddToWishlist(product));
    }

    /// Adds or removes `product` from the wishlist. Returns true when it is
    /// wishlisted afterwards.
    pub fn toggle_wishlist(&self, product: Product) -> bool {
        if self.store.get_state().is_in_wishlist(&product.id) {
            self.store.dispatch(Action::RemoveFromWishlist(product.id));
            false
        } else {
            self.store.dispatch(Action::AddToWishlist(product));
            true
        }
    }

    pub fn summary(&self, shipping: ShippingOption, promo_applied: bool) -> CartSummary {
        CartSummary::compute(&self.store.get_state(), shipping, promo_applied)
    }

    /// Fails with [`CommerceError::EmptyCart`] when there is nothing to buy.
    pub fn checkout_ready(&self) -> Result<()> {
        if self.store.get_state().cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(())
    }
}

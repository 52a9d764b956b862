//! Session state aggregate.

use serde::{Deserialize, Serialize};

use crate::model::{
    Analytics, CartItem, CollaborativeSession, GamificationData, ItemId, Notification, Product,
    UserIdentity,
};

/// Maximum number of notifications kept, newest first.
pub const MAX_NOTIFICATIONS: usize = 10;
/// Maximum number of recently viewed products kept, newest first.
pub const MAX_RECENTLY_VIEWED: usize = 20;
/// Maximum number of search terms kept, newest first.
pub const MAX_SEARCH_HISTORY: usize = 10;

/// Everything the store holds for the current process lifetime.
///
/// Only [`crate::reducer::reduce`] produces new values of this type once the
/// store is running; consumers get shared, read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    pub user: Option<UserIdentity>,
    pub cart: Vec<CartItem>,
    pub wishlist: Vec<Product>,
    pub collaborative_session: Option<CollaborativeSession>,
    pub voice_enabled: bool,
    pub ar_enabled: bool,
    pub sustainability_mode: bool,
    pub notifications: Vec<Notification>,
    pub recently_viewed: Vec<Product>,
    pub search_history: Vec<String>,
    pub personalized_recommendations: Vec<Product>,
    pub gamification_data: GamificationData,
    pub analytics: Analytics,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            cart: Vec::new(),
            wishlist: Vec::new(),
            collaborative_session: None,
            voice_enabled: false,
            ar_enabled: false,
            sustainability_mode: false,
            notifications: Vec::new(),
            recently_viewed: Vec::new(),
            search_history: Vec::new(),
            personalized_recommendations: Vec::new(),
            gamification_data: GamificationData::default(),
            analytics: Analytics::default(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of units in the cart (sum of quantities).
    pub fn cart_item_count(&self) -> u64 {
        self.cart.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over the cart.
    pub fn cart_subtotal(&self) -> f64 {
        self.cart.iter().map(CartItem::line_total).sum()
    }

    pub fn cart_entry(&self, id: &ItemId) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.id() == id)
    }

    pub fn is_in_cart(&self, id: &ItemId) -> bool {
        self.cart_entry(id).is_some()
    }

    pub fn is_in_wishlist(&self, id: &ItemId) -> bool {
        self.wishlist.iter().any(|product| &product.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let state = SessionState::new();
        assert!(state.user.is_none());
        assert!(state.cart.is_empty());
        assert!(state.wishlist.is_empty());
        assert!(state.collaborative_session.is_none());
        assert!(!state.voice_enabled && !state.ar_enabled);
        assert!(!state.sustainability_mode);
        assert_eq!(state.gamification_data.level, 1);
        assert_eq!(state.gamification_data.points, 0);
        assert_eq!(state.analytics, Analytics::default());
    }

    #[test]
    fn test_cart_totals() {
        let mut state = SessionState::new();
        let mut earbuds = CartItem::new(Product::new("1", "Earbuds", 199.99));
        earbuds.quantity = 2;
        state.cart.push(earbuds);
        state.cart.push(CartItem::new(Product::new("2", "Bottle", 25.0)));

        assert_eq!(state.cart_item_count(), 3);
        assert!((state.cart_subtotal() - 424.98).abs() < 1e-9);
        assert!(state.is_in_cart(&ItemId::from("2")));
        assert!(!state.is_in_wishlist(&ItemId::from("2")));
    }
}

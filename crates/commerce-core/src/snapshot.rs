//! Persisted projection of the session state and startup hydration.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::model::{
    Analytics, AnalyticsUpdate, CartItem, GamificationData, GamificationUpdate, Product,
};
use crate::reducer::reduce;
use crate::state::SessionState;

/// The subset of [`SessionState`] written to durable storage.
///
/// Every field defaults when missing and unknown fields are ignored, so
/// snapshots written by older or newer builds still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSnapshot {
    pub cart: Vec<CartItem>,
    pub wishlist: Vec<Product>,
    pub recently_viewed: Vec<Product>,
    pub search_history: Vec<String>,
    pub gamification_data: GamificationData,
    pub analytics: Analytics,
}

impl From<&SessionState> for PersistedSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            cart: state.cart.clone(),
            wishlist: state.wishlist.clone(),
            recently_viewed: state.recently_viewed.clone(),
            search_history: state.search_history.clone(),
            gamification_data: state.gamification_data.clone(),
            analytics: state.analytics.clone(),
        }
    }
}

/// Which parts of a persisted snapshot are restored at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationMode {
    /// Cart and wishlist only; everything else starts from defaults.
    #[default]
    CartAndWishlist,
    /// Cart, wishlist, recently viewed, search history, gamification and analytics.
    Full,
}

/// Rebuilds session state from a snapshot by replaying actions through the reducer.
///
/// Each cart line is replayed as `AddToCart` followed by `UpdateCartQuantity`
/// so the stored quantity survives; repeated ids accumulate. Wishlist entries
/// are replayed as `AddToWishlist`, which drops duplicates.
pub fn hydrate(
    mut state: SessionState,
    snapshot: PersistedSnapshot,
    mode: HydrationMode,
) -> SessionState {
    for line in snapshot.cart {
        let id = line.id().clone();
        let existing = state.cart_entry(&id).map_or(0, |entry| entry.quantity);
        let quantity = i64::from(existing) + i64::from(line.quantity);

        state = reduce(state, &Action::AddToCart(line.product));
        state = reduce(state, &Action::UpdateCartQuantity { id, quantity });
    }

    for product in snapshot.wishlist {
        state = reduce(state, &Action::AddToWishlist(product));
    }

    if mode == HydrationMode::Full {
        // Lists are stored newest first; replay oldest first to keep the order.
        for product in snapshot.recently_viewed.into_iter().rev() {
            state = reduce(state, &Action::AddToRecentlyViewed(product));
        }
        for term in snapshot.search_history.into_iter().rev() {
            state = reduce(state, &Action::AddToSearchHistory(term));
        }

        let gamification = snapshot.gamification_data;
        state = reduce(
            state,
            &Action::UpdateGamification(GamificationUpdate {
                points: Some(gamification.points),
                level: Some(gamification.level),
                badges: Some(gamification.badges),
                streaks: Some(gamification.streaks),
            }),
        );

        let analytics = snapshot.analytics;
        state = reduce(
            state,
            &Action::UpdateAnalytics(AnalyticsUpdate {
                carbon_footprint: Some(analytics.carbon_footprint),
                sustainability_score: Some(analytics.sustainability_score),
                total_spent: Some(analytics.total_spent),
                items_purchased: Some(analytics.items_purchased),
            }),
        );
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_state() -> SessionState {
        [
            Action::AddToCart(Product::new("p1", "Earbuds", 20.0)),
            Action::AddToCart(Product::new("p2", "Lamp", 35.0)),
            Action::UpdateCartQuantity {
                id: "p1".into(),
                quantity: 3,
            },
            Action::AddToWishlist(Product::new("w1", "Jacket", 80.0)),
            Action::AddToWishlist(Product::new("w2", "Scarf", 15.0)),
            Action::AddToRecentlyViewed(Product::new("r1", "Old", 1.0)),
            Action::AddToRecentlyViewed(Product::new("r2", "New", 1.0)),
            Action::AddToSearchHistory("first".to_string()),
            Action::AddToSearchHistory("second".to_string()),
            Action::UpdateGamification(GamificationUpdate {
                points: Some(275),
                level: Some(2),
                ..Default::default()
            }),
            Action::ToggleVoice,
        ]
        .iter()
        .fold(SessionState::new(), reduce)
    }

    #[test]
    fn test_projection_has_exactly_the_persisted_fields() {
        let value = serde_json::to_value(PersistedSnapshot::from(&sample_state())).unwrap();
        let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "analytics",
                "cart",
                "gamificationData",
                "recentlyViewed",
                "searchHistory",
                "wishlist"
            ]
        );
    }

    #[test]
    fn test_round_trip_restores_cart_and_wishlist() {
        let original = sample_state();
        let json = serde_json::to_string(&PersistedSnapshot::from(&original)).unwrap();

        let snapshot: PersistedSnapshot = serde_json::from_str(&json).unwrap();
        let mode = HydrationMode::CartAndWishlist;
        let restored = hydrate(SessionState::new(), snapshot, mode);

        assert_eq!(restored.cart, original.cart);
        assert_eq!(restored.wishlist, original.wishlist);
        assert!(restored.recently_viewed.is_empty());
        assert!(restored.search_history.is_empty());
        assert_eq!(restored.gamification_data, GamificationData::default());
        assert!(!restored.voice_enabled);
    }

    #[test]
    fn test_full_hydration_restores_history_and_counters() {
        let original = sample_state();
        let snapshot = PersistedSnapshot::from(&original);
        let restored = hydrate(SessionState::new(), snapshot, HydrationMode::Full);

        assert_eq!(restored.cart, original.cart);
        assert_eq!(restored.recently_viewed, original.recently_viewed);
        assert_eq!(restored.search_history, original.search_history);
        assert_eq!(restored.gamification_data, original.gamification_data);
        assert_eq!(restored.analytics, original.analytics);
        assert!(!restored.voice_enabled);
    }

    #[test]
    fn test_duplicate_cart_lines_accumulate() {
        let snapshot: PersistedSnapshot = serde_json::from_value(json!({
            "cart": [
                {"id": 1, "name": "Mug", "price": 5, "quantity": 2},
                {"id": "1", "name": "Mug (dup)", "price": 6, "quantity": 3}
            ],
            "wishlist": [{"id": 9}, {"id": 9}]
        }))
        .unwrap();

        let mode = HydrationMode::CartAndWishlist;
        let restored = hydrate(SessionState::new(), snapshot, mode);
        assert_eq!(restored.cart.len(), 1);
        assert_eq!(restored.cart[0].quantity, 5);
        assert_eq!(restored.cart[0].product.name, "Mug");
        assert_eq!(restored.wishlist.len(), 1);
    }

    #[test]
    fn test_missing_and_unknown_fields_tolerated() {
        let snapshot: PersistedSnapshot = serde_json::from_value(json!({
            "cart": [{"id": "a", "price": 1.5}],
            "schemaVersion": 4,
            "theme": "dark"
        }))
        .unwrap();

        assert_eq!(snapshot.cart[0].quantity, 1);
        assert!(snapshot.wishlist.is_empty());
        assert_eq!(snapshot.gamification_data.level, 1);
    }
}

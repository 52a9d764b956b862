//! The pure transition function.

use crate::action::Action;
use crate::model::CartItem;
use crate::state::{MAX_NOTIFICATIONS, MAX_RECENTLY_VIEWED, MAX_SEARCH_HISTORY, SessionState};

/// Applies `action` to `state` and returns the next state.
///
/// No I/O, clock or randomness happens here; the same inputs always produce
/// the same output. Unknown actions return `state` as it came in.
pub fn reduce(mut state: SessionState, action: &Action) -> SessionState {
    match action {
        Action::SetUser(user) => {
            state.user = user.clone();
        }

        Action::AddToCart(product) => {
            match state.cart.iter_mut().find(|item| item.id() == &product.id) {
                // Keep the first-added price and attributes.
                Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
                None => state.cart.push(CartItem::new(product.clone())),
            }
        }

        Action::RemoveFromCart(id) => {
            state.cart.retain(|item| item.id() != id);
        }

        Action::UpdateCartQuantity { id, quantity } => {
            if *quantity <= 0 {
                state.cart.retain(|item| item.id() != id);
            } else if let Some(existing) = state.cart.iter_mut().find(|item| item.id() == id) {
                existing.quantity = u32::try_from(*quantity).unwrap_or(u32::MAX);
            }
        }

        Action::ClearCart => {
            state.cart.clear();
        }

        Action::AddToWishlist(product) => {
            if !state.is_in_wishlist(&product.id) {
                state.wishlist.push(product.clone());
            }
        }

        Action::RemoveFromWishlist(id) => {
            state.wishlist.retain(|product| &product.id != id);
        }

        Action::SetCollaborativeSession(session) => {
            state.collaborative_session = session.clone();
        }

        Action::ToggleVoice => state.voice_enabled = !state.voice_enabled,
        Action::ToggleAr => state.ar_enabled = !state.ar_enabled,
        Action::ToggleSustainability => state.sustainability_mode = !state.sustainability_mode,

        Action::AddNotification(notification) => {
            state.notifications.insert(0, notification.clone());
            state.notifications.truncate(MAX_NOTIFICATIONS);
        }

        Action::RemoveNotification(id) => {
            state.notifications.retain(|notification| &notification.id != id);
        }

        Action::AddToRecentlyViewed(product) => {
            state.recently_viewed.retain(|viewed| viewed.id != product.id);
            state.recently_viewed.insert(0, product.clone());
            state.recently_viewed.truncate(MAX_RECENTLY_VIEWED);
        }

        Action::AddToSearchHistory(term) => {
            state.search_history.retain(|existing| existing != term);
            state.search_history.insert(0, term.clone());
            state.search_history.truncate(MAX_SEARCH_HISTORY);
        }

        Action::SetRecommendations(products) => {
            state.personalized_recommendations = products.clone();
        }

        Action::UpdateGamification(update) => {
            state.gamification_data.merge(update);
        }

        Action::UpdateAnalytics(update) => {
            state.analytics.merge(update);
        }

        Action::Unknown(_) => {}
    }

    state
}

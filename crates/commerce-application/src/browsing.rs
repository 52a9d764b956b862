//! Search history, recently viewed products and recommendations.

use std::sync::Arc;

use commerce_core::{Action, Product, Store};

/// Number of recent searches the search bar shows.
pub const SEARCH_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct BrowsingService {
    store: Arc<Store>,
}

impl BrowsingService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Records a submitted search. Blank queries are ignored.
    pub fn record_search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.store.dispatch(Action::AddToSearchHistory(query.to_string()));
    }

    /// Newest-first searches, at most `limit`.
    pub fn recent_searches(&self, limit: usize) -> Vec<String> {
        self.store
            .get_state()
            .search_history
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn view_product(&self, product: Product) {
        self.store.dispatch(Action::AddToRecentlyViewed(product));
    }

    pub fn set_recommendations(&self, recommendations: Vec<Product>) {
        tracing::debug!(
            "[BrowsingService] {} recommendation(s)",
            recommendations.len()
        );
        self.store.dispatch(Action::SetRecommendations(recommendations));
    }
}

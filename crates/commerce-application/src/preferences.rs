//! Feature toggles and the sustainability/purchase counters.

use std::sync::Arc;

use commerce_core::{Action, Analytics, AnalyticsUpdate, Store};

#[derive(Debug, Clone)]
pub struct PreferencesService {
    store: Arc<Store>,
}

impl PreferencesService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Returns the new value.
    pub fn toggle_voice(&self) -> bool {
        self.store.dispatch(Action::ToggleVoice).voice_enabled
    }

    pub fn toggle_ar(&self) -> bool {
        self.store.dispatch(Action::ToggleAr).ar_enabled
    }

    pub fn toggle_sustainability(&self) -> bool {
        let state = self.store.dispatch(Action::ToggleSustainability);
        state.sustainability_mode
    }

    pub fn analytics(&self) -> Analytics {
        self.store.get_state().analytics.clone()
    }

    pub fn record_sustainability(
        &self,
        carbon_footprint: f64,
        sustainability_score: f64,
    ) -> Analytics {
        self.apply(AnalyticsUpdate {
            carbon_footprint: Some(carbon_footprint),
            sustainability_score: Some(sustainability_score),
            ..Default::default()
        })
    }

    /// Adds a completed order to the running totals.
    pub fn record_purchase(&self, amount: f64, items: u64) -> Analytics {
        let current = self.analytics();
        self.apply(AnalyticsUpdate {
            total_spent: Some(current.total_spent + amount),
            items_purchased: Some(current.items_purchased.saturating_add(items)),
            ..Default::default()
        })
    }

    fn apply(&self, update: AnalyticsUpdate) -> Analytics {
        let state = self.store.dispatch(Action::UpdateAnalytics(update));
        state.analytics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce_core::SessionState;

    fn service() -> PreferencesService {
        PreferencesService::new(Arc::new(Store::new()))
    }

    #[test]
    fn test_toggles_flip() {
        let preferences = service();
        assert!(preferences.toggle_voice());
        assert!(!preferences.toggle_voice());
        assert!(preferences.toggle_ar());
        assert!(preferences.toggle_sustainability());

        let state = preferences.store.get_state();
        assert!(!state.voice_enabled);
        assert!(state.ar_enabled);
        assert!(state.sustainability_mode);
    }

    #[test]
    fn test_record_sustainability_keeps_totals() {
        let preferences = service();
        preferences.record_purchase(42.0, 2);
        let analytics = preferences.record_sustainability(12.5, 78.0);

        assert_eq!(analytics.carbon_footprint, 12.5);
        assert_eq!(analytics.sustainability_score, 78.0);
        assert_eq!(analytics.total_spent, 42.0);
        assert_eq!(analytics.items_purchased, 2);
    }

    #[test]
    fn test_record_purchase_accumulates() {
        let preferences = service();
        preferences.record_purchase(100.0, 1);
        let analytics = preferences.record_purchase(50.5, 3);

        assert_eq!(analytics.total_spent, 150.5);
        assert_eq!(analytics.items_purchased, 4);
    }

    #[test]
    fn test_record_purchase_saturates_item_count() {
        let mut state = SessionState::default();
        state.analytics.items_purchased = u64::MAX - 1;
        let preferences = PreferencesService::new(Arc::new(Store::with_state(state)));

        let analytics = preferences.record_purchase(10.0, 5);
        assert_eq!(analytics.items_purchased, u64::MAX);
        assert_eq!(analytics.total_spent, 10.0);
    }
}

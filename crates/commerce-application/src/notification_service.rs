//! In-app notifications: creation, dismissal and the header badge.

use std::sync::Arc;

use chrono::Utc;
use commerce_core::{Action, EntityId, Notification, NotificationKind, Store};
use uuid::Uuid;

/// Counts above this are shown as "9+".
const BADGE_LIMIT: usize = 9;

#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<Store>,
}

impl NotificationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Pushes a new unread notification and returns its id.
    ///
    /// Only the newest ten are kept; older ones fall off the end.
    pub fn notify(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> EntityId {
        let id = EntityId::new(Uuid::new_v4().to_string());
        let notification = Notification {
            id: id.clone(),
            kind,
            title: title.into(),
            message: message.into(),
            created_at: Some(Utc::now()),
            read: false,
        };

        self.store.dispatch(Action::AddNotification(notification));
        id
    }

    pub fn dismiss(&self, id: &EntityId) {
        self.store.dispatch(Action::RemoveNotification(id.clone()));
    }

    /// Removes every notification, one dispatch each.
    pub fn clear_all(&self) {
        let state = self.store.get_state();
        for notification in &state.notifications {
            self.store.dispatch(Action::RemoveNotification(notification.id.clone()));
        }
    }

    pub fn count(&self) -> usize {
        self.store.get_state().notifications.len()
    }

    /// Text for the header badge; `None` hides it.
    pub fn badge_label(&self) -> Option<String> {
        match self.count() {
            0 => None,
            n if n > BADGE_LIMIT => Some(format!("{}+", BADGE_LIMIT)),
            n => Some(n.to_string()),
        }
    }
}

//! Shopping together: a session with friends and a shared cart.

use std::sync::Arc;

use commerce_core::{Action, CollaborativeSession, EntityId, Participant, Product, Store};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CollaborationService {
    store: Arc<Store>,
}

impl CollaborationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn session(&self) -> Option<CollaborativeSession> {
        self.store.get_state().collaborative_session.clone()
    }

    /// Replaces any active session with a new one that has an empty shared cart.
    pub fn start_session(
        &self,
        name: impl Into<String>,
        participants: Vec<Participant>,
    ) -> CollaborativeSession {
        let session = CollaborativeSession {
            id: EntityId::new(Uuid::new_v4().to_string()),
            name: Some(name.into()),
            participants,
            shared_cart: Vec::new(),
        };
        tracing::info!(
            "[CollaborationService] Started session {} with {} participant(s)",
            session.id,
            session.participants.len()
        );

        self.store.dispatch(Action::SetCollaborativeSession(Some(session.clone())));
        session
    }

    pub fn end_session(&self) {
        self.store.dispatch(Action::SetCollaborativeSession(None));
    }

    /// Adds `product` to the shared cart. Returns false when there is no
    /// session or the product is already shared.
    pub fn share_product(&self, product: Product) -> bool {
        let Some(mut session) = self.session() else {
            return false;
        };
        if session.shared_cart.iter().any(|p| p.id == product.id) {
            return false;
        }

        session.shared_cart.push(product);
        self.store.dispatch(Action::SetCollaborativeSession(Some(session)));
        true
    }

    /// Participants other than the host.
    pub fn friends_count(&self) -> usize {
        let Some(session) = self.session() else {
            return 0;
        };
        session.participants.iter().filter(|p| !p.is_host).count()
    }
}

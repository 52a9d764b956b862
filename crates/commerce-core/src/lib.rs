//! Core domain for the NextGen Commerce client state.
//!
//! The store holds cart, wishlist, notifications, browsing history and
//! gamification counters for one process. Mutations go through
//! [`Store::dispatch`] with a typed [`Action`]; the transition itself is the
//! pure [`reducer::reduce`]. Durable storage sits behind
//! [`SnapshotRepository`], implemented in `commerce-infrastructure`.

pub mod action;
pub mod error;
pub mod model;
pub mod reducer;
pub mod repository;
pub mod snapshot;
pub mod state;
pub mod store;

pub use action::{Action, ActionKind, RawAction};
pub use error::{CommerceError, Result};
pub use model::{
    Analytics, AnalyticsUpdate, CartItem, CollaborativeSession, EntityId, GamificationData,
    GamificationUpdate, ItemId, Notification, NotificationKind, Participant, Product, UserIdentity,
};
pub use repository::SnapshotRepository;
pub use snapshot::{HydrationMode, PersistedSnapshot};
pub use state::SessionState;
pub use store::{Store, Subscription};

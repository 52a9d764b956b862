//! Application layer for NextGen Commerce.
//!
//! Use cases here wrap a shared [`commerce_core::Store`] and translate user
//! intents (add to cart, claim a reward, start a group session) into actions.
//! [`bootstrap`] wires configuration, storage and logging at process start.

pub mod bootstrap;
pub mod browsing;
pub mod cart_usecase;
pub mod collaboration;
pub mod gamification;
pub mod notification_service;
pub mod preferences;

pub use bootstrap::{bootstrap, bootstrap_from_paths, init_tracing};
pub use browsing::BrowsingService;
pub use cart_usecase::{CartSummary, CartUseCase, ShippingOption};
pub use collaboration::CollaborationService;
pub use gamification::{GamificationService, Level, Prize};
pub use notification_service::NotificationService;
pub use preferences::PreferencesService;

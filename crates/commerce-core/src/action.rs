//! Store actions.
//!
//! [`Action`] is the closed set of mutations the reducer understands. On the
//! wire an action looks like `{"type": "ADD_TO_CART", "payload": {...}}`;
//! [`RawAction`] is that envelope before the payload has been decoded.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{CommerceError, Result};
use crate::model::{
    AnalyticsUpdate, CollaborativeSession, EntityId, GamificationUpdate, ItemId, Notification,
    Product, UserIdentity,
};

/// A state transition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetUser(Option<UserIdentity>),
    AddToCart(Product),
    RemoveFromCart(ItemId),
    /// Sets the quantity verbatim; zero or below removes the line.
    UpdateCartQuantity { id: ItemId, quantity: i64 },
    ClearCart,
    AddToWishlist(Product),
    RemoveFromWishlist(ItemId),
    SetCollaborativeSession(Option<CollaborativeSession>),
    ToggleVoice,
    ToggleAr,
    ToggleSustainability,
    AddNotification(Notification),
    RemoveNotification(EntityId),
    AddToRecentlyViewed(Product),
    AddToSearchHistory(String),
    SetRecommendations(Vec<Product>),
    UpdateGamification(GamificationUpdate),
    UpdateAnalytics(AnalyticsUpdate),
    /// An action name outside the known set. Reduces to the unchanged state.
    #[serde(skip)]
    Unknown(String),
}

/// Names of the known actions, as they appear in the `type` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    SetUser,
    AddToCart,
    RemoveFromCart,
    UpdateCartQuantity,
    ClearCart,
    AddToWishlist,
    RemoveFromWishlist,
    SetCollaborativeSession,
    ToggleVoice,
    ToggleAr,
    ToggleSustainability,
    AddNotification,
    RemoveNotification,
    AddToRecentlyViewed,
    AddToSearchHistory,
    SetRecommendations,
    UpdateGamification,
    UpdateAnalytics,
}

impl Action {
    /// The kind of this action, or `None` for [`Action::Unknown`].
    pub fn kind(&self) -> Option<ActionKind> {
        Some(match self {
            Self::SetUser(_) => ActionKind::SetUser,
            Self::AddToCart(_) => ActionKind::AddToCart,
            Self::RemoveFromCart(_) => ActionKind::RemoveFromCart,
            Self::UpdateCartQuantity { .. } => ActionKind::UpdateCartQuantity,
            Self::ClearCart => ActionKind::ClearCart,
            Self::AddToWishlist(_) => ActionKind::AddToWishlist,
            Self::RemoveFromWishlist(_) => ActionKind::RemoveFromWishlist,
            Self::SetCollaborativeSession(_) => ActionKind::SetCollaborativeSession,
            Self::ToggleVoice => ActionKind::ToggleVoice,
            Self::ToggleAr => ActionKind::ToggleAr,
            Self::ToggleSustainability => ActionKind::ToggleSustainability,
            Self::AddNotification(_) => ActionKind::AddNotification,
            Self::RemoveNotification(_) => ActionKind::RemoveNotification,
            Self::AddToRecentlyViewed(_) => ActionKind::AddToRecentlyViewed,
            Self::AddToSearchHistory(_) => ActionKind::AddToSearchHistory,
            Self::SetRecommendations(_) => ActionKind::SetRecommendations,
            Self::UpdateGamification(_) => ActionKind::UpdateGamification,
            Self::UpdateAnalytics(_) => ActionKind::UpdateAnalytics,
            Self::Unknown(_) => return None,
        })
    }

    /// The wire name of this action.
    pub fn name(&self) -> &str {
        match self {
            Self::Unknown(name) => name,
            other => other.kind().map_or("", |kind| kind.into()),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl ActionKind {
    /// Whether actions of this kind carry a payload.
    pub fn has_payload(self) -> bool {
        !matches!(
            self,
            Self::ClearCart | Self::ToggleVoice | Self::ToggleAr | Self::ToggleSustainability
        )
    }
}

/// An action envelope whose payload has not been decoded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl RawAction {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

impl TryFrom<RawAction> for Action {
    type Error = CommerceError;

    /// Unrecognized names become [`Action::Unknown`]; a recognized name with a
    /// payload of the wrong shape is an [`CommerceError::InvalidAction`].
    fn try_from(raw: RawAction) -> Result<Self> {
        let Ok(kind) = ActionKind::from_str(&raw.kind) else {
            return Ok(Action::Unknown(raw.kind));
        };

        let mut envelope = Map::new();
        envelope.insert("type".to_string(), Value::String(raw.kind.clone()));
        if kind.has_payload() || !raw.payload.is_null() {
            envelope.insert("payload".to_string(), raw.payload);
        }

        serde_json::from_value(Value::Object(envelope))
            .map_err(|e| CommerceError::invalid_action(raw.kind, e.to_string()))
    }
}

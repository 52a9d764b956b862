//! Domain records held by the session state.
//!
//! Product payloads come from catalog and recommendation feeds that the store
//! does not own, so only `id`, `name` and `price` are typed. Everything else a
//! feed attaches (image, category, rating, selected colour, votes, ...) rides
//! along untouched in [`Product::attributes`].

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Opaque identifier for products, notifications, participants and sessions.
///
/// Feeds use both numeric and string ids, so deserialization accepts either
/// and normalizes to the string form. Serialization always emits a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Identifier of a product record.
pub type ItemId = EntityId;

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => Self((n as i64).to_string()),
            RawId::Float(n) => Self(n.to_string()),
        })
    }
}

/// A product record as supplied by a catalog or recommendation feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "itemId")]
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    /// Feed-specific fields, preserved verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            attributes: Map::new(),
        }
    }

    /// Adds or replaces a pass-through attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

fn default_quantity() -> u32 {
    1
}

/// A cart line: the product as it was first added plus a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// Builds a fresh cart line with quantity 1.
    ///
    /// A `quantity` key carried in the product attributes is dropped so the
    /// serialized line never has two `quantity` fields.
    pub fn new(mut product: Product) -> Self {
        product.attributes.remove("quantity");
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.product.id
    }

    /// Line total (`price * quantity`).
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Member of a collaborative shopping session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_host: bool,
}

/// A shared shopping session with friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborativeSession {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub shared_cart: Vec<Product>,
}

/// Category of a notification, used by the notification surface to pick an icon.
///
/// Unrecognized categories are kept as [`NotificationKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Success,
    Warning,
    #[default]
    Info,
    Gift,
    Cart,
    Wishlist,
    Social,
    Ai,
    Other(String),
}

impl From<String> for NotificationKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "success" => Self::Success,
            "warning" => Self::Warning,
            "info" => Self::Info,
            "gift" => Self::Gift,
            "cart" => Self::Cart,
            "wishlist" => Self::Wishlist,
            "social" => Self::Social,
            "ai" => Self::Ai,
            _ => Self::Other(kind),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Success => "success".to_string(),
            NotificationKind::Warning => "warning".to_string(),
            NotificationKind::Info => "info".to_string(),
            NotificationKind::Gift => "gift".to_string(),
            NotificationKind::Cart => "cart".to_string(),
            NotificationKind::Wishlist => "wishlist".to_string(),
            NotificationKind::Social => "social".to_string(),
            NotificationKind::Ai => "ai".to_string(),
            NotificationKind::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
}

/// Points, level, badges and streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GamificationData {
    pub points: u64,
    pub level: u32,
    pub badges: BTreeSet<String>,
    pub streaks: u32,
}

impl Default for GamificationData {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            badges: BTreeSet::new(),
            streaks: 0,
        }
    }
}

impl GamificationData {
    /// Shallow merge: every field present in `update` replaces the current one.
    ///
    /// `level` never drops below 1.
    pub fn merge(&mut self, update: &GamificationUpdate) {
        if let Some(points) = update.points {
            self.points = points;
        }
        if let Some(level) = update.level {
            self.level = level.max(1);
        }
        if let Some(badges) = &update.badges {
            self.badges = badges.clone();
        }
        if let Some(streaks) = update.streaks {
            self.streaks = streaks;
        }
    }
}

/// Partial gamification record; absent fields are left untouched by the merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GamificationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badges: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaks: Option<u32>,
}

/// Shopping and sustainability totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub carbon_footprint: f64,
    pub sustainability_score: f64,
    pub total_spent: f64,
    pub items_purchased: u64,
}

impl Analytics {
    /// Shallow merge: every field present in `update` replaces the current one.
    pub fn merge(&mut self, update: &AnalyticsUpdate) {
        if let Some(carbon_footprint) = update.carbon_footprint {
            self.carbon_footprint = carbon_footprint;
        }
        if let Some(sustainability_score) = update.sustainability_score {
            self.sustainability_score = sustainability_score;
        }
        if let Some(total_spent) = update.total_spent {
            self.total_spent = total_spent;
        }
        if let Some(items_purchased) = update.items_purchased {
            self.items_purchased = items_purchased;
        }
    }
}

/// Partial analytics record; absent fields are left untouched by the merge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustainability_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_purchased: Option<u64>,
}

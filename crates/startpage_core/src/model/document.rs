//! Bookmark document model.
//!
//! # Responsibility
//! - Define the canonical in-memory shape of a persisted bookmark collection.
//! - Serialize that shape back to the stored wire layout.
//!
//! # Invariants
//! - `Document::containers` and `Container::items` keep insertion order; that
//!   order is the visual left-to-right order.
//! - Every `Item` is exactly one of `Bookmark` or `Spacer`.
//! - Identifiers are session-only: they are never serialized and never take
//!   part in equality.
//! - Unknown wire keys are carried in `extra` and written back unchanged.
//!   Only the validator fills `extra`, so it never holds a key the model
//!   itself serializes.
//!
//! # See also
//! - crate::schema::validator for the decode direction.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Session identifier for a container.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ContainerId = Uuid;

/// Session identifier for a bookmark or spacer.
pub type ItemId = Uuid;

/// Background applied when nothing valid has been persisted yet.
pub const DEFAULT_BACKGROUND: &str = "hsla(30, 20%, 90%, 1)";

/// Complete persisted/serializable bookmark state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub settings: Settings,
    pub containers: Vec<Container>,
    /// Root keys the model does not interpret.
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Default for Document {
    /// Returns the fallback document: default background, no containers.
    fn default() -> Self {
        Self {
            settings: Settings::new(DEFAULT_BACKGROUND),
            containers: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Document {
    /// Returns the container with `id`, if it exists in this document.
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|container| container.id == id)
    }

    /// Mutable variant of [`Document::container`].
    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|container| container.id == id)
    }

    /// Returns the position of container `id` in visual order.
    pub fn container_position(&self, id: ContainerId) -> Option<usize> {
        self.containers
            .iter()
            .position(|container| container.id == id)
    }

    /// Returns container IDs in visual order.
    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.containers.iter().map(Container::id).collect()
    }

    /// Root keys the model does not interpret, as decoded from storage.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Page-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// CSS background value. Opaque to the core; any JSON value is kept.
    pub background: Value,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Settings {
    pub fn new(background: impl Into<String>) -> Self {
        Self {
            background: Value::String(background.into()),
            extra: Map::new(),
        }
    }

    /// Returns the background as CSS text when it is stored as a string.
    pub fn background_css(&self) -> Option<&str> {
        self.background.as_str()
    }

    /// Settings keys the model does not interpret, as decoded from storage.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Named, ordered group of bookmarks and spacers.
#[derive(Debug, Clone, Serialize)]
pub struct Container {
    #[serde(skip)]
    id: ContainerId,
    /// Display title, may be empty.
    pub title: String,
    /// Serialized as `bookmarks` to match the stored layout.
    #[serde(rename = "bookmarks")]
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Container {
    /// Creates an empty container with a fresh session ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn item_position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Returns item IDs in visual order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id).collect()
    }

    /// Container keys the model does not interpret, as decoded from storage.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.items == other.items && self.extra == other.extra
    }
}

/// Unit stored inside a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Bookmark(Bookmark),
    Spacer(Spacer),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Self::Bookmark(bookmark) => bookmark.id,
            Self::Spacer(spacer) => spacer.id,
        }
    }

    pub fn as_bookmark(&self) -> Option<&Bookmark> {
        match self {
            Self::Bookmark(bookmark) => Some(bookmark),
            Self::Spacer(_) => None,
        }
    }

    pub fn as_bookmark_mut(&mut self) -> Option<&mut Bookmark> {
        match self {
            Self::Bookmark(bookmark) => Some(bookmark),
            Self::Spacer(_) => None,
        }
    }

    pub fn as_spacer(&self) -> Option<&Spacer> {
        match self {
            Self::Bookmark(_) => None,
            Self::Spacer(spacer) => Some(spacer),
        }
    }
}

impl From<Bookmark> for Item {
    fn from(value: Bookmark) -> Self {
        Self::Bookmark(value)
    }
}

impl From<Spacer> for Item {
    fn from(value: Spacer) -> Self {
        Self::Spacer(value)
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bookmark(bookmark) => bookmark.serialize(serializer),
            Self::Spacer(spacer) => spacer.serialize(serializer),
        }
    }
}

/// Navigable link.
#[derive(Debug, Clone, Serialize)]
pub struct Bookmark {
    #[serde(skip)]
    id: ItemId,
    pub title: String,
    /// Stored as typed; never parsed as a URL.
    pub url: String,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Bookmark {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            url: url.into(),
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Bookmark keys the model does not interpret, as decoded from storage.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl PartialEq for Bookmark {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.url == other.url && self.extra == other.extra
    }
}

/// Layout-only item; fixed-size unless `flexible`.
#[derive(Debug, Clone)]
pub struct Spacer {
    id: ItemId,
    pub flexible: bool,
    pub(crate) extra: Map<String, Value>,
}

impl Spacer {
    pub fn new(flexible: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            flexible,
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Spacer keys the model does not interpret, as decoded from storage.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl PartialEq for Spacer {
    fn eq(&self, other: &Self) -> bool {
        self.flexible == other.flexible && self.extra == other.extra
    }
}

impl Serialize for Spacer {
    /// Writes the `"spacer": true` discriminant ahead of the payload.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.extra.len()))?;
        map.serialize_entry("spacer", &true)?;
        map.serialize_entry("flexible", &self.flexible)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{Bookmark, Container, Document, Item, Spacer, DEFAULT_BACKGROUND};
    use serde_json::json;

    #[test]
    fn default_document_has_neutral_background_and_no_containers() {
        let document = Document::default();
        assert_eq!(
            document.settings.background_css(),
            Some(DEFAULT_BACKGROUND)
        );
        assert!(document.containers.is_empty());
    }

    #[test]
    fn equality_ignores_session_ids() {
        let mut left = Container::new("dev");
        left.items.push(Bookmark::new("github", "https://github.com/").into());
        let mut right = Container::new("dev");
        right.items.push(Bookmark::new("github", "https://github.com/").into());

        assert_ne!(left.id(), right.id());
        assert_eq!(left, right);
    }

    #[test]
    fn items_serialize_to_wire_shape() {
        let bookmark = Item::from(Bookmark::new("ars", "https://arstechnica.com/"));
        let spacer = Item::from(Spacer::new(true));

        assert_eq!(
            serde_json::to_value(&bookmark).unwrap(),
            json!({"title": "ars", "url": "https://arstechnica.com/"})
        );
        assert_eq!(
            serde_json::to_value(&spacer).unwrap(),
            json!({"spacer": true, "flexible": true})
        );
    }

    #[test]
    fn container_serializes_items_under_bookmarks_key() {
        let container = Container::new("news");
        assert_eq!(
            serde_json::to_value(&container).unwrap(),
            json!({"title": "news", "bookmarks": []})
        );
    }
}

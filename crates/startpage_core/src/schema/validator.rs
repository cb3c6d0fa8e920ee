//! Strict validator for untrusted bookmark documents.
//!
//! # Responsibility
//! - Gate every load and import path with one rule set.
//! - Decode accepted input into the typed `Document` in a single pass.
//!
//! # Invariants
//! - Checks run in a fixed order and stop at the first violation, so the
//!   same input always yields the same error.
//! - Item variants are decided in exactly one place (`decode_item`).
//! - Values are passed through as-is, including unknown keys.
//! - Validation is pure: no logging, no I/O.

use crate::model::document::{Bookmark, Container, Document, Item, Settings, Spacer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural violation found while validating a bookmark document.
///
/// Container and item positions are zero-based indexes into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Input is empty or not UTF-8 text.
    NotAString,
    InvalidJson { reason: String },
    /// Root is an array or a primitive.
    RootNotObject,
    MissingSettings,
    MissingBackground,
    MissingContainers,
    InvalidContainer { container: usize },
    MissingTitle { container: usize },
    MissingBookmarksArray { container: usize },
    /// Item carries neither `title` nor `spacer`.
    InvalidItem { container: usize, item: usize },
    MissingUrl { container: usize, item: usize },
    MissingFlexible { container: usize, item: usize },
    /// Field is present but holds the wrong JSON type.
    InvalidType {
        field: String,
        expected: &'static str,
    },
}

impl SchemaError {
    /// Stable machine-readable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAString => "not_a_string",
            Self::InvalidJson { .. } => "invalid_json",
            Self::RootNotObject => "root_not_object",
            Self::MissingSettings => "missing_settings",
            Self::MissingBackground => "missing_background",
            Self::MissingContainers => "missing_containers",
            Self::InvalidContainer { .. } => "invalid_container",
            Self::MissingTitle { .. } => "missing_title",
            Self::MissingBookmarksArray { .. } => "missing_bookmarks_array",
            Self::InvalidItem { .. } => "invalid_item",
            Self::MissingUrl { .. } => "missing_url",
            Self::MissingFlexible { .. } => "missing_flexible",
            Self::InvalidType { .. } => "invalid_type",
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAString => write!(f, "not a string or empty string"),
            Self::InvalidJson { reason } => write!(f, "not a valid JSON string: {reason}"),
            Self::RootNotObject => write!(f, "root JSON element is not an object"),
            Self::MissingSettings => {
                write!(f, "settings property missing or contains invalid data")
            }
            Self::MissingBackground => write!(f, "settings has no background property"),
            Self::MissingContainers => {
                write!(f, "containers property missing or contains invalid data")
            }
            Self::InvalidContainer { container } => {
                write!(f, "container {container} is not an object")
            }
            Self::MissingTitle { container } => {
                write!(f, "container {container} has no \"title\" property")
            }
            Self::MissingBookmarksArray { container } => write!(
                f,
                "container {container} has no \"bookmarks\" property or it is not an array"
            ),
            Self::InvalidItem { container, item } => write!(
                f,
                "item {item} in container {container} is neither a bookmark nor a spacer"
            ),
            Self::MissingUrl { container, item } => write!(
                f,
                "bookmark {item} in container {container} has no \"url\" property"
            ),
            Self::MissingFlexible { container, item } => write!(
                f,
                "spacer {item} in container {container} has no \"flexible\" property"
            ),
            Self::InvalidType { field, expected } => {
                write!(f, "`{field}` must be a {expected}")
            }
        }
    }
}

impl Error for SchemaError {}

/// Validates a candidate document string and decodes it.
///
/// # Errors
/// Returns the first violation in check order: input, JSON syntax, root
/// shape, `settings`, `settings.background`, `containers`, then each
/// container and its items in order.
pub fn validate(input: &str) -> Result<Document, SchemaError> {
    if input.is_empty() {
        return Err(SchemaError::NotAString);
    }

    let root: Value = serde_json::from_str(input).map_err(|err| SchemaError::InvalidJson {
        reason: err.to_string(),
    })?;
    decode_document(root)
}

/// Byte-oriented entry point for storage layers that hand back raw bytes.
///
/// Non-UTF-8 input is rejected with `SchemaError::NotAString`.
pub fn validate_bytes(input: &[u8]) -> Result<Document, SchemaError> {
    let text = std::str::from_utf8(input).map_err(|_| SchemaError::NotAString)?;
    validate(text)
}

fn decode_document(root: Value) -> Result<Document, SchemaError> {
    let Value::Object(mut root) = root else {
        return Err(SchemaError::RootNotObject);
    };

    let settings = match root.remove("settings") {
        Some(Value::Object(fields)) => decode_settings(fields)?,
        _ => return Err(SchemaError::MissingSettings),
    };

    let raw_containers = match root.remove("containers") {
        Some(Value::Array(values)) => values,
        _ => return Err(SchemaError::MissingContainers),
    };

    let containers = raw_containers
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode_container(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document {
        settings,
        containers,
        extra: root,
    })
}

fn decode_settings(mut fields: Map<String, Value>) -> Result<Settings, SchemaError> {
    let background = fields
        .remove("background")
        .ok_or(SchemaError::MissingBackground)?;

    Ok(Settings {
        background,
        extra: fields,
    })
}

fn decode_container(index: usize, value: Value) -> Result<Container, SchemaError> {
    let Value::Object(mut fields) = value else {
        return Err(SchemaError::InvalidContainer { container: index });
    };

    let title = match fields.remove("title") {
        Some(value) => expect_string(value, || format!("containers[{index}].title"))?,
        None => return Err(SchemaError::MissingTitle { container: index }),
    };

    let raw_items = match fields.remove("bookmarks") {
        Some(Value::Array(values)) => values,
        _ => return Err(SchemaError::MissingBookmarksArray { container: index }),
    };

    let mut container = Container::new(title);
    container.items = raw_items
        .into_iter()
        .enumerate()
        .map(|(item_index, value)| decode_item(index, item_index, value))
        .collect::<Result<Vec<_>, _>>()?;
    container.extra = fields;
    Ok(container)
}

fn decode_item(container: usize, item: usize, value: Value) -> Result<Item, SchemaError> {
    let Value::Object(mut fields) = value else {
        return Err(SchemaError::InvalidItem { container, item });
    };

    if let Some(title) = fields.remove("title") {
        let url = fields
            .remove("url")
            .ok_or(SchemaError::MissingUrl { container, item })?;
        let title = expect_string(title, || {
            format!("containers[{container}].bookmarks[{item}].title")
        })?;
        let url = expect_string(url, || {
            format!("containers[{container}].bookmarks[{item}].url")
        })?;

        let mut bookmark = Bookmark::new(title, url);
        bookmark.extra = fields;
        return Ok(Item::Bookmark(bookmark));
    }

    // The discriminant value itself is not inspected; older exports store
    // it as the string "true".
    if fields.remove("spacer").is_some() {
        let flexible = match fields.remove("flexible") {
            Some(Value::Bool(flexible)) => flexible,
            Some(_) => {
                return Err(SchemaError::InvalidType {
                    field: format!("containers[{container}].bookmarks[{item}].flexible"),
                    expected: "boolean",
                });
            }
            None => return Err(SchemaError::MissingFlexible { container, item }),
        };

        let mut spacer = Spacer::new(flexible);
        spacer.extra = fields;
        return Ok(Item::Spacer(spacer));
    }

    Err(SchemaError::InvalidItem { container, item })
}

fn expect_string(value: Value, field: impl FnOnce() -> String) -> Result<String, SchemaError> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(SchemaError::InvalidType {
            field: field(),
            expected: "string",
        }),
    }
}

//! Core of the start page bookmark manager.
//! This crate is the single source of truth for the persisted document
//! shape, its validation, and the store that owns it at runtime.

pub mod db;
pub mod logging;
pub mod model;
pub mod params;
pub mod repo;
pub mod schema;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    Bookmark, Container, ContainerId, Document, Item, ItemId, Settings, Spacer,
    DEFAULT_BACKGROUND,
};
pub use params::LaunchParams;
pub use repo::state_repo::{
    MemoryStateRepository, RepoError, RepoResult, SqliteStateRepository, StateRepository,
    STATE_KEY,
};
pub use schema::fixtures::{demo_document, DEMO_DOCUMENT};
pub use schema::validator::{validate, validate_bytes, SchemaError};
pub use service::edit_session::{EditSession, EditState, EditTarget};
pub use service::store::{ImportError, LoadOutcome, Store, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

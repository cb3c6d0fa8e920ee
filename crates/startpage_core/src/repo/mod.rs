//! Persistence collaborator for the serialized document.
//!
//! # Responsibility
//! - Store one opaque string per well-known key, overwriting on write.
//! - Isolate SQLite details from the store.
//!
//! # Invariants
//! - Repositories never interpret stored values; validation belongs to
//!   `crate::schema`.

pub mod state_repo;

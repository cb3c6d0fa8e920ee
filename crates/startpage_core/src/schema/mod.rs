//! Persisted document schema: validator and built-in documents.
//!
//! # Responsibility
//! - Decide whether an untrusted string is a bookmark document.
//! - Provide the demo and default documents used at startup.
//!
//! # Invariants
//! - Load and import use the same validator, so anything importable is
//!   reloadable.

pub mod fixtures;
pub mod validator;

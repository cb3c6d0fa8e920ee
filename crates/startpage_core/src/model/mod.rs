//! Domain model for the start page bookmark collection.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and validator.
//!
//! # Invariants
//! - A document always has settings and a (possibly empty) container list.
//! - Items are an explicit tagged enum, never duck-typed at call sites.

pub mod document;

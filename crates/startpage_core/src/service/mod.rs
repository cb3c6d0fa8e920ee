//! Core use-case services.
//!
//! # Responsibility
//! - Own the live document and orchestrate validator and repository calls.
//! - Keep UI callers decoupled from storage details.

pub mod edit_session;
pub mod store;

//! Single-slot bookmark edit session.
//!
//! # Responsibility
//! - Track which bookmark (if any) is open in the inline editor.
//!
//! # Invariants
//! - At most one edit is pending at any time.
//! - Starting an edit while another is pending hands the previous target
//!   back to the caller, which must treat it as cancelled.
//!
//! Transitions:
//! - `Idle -> Editing` via [`EditSession::begin`].
//! - `Editing -> Idle` via [`EditSession::finish`] (commit or cancel).
//! - `Editing -> Editing` via [`EditSession::begin`] (cancel previous, start new).

use crate::model::document::{ContainerId, ItemId};

/// Bookmark currently open in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub container: ContainerId,
    pub item: ItemId,
    /// `true` when the bookmark was appended for this edit and has never
    /// been committed.
    pub draft: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditTarget),
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn target(&self) -> Option<EditTarget> {
        match self.state {
            EditState::Idle => None,
            EditState::Editing(target) => Some(target),
        }
    }

    /// Returns the pending target only when it is an uncommitted draft.
    pub fn draft(&self) -> Option<EditTarget> {
        self.target().filter(|target| target.draft)
    }

    /// Opens `target`, returning the edit it displaced.
    pub fn begin(&mut self, target: EditTarget) -> Option<EditTarget> {
        let previous = self.target();
        self.state = EditState::Editing(target);
        previous
    }

    /// Closes the pending edit and returns it.
    pub fn finish(&mut self) -> Option<EditTarget> {
        let previous = self.target();
        self.state = EditState::Idle;
        previous
    }
}

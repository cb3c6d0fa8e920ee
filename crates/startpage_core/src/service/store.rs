//! Bookmark store: owner of the live document.
//!
//! # Responsibility
//! - Load the document from persisted state, the demo fixture or defaults.
//! - Expose every mutation the UI may perform and persist after each one
//!   that is final.
//! - Serialize the document for persistence and export, and accept imports.
//!
//! # Invariants
//! - `load` never fails outward; invalid state falls back to the default
//!   document and is logged.
//! - Only strings accepted by `schema::validator::validate` are written by
//!   `import`.
//! - `serialize` is deterministic: no mutation in between means identical
//!   output.
//! - Draft bookmarks (appended but never committed) are never serialized.
//! - Referencing an unknown container or item is a programming error and
//!   panics.

use crate::model::document::{
    Bookmark, Container, ContainerId, Document, Item, ItemId, Settings, Spacer,
};
use crate::params::LaunchParams;
use crate::repo::state_repo::{RepoError, StateRepository, STATE_KEY};
use crate::schema::fixtures::demo_document;
use crate::schema::validator::{validate, validate_bytes, SchemaError};
use crate::service::edit_session::{EditSession, EditState, EditTarget};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SERIALIZE_INDENT: &[u8] = b"    ";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
#[derive(Debug)]
pub enum StoreError {
    /// Persistence collaborator failed.
    Repo(RepoError),
    Serialize(serde_json::Error),
    /// `commit_edit` was called with no bookmark open in the editor.
    NoActiveEdit,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
            Self::NoActiveEdit => write!(f, "no bookmark is being edited"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::NoActiveEdit => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Import rejection surfaced to the user.
#[derive(Debug)]
pub enum ImportError {
    /// Candidate text is not a valid document; nothing was written.
    Schema(SchemaError),
    /// Candidate was valid but could not be stored.
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<SchemaError> for ImportError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Store(StoreError::Repo(value))
    }
}

/// Where the live document came from on the most recent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Demo,
    /// Persisted state validated and was adopted.
    Stored,
    /// Nothing (or an empty string) was persisted; defaults were used.
    Empty,
    /// Persisted state was rejected; defaults were used.
    Invalid(SchemaError),
    /// Persisted state could not be read; defaults were used.
    StorageUnavailable(String),
}

/// Owner of the live bookmark document for one session.
///
/// Constructed by the application entry point and lent to whatever renders
/// it. All mutation goes through `&mut self`.
pub struct Store<R: StateRepository> {
    repo: R,
    document: Document,
    edit: EditSession,
    demo: bool,
    last_load: LoadOutcome,
}

impl<R: StateRepository> Store<R> {
    /// Creates a store and performs the startup load described by `params`.
    ///
    /// With `params.clear`, the persisted document is removed first; a
    /// failure to remove it is logged and loading continues.
    pub fn open(repo: R, params: &LaunchParams) -> Self {
        let mut store = Self {
            repo,
            document: Document::default(),
            edit: EditSession::new(),
            demo: params.demo,
            last_load: LoadOutcome::Empty,
        };

        if params.clear {
            if let Err(err) = store.clear_storage() {
                warn!("event=store_clear module=store status=error error={err}");
            }
        }

        store.load(params.demo);
        store
    }

    /// Replaces the live document with a freshly loaded one.
    ///
    /// # Panics
    /// Panics if the built-in demo document fails validation.
    pub fn load(&mut self, use_demo: bool) -> &Document {
        self.demo = use_demo;
        self.edit = EditSession::new();

        let (document, outcome) = if use_demo {
            (demo_document(), LoadOutcome::Demo)
        } else {
            self.load_persisted()
        };

        match &outcome {
            LoadOutcome::Demo => info!(
                "event=store_load module=store status=ok source=demo containers={}",
                document.containers.len()
            ),
            LoadOutcome::Stored => info!(
                "event=store_load module=store status=ok source=storage containers={}",
                document.containers.len()
            ),
            LoadOutcome::Empty => {
                debug!("event=store_load module=store status=ok source=default reason=empty")
            }
            LoadOutcome::Invalid(err) => warn!(
                "event=store_load module=store status=fallback source=default error_code={} error={}",
                err.code(),
                err
            ),
            LoadOutcome::StorageUnavailable(err) => warn!(
                "event=store_load module=store status=fallback source=default error_code=storage_unavailable error={err}"
            ),
        }

        self.document = document;
        self.last_load = outcome;
        &self.document
    }

    fn load_persisted(&self) -> (Document, LoadOutcome) {
        let stored = match self.repo.get(STATE_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                return (
                    Document::default(),
                    LoadOutcome::StorageUnavailable(err.to_string()),
                )
            }
        };

        match stored.as_deref() {
            None | Some("") => (Document::default(), LoadOutcome::Empty),
            Some(text) => match validate(text) {
                Ok(document) => (document, LoadOutcome::Stored),
                Err(err) => (Document::default(), LoadOutcome::Invalid(err)),
            },
        }
    }

    /// Reloads using the current startup mode, discarding unsaved changes.
    pub fn reload(&mut self) -> &Document {
        self.load(self.demo)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    pub fn containers(&self) -> &[Container] {
        &self.document.containers
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.document.container(id)
    }

    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.document.container_ids()
    }

    pub fn item(&self, container: ContainerId, item: ItemId) -> Option<&Item> {
        self.document.container(container)?.item(item)
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.last_load
    }

    pub fn edit_state(&self) -> EditState {
        self.edit.state()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Appends an empty container and persists.
    pub fn add_container(&mut self, title: impl Into<String>) -> StoreResult<ContainerId> {
        let container = Container::new(title);
        let id = container.id();
        self.document.containers.push(container);
        self.persist()?;
        Ok(id)
    }

    /// Appends a bookmark and opens it in the editor.
    ///
    /// Nothing is persisted until [`Store::commit_edit`]. A draft displaced
    /// by this call is discarded.
    ///
    /// # Panics
    /// Panics if `container` is not part of the live document.
    pub fn add_bookmark(
        &mut self,
        container: ContainerId,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> ItemId {
        let bookmark = Bookmark::new(title, url);
        let item = bookmark.id();
        self.container_mut(container).items.push(bookmark.into());
        self.begin_edit(EditTarget {
            container,
            item,
            draft: true,
        });
        item
    }

    /// Appends a spacer and persists.
    ///
    /// # Panics
    /// Panics if `container` is not part of the live document.
    pub fn add_spacer(&mut self, container: ContainerId, flexible: bool) -> StoreResult<ItemId> {
        let spacer = Spacer::new(flexible);
        let item = spacer.id();
        self.container_mut(container).items.push(spacer.into());
        self.persist()?;
        Ok(item)
    }

    /// Opens an existing bookmark in the editor.
    ///
    /// Reopening the pending draft keeps it a draft until committed.
    ///
    /// # Panics
    /// Panics if the reference is unknown or points at a spacer.
    pub fn edit_bookmark(&mut self, container: ContainerId, item: ItemId) {
        if self.item_mut(container, item).as_bookmark_mut().is_none() {
            panic!("item {item} in container {container} is not a bookmark");
        }
        let draft = self.edit.draft().is_some_and(|pending| pending.item == item);
        self.begin_edit(EditTarget {
            container,
            item,
            draft,
        });
    }

    /// Writes the editor fields into the pending bookmark and persists.
    ///
    /// # Errors
    /// Returns `StoreError::NoActiveEdit` when the editor is idle.
    pub fn commit_edit(
        &mut self,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> StoreResult<ItemId> {
        let target = self.edit.finish().ok_or(StoreError::NoActiveEdit)?;
        if let Some(bookmark) = self
            .item_mut(target.container, target.item)
            .as_bookmark_mut()
        {
            bookmark.title = title.into();
            bookmark.url = url.into();
        }
        self.persist()?;
        Ok(target.item)
    }

    /// Closes the editor without saving. A draft bookmark is removed.
    pub fn cancel_edit(&mut self) -> Option<EditTarget> {
        let target = self.edit.finish()?;
        if target.draft {
            self.discard_draft(target);
        }
        Some(target)
    }

    /// Updates the background in place. Callers persist explicitly.
    pub fn set_background(&mut self, value: impl Into<String>) {
        self.document.settings.background = serde_json::Value::String(value.into());
    }

    /// Renames a container and persists.
    pub fn rename_container(
        &mut self,
        container: ContainerId,
        title: impl Into<String>,
    ) -> StoreResult<()> {
        self.container_mut(container).title = title.into();
        self.persist()
    }

    /// Removes a container with all of its items and persists.
    ///
    /// A pending edit inside the container is dropped.
    pub fn remove_container(&mut self, container: ContainerId) -> StoreResult<Container> {
        let position = self.container_position(container);
        if self
            .edit
            .target()
            .is_some_and(|target| target.container == container)
        {
            self.edit.finish();
        }
        let removed = self.document.containers.remove(position);
        self.persist()?;
        Ok(removed)
    }

    /// Removes one item and persists. A pending edit of that item is dropped.
    pub fn remove_item(&mut self, container: ContainerId, item: ItemId) -> StoreResult<Item> {
        let position = self.item_position(container, item);
        if self.edit.target().is_some_and(|target| target.item == item) {
            self.edit.finish();
        }
        let removed = self.container_mut(container).items.remove(position);
        self.persist()?;
        Ok(removed)
    }

    /// Moves a container to `to_index` (clamped to the last slot) and persists.
    pub fn move_container(&mut self, container: ContainerId, to_index: usize) -> StoreResult<()> {
        let position = self.container_position(container);
        let moved = self.document.containers.remove(position);
        let to_index = to_index.min(self.document.containers.len());
        self.document.containers.insert(to_index, moved);
        self.persist()
    }

    /// Moves an item within its container and persists.
    pub fn move_item(
        &mut self,
        container: ContainerId,
        item: ItemId,
        to_index: usize,
    ) -> StoreResult<()> {
        let position = self.item_position(container, item);
        let items = &mut self.container_mut(container).items;
        let moved = items.remove(position);
        let to_index = to_index.min(items.len());
        items.insert(to_index, moved);
        self.persist()
    }

    /// Returns the pretty-printed JSON form of the live document.
    ///
    /// Used identically for persistence and clipboard export, so the output
    /// is always importable as-is.
    pub fn serialize(&self) -> StoreResult<String> {
        match self.edit.draft() {
            Some(draft) => {
                let mut snapshot = self.document.clone();
                if let Some(container) = snapshot.container_mut(draft.container) {
                    container.items.retain(|item| item.id() != draft.item);
                }
                to_pretty_json(&snapshot)
            }
            None => to_pretty_json(&self.document),
        }
    }

    /// Text handed to the clipboard on export.
    pub fn export(&self) -> StoreResult<String> {
        self.serialize()
    }

    /// Writes the serialized document under the state key.
    ///
    /// Demo sessions never overwrite persisted state.
    pub fn persist(&mut self) -> StoreResult<()> {
        if self.demo {
            debug!("event=store_persist module=store status=skipped reason=demo");
            return Ok(());
        }

        let serialized = self.serialize()?;
        self.repo.set(STATE_KEY, &serialized).map_err(|err| {
            warn!("event=store_persist module=store status=error error={err}");
            err
        })?;
        debug!(
            "event=store_persist module=store status=ok bytes={}",
            serialized.len()
        );
        Ok(())
    }

    /// Accepts clipboard text as the new persisted document.
    ///
    /// On success the text is stored verbatim and the store reloads, which
    /// discards unsaved changes and any open edit. On failure nothing is
    /// written and the live document is untouched.
    pub fn import(&mut self, text: &str) -> Result<(), ImportError> {
        validate(text).map_err(reject_import)?;
        self.accept_import(text)
    }

    /// Byte variant of [`Store::import`] for raw clipboard or stdin input.
    ///
    /// Non-UTF-8 input is rejected with `SchemaError::NotAString`.
    pub fn import_bytes(&mut self, input: &[u8]) -> Result<(), ImportError> {
        validate_bytes(input).map_err(reject_import)?;
        let text = std::str::from_utf8(input).map_err(|_| SchemaError::NotAString)?;
        self.accept_import(text)
    }

    fn accept_import(&mut self, text: &str) -> Result<(), ImportError> {
        self.repo.set(STATE_KEY, text)?;
        info!(
            "event=store_import module=store status=ok bytes={}",
            text.len()
        );
        self.reload();
        Ok(())
    }

    /// Removes the persisted document. The live document is untouched.
    pub fn clear_storage(&mut self) -> StoreResult<()> {
        self.repo.remove(STATE_KEY)?;
        info!("event=store_clear module=store status=ok");
        Ok(())
    }

    fn begin_edit(&mut self, target: EditTarget) {
        if let Some(previous) = self.edit.begin(target) {
            if previous.draft && previous.item != target.item {
                self.discard_draft(previous);
            }
        }
    }

    fn discard_draft(&mut self, draft: EditTarget) {
        if let Some(container) = self.document.container_mut(draft.container) {
            container.items.retain(|item| item.id() != draft.item);
        }
    }

    fn container_position(&self, container: ContainerId) -> usize {
        self.document
            .container_position(container)
            .unwrap_or_else(|| panic!("unknown container reference {container}"))
    }

    fn container_mut(&mut self, container: ContainerId) -> &mut Container {
        self.document
            .container_mut(container)
            .unwrap_or_else(|| panic!("unknown container reference {container}"))
    }

    fn item_position(&self, container: ContainerId, item: ItemId) -> usize {
        self.document
            .container(container)
            .unwrap_or_else(|| panic!("unknown container reference {container}"))
            .item_position(item)
            .unwrap_or_else(|| panic!("unknown item reference {item} in container {container}"))
    }

    fn item_mut(&mut self, container: ContainerId, item: ItemId) -> &mut Item {
        self.container_mut(container)
            .item_mut(item)
            .unwrap_or_else(|| panic!("unknown item reference {item} in container {container}"))
    }
}

fn reject_import(err: SchemaError) -> ImportError {
    info!(
        "event=store_import module=store status=rejected error_code={} error={}",
        err.code(),
        err
    );
    ImportError::Schema(err)
}

fn to_pretty_json(document: &Document) -> StoreResult<String> {
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(
        &mut buffer,
        PrettyFormatter::with_indent(SERIALIZE_INDENT),
    );
    document.serialize(&mut serializer)?;
    String::from_utf8(buffer)
        .map_err(|err| StoreError::Serialize(serde::ser::Error::custom(err)))
}

//! Keyed remote-data cache for a story's comment tree.
//!
//! One map from comment id to its three-way loading state, written only by
//! folding [`CommentEvent`]s on the UI thread of control and read by every
//! rendering call-site. The event fold *is* the change notification: the
//! event loop flips the redraw flag whenever it applies one, so readers see
//! each batch exactly once and never a half-initialized sibling group.
//!
//! Lives for the duration of one story view; no eviction.

use crate::api::Comment;
use std::collections::HashMap;

/// Three-way status of an asynchronously fetched entity.
///
/// The id is the cache key, not a payload field. Transitions are monotone:
/// `Loading` resolves to `Loaded` or `Error` exactly once and never reverts.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteData<T> {
    /// Request issued (or queued), not yet resolved.
    Loading,
    /// Fetch succeeded.
    Loaded(T),
    /// Fetch failed; carries a human-readable description.
    Error(String),
}

impl<T> RemoteData<T> {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RemoteData::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            RemoteData::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// State transition published by the comment tree loader.
///
/// `Pending` carries a whole sibling group so the group becomes visible to
/// readers in one step, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentEvent {
    /// A discovered sibling group, in display order: mark each id loading.
    Pending { ids: Vec<u64> },
    /// One comment resolved successfully.
    Loaded { id: u64, comment: Comment },
    /// One comment's fetch failed terminally.
    Failed { id: u64, error: String },
}

/// The comment state cache: id -> [`RemoteData<Comment>`].
#[derive(Debug, Default)]
pub struct CommentCache {
    entries: HashMap<u64, RemoteData<Comment>>,
}

impl CommentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u64) -> Option<&RemoteData<Comment>> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids still waiting on their fetch.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|state| !state.is_resolved())
            .count()
    }

    /// Fold one loader event into the map.
    ///
    /// Enforces the monotone-transition invariant: an event that would
    /// revert or overwrite a resolved id is dropped with a warning rather
    /// than applied. The loader never emits such events on its own; this
    /// guards against late deliveries from an already-replaced traversal.
    pub fn apply(&mut self, event: CommentEvent) {
        match event {
            CommentEvent::Pending { ids } => {
                for id in ids {
                    match self.entries.get(&id) {
                        Some(state) if state.is_resolved() => {
                            tracing::warn!(id, "ignoring loading mark for resolved comment");
                        }
                        Some(RemoteData::Loading) => {}
                        _ => {
                            self.entries.insert(id, RemoteData::Loading);
                        }
                    }
                }
            }
            CommentEvent::Loaded { id, comment } => {
                self.resolve(id, RemoteData::Loaded(comment));
            }
            CommentEvent::Failed { id, error } => {
                self.resolve(id, RemoteData::Error(error));
            }
        }
    }

    fn resolve(&mut self, id: u64, state: RemoteData<Comment>) {
        match self.entries.get(&id) {
            Some(existing) if existing.is_resolved() => {
                tracing::warn!(id, "ignoring duplicate resolution for comment");
            }
            _ => {
                self.entries.insert(id, state);
            }
        }
    }

    /// Drop everything. Called on story-view teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! Application state.
//!
//! Everything the UI renders lives here, and only the UI task's event fold
//! mutates it. Background loaders communicate exclusively through
//! [`AppEvent`]s; each event is stamped with the generation of the view
//! that spawned it so late deliveries from a replaced view are discarded.

use crate::api::{Category, HnClient, Story};
use crate::config::Config;
use crate::loader::cache::{CommentCache, CommentEvent, RemoteData};
use crate::loader::{pager, stories};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How long a status-bar message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Paginated story rows for one category.
    Listing,
    /// One story's header and streaming comment tree.
    Story { id: u64 },
}

/// Cancellation scope of the current view.
///
/// Navigating away cancels the token once; every operation the view started
/// observes it before its next state mutation. The generation counter is a
/// second line of defense: an event whose task raced past cancellation is
/// still dropped at the fold if its stamp is stale.
struct ViewSession {
    cancel: CancellationToken,
    generation: u64,
}

/// Events posted by background loader tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A category id list resolved (or failed).
    IdsLoaded {
        generation: u64,
        category: Category,
        result: Result<Vec<u64>, String>,
    },
    /// One listing row resolved (or failed).
    StoryLoaded {
        generation: u64,
        id: u64,
        result: Result<Story, String>,
    },
    /// The story a detail view was opened for resolved (or failed).
    StoryOpened {
        generation: u64,
        id: u64,
        result: Result<Story, String>,
    },
    /// One comment-tree state transition.
    Comment { generation: u64, event: CommentEvent },
}

/// A node in the flattened, currently-visible comment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentNode {
    pub id: u64,
    pub depth: usize,
}

pub struct App {
    pub client: HnClient,
    pub page_size: usize,

    // Navigation
    pub view: View,
    pub category: Category,
    pub page: usize,

    // Listing state
    /// The category's full id list; sliced locally per page.
    pub ids: RemoteData<Vec<u64>>,
    /// Per-row story state for the visible page.
    pub stories: HashMap<u64, RemoteData<Story>>,
    /// Selected row index within the visible page.
    pub selected: usize,

    // Story view state
    pub story: RemoteData<Story>,
    pub comments: CommentCache,
    /// Comment ids whose subtrees are folded to a "show replies" stub.
    pub collapsed: HashSet<u64>,
    /// Cursor index into the flattened visible comment nodes.
    pub comment_cursor: usize,
    /// Line scroll offset in the story view.
    pub scroll: usize,

    session: ViewSession,

    // UI plumbing
    pub needs_redraw: bool,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
}

impl App {
    pub fn new(client: HnClient, config: &Config) -> Self {
        Self {
            client,
            page_size: config.page_size,
            view: View::Listing,
            category: config.default_category,
            page: 1,
            ids: RemoteData::Loading,
            stories: HashMap::new(),
            selected: 0,
            story: RemoteData::Loading,
            comments: CommentCache::new(),
            collapsed: HashSet::new(),
            comment_cursor: 0,
            scroll: 0,
            session: ViewSession {
                cancel: CancellationToken::new(),
                generation: 0,
            },
            needs_redraw: true,
            status_message: None,
        }
    }

    // ------------------------------------------------------------------
    // View session
    // ------------------------------------------------------------------

    pub fn generation(&self) -> u64 {
        self.session.generation
    }

    /// Token scoping all work started by the current view.
    pub fn view_token(&self) -> CancellationToken {
        self.session.cancel.clone()
    }

    /// Tear down the current view's scope and open a fresh one.
    ///
    /// Cancels every request the old view still has in flight and bumps the
    /// generation so their events, if any raced through, are discarded.
    fn begin_view(&mut self) -> (CancellationToken, u64) {
        self.session.cancel.cancel();
        self.session.cancel = CancellationToken::new();
        self.session.generation += 1;
        (self.session.cancel.clone(), self.session.generation)
    }

    /// True when `generation` belongs to the current view.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.session.generation
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Open a category listing at the given page (normalized here).
    pub fn open_listing(&mut self, category: Category, page: i64, tx: &mpsc::Sender<AppEvent>) {
        let (cancel, generation) = self.begin_view();

        self.view = View::Listing;
        self.category = category;
        self.page = pager::normalize_page(page, self.page_size);
        self.ids = RemoteData::Loading;
        self.stories.clear();
        self.selected = 0;
        self.comments.clear();
        self.collapsed.clear();
        self.needs_redraw = true;

        stories::spawn_listing(self.client.clone(), category, cancel, generation, tx.clone());
    }

    /// Open one story's detail view.
    pub fn open_story(&mut self, id: u64, tx: &mpsc::Sender<AppEvent>) {
        let (cancel, generation) = self.begin_view();

        self.view = View::Story { id };
        self.story = RemoteData::Loading;
        self.comments.clear();
        self.collapsed.clear();
        self.comment_cursor = 0;
        self.scroll = 0;
        self.needs_redraw = true;

        stories::spawn_story_detail(self.client.clone(), id, cancel, generation, tx.clone());
    }

    /// Leave the story view, discarding its comment cache, and reload the
    /// listing the user came from.
    pub fn back_to_listing(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let (category, page) = (self.category, self.page);
        self.open_listing(category, page as i64, tx);
    }

    /// Reload whatever the current view shows.
    pub fn refresh(&mut self, tx: &mpsc::Sender<AppEvent>) {
        match self.view {
            View::Listing => self.open_listing(self.category, self.page as i64, tx),
            View::Story { id } => self.open_story(id, tx),
        }
    }

    // ------------------------------------------------------------------
    // Listing helpers
    // ------------------------------------------------------------------

    /// Ids of the rows on the visible page, in listing order.
    pub fn visible_ids(&self) -> &[u64] {
        match &self.ids {
            RemoteData::Loaded(ids) => pager::slice_page(ids, self.page, self.page_size),
            _ => &[],
        }
    }

    /// Total pages for the fetched id list, capped by the listing ceiling.
    pub fn page_count(&self) -> usize {
        match &self.ids {
            RemoteData::Loaded(ids) => {
                pager::page_count(ids.len().min(pager::MAX_LISTED), self.page_size)
            }
            _ => 1,
        }
    }

    pub fn selected_story_id(&self) -> Option<u64> {
        self.visible_ids().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, delta: i64) {
        let len = self.visible_ids().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected as i64;
        self.selected = (current + delta).clamp(0, len as i64 - 1) as usize;
    }

    // ------------------------------------------------------------------
    // Story view helpers
    // ------------------------------------------------------------------

    /// Flatten the currently-renderable comment tree in display order.
    ///
    /// Walks the opened story's `kids` depth-first through the cache,
    /// skipping children that resolved loaded-and-deleted and not
    /// descending into collapsed nodes (the collapsed node itself stays
    /// visible as a stub). Unresolved ids occupy a placeholder row each, so
    /// a loaded comment renders immediately even while the loader is still
    /// catching up on its children.
    pub fn visible_comment_nodes(&self) -> Vec<CommentNode> {
        let Some(story) = self.story.loaded() else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        self.flatten_into(&story.kids, 0, &mut nodes);
        nodes
    }

    fn flatten_into(&self, kids: &[u64], depth: usize, out: &mut Vec<CommentNode>) {
        for &id in kids {
            if let Some(RemoteData::Loaded(comment)) = self.comments.get(id) {
                if comment.deleted {
                    continue;
                }
                out.push(CommentNode { id, depth });
                if !self.collapsed.contains(&id) {
                    self.flatten_into(&comment.kids, depth + 1, out);
                }
            } else {
                // Loading, errored, or not yet announced: one placeholder row.
                out.push(CommentNode { id, depth });
            }
        }
    }

    pub fn move_comment_cursor(&mut self, delta: i64) {
        let len = self.visible_comment_nodes().len();
        if len == 0 {
            self.comment_cursor = 0;
            return;
        }
        let current = self.comment_cursor as i64;
        self.comment_cursor = (current + delta).clamp(0, len as i64 - 1) as usize;
    }

    /// Fold or unfold the subtree under the comment cursor.
    pub fn toggle_collapse_at_cursor(&mut self) {
        let nodes = self.visible_comment_nodes();
        let Some(node) = nodes.get(self.comment_cursor) else {
            return;
        };
        let has_replies = self
            .comments
            .get(node.id)
            .and_then(|state| state.loaded())
            .map(|comment| !comment.kids.is_empty())
            .unwrap_or(false);
        if !has_replies {
            return;
        }
        if !self.collapsed.remove(&node.id) {
            self.collapsed.insert(node.id);
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------

    pub fn set_status(&mut self, message: impl Into<Cow<'static, str>>) {
        self.status_message = Some((message.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop an expired status message. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, shown_at)) if shown_at.elapsed() >= STATUS_TTL => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }
}

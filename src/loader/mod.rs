//! Loading machinery between the gateway and the UI.
//!
//! - [`pager`] - pure pagination over a category's full id list
//! - [`stories`] - the listing fetch and independent per-row story loads
//! - [`comments`] - the sequential depth-first comment tree traversal
//! - [`cache`] - the keyed loading/loaded/error store the traversal feeds
//!
//! Loaders never touch app state directly: they emit typed events over the
//! app channel, and the UI thread folds those into the caches between
//! frames.

pub mod cache;
pub mod comments;
pub mod pager;
pub mod stories;

pub use cache::{CommentCache, CommentEvent, RemoteData};
pub use comments::stream_thread;

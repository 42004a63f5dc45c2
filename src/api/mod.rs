//! Remote item gateway for the Hacker News API.
//!
//! Wraps the three read-only calls the reader needs:
//!
//! - **Listing**: the full id list for a feed category
//! - **Story**: one submission by id
//! - **Comment**: one comment by id
//!
//! Every call takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! derived from the owning view's lifetime; a cancelled call resolves to
//! [`ApiError::Cancelled`], which callers swallow.

mod client;
mod types;

pub use client::{ApiError, HnClient};
pub use types::{Category, Comment, ItemKind, Story};

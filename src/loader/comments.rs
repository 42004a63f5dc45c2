//! Depth-first comment tree loader.
//!
//! Given a story's top-level comment ids, walks the tree one fetch at a
//! time, children before later siblings, publishing a state transition for
//! every id it touches. The traversal is strictly sequential by design: the
//! N+1th fetch is never issued until the Nth has resolved or been
//! cancelled. Readers scan threads top to bottom, so a reply chain should
//! finish before an unrelated sibling thread starts, and one request at a
//! time keeps the remote API load predictable.
//!
//! Ordering contract:
//!
//! 1. Every discovered sibling group is announced as one
//!    [`CommentEvent::Pending`] batch, in display order, before any of its
//!    members is fetched — the UI renders ordered placeholders immediately
//!    even though data arrives later.
//! 2. A fetched comment's kids are spliced at the *front* of the queue,
//!    ahead of everything that was already waiting, preserving their
//!    relative order. The result is a strict pre-order DFS.
//! 3. A failed fetch resolves only that id; siblings and ancestors continue.
//! 4. Cancellation stops the whole traversal silently: no further dequeues,
//!    no transitions for ids still pending.

use crate::api::HnClient;
use crate::loader::cache::CommentEvent;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Walk a comment tree depth-first, emitting [`CommentEvent`]s through `tx`.
///
/// `wrap` lifts each event into the channel's message type; the app passes
/// a closure stamping its view generation, tests pass the identity.
///
/// Deleted comments are traversed like live ones: their kids are announced
/// and fetched even though neither parent nor subtree may ever render. The
/// renderer filters; the traversal does not.
///
/// Returns when the queue empties, the token is cancelled, or the receiver
/// is dropped.
pub async fn stream_thread<T, F>(
    client: HnClient,
    roots: Vec<u64>,
    cancel: CancellationToken,
    tx: mpsc::Sender<T>,
    wrap: F,
) where
    F: Fn(CommentEvent) -> T,
{
    if roots.is_empty() {
        return;
    }

    if tx
        .send(wrap(CommentEvent::Pending { ids: roots.clone() }))
        .await
        .is_err()
    {
        return;
    }

    let mut queue: VecDeque<u64> = roots.into();

    while let Some(id) = queue.pop_front() {
        match client.get_comment(id, &cancel).await {
            Ok(comment) => {
                let kids = comment.kids.clone();
                if tx
                    .send(wrap(CommentEvent::Loaded { id, comment }))
                    .await
                    .is_err()
                {
                    return;
                }
                if !kids.is_empty() {
                    if tx
                        .send(wrap(CommentEvent::Pending { ids: kids.clone() }))
                        .await
                        .is_err()
                    {
                        return;
                    }
                    // Front splice: kids run before every already-queued
                    // sibling, keeping their own relative order.
                    for kid in kids.into_iter().rev() {
                        queue.push_front(kid);
                    }
                }
            }
            Err(err) if err.is_cancelled() => {
                tracing::debug!(id, remaining = queue.len(), "comment traversal cancelled");
                return;
            }
            Err(err) => {
                tracing::debug!(id, error = %err, "comment fetch failed");
                if tx
                    .send(wrap(CommentEvent::Failed {
                        id,
                        error: err.to_string(),
                    }))
                    .await
                    .is_err()
                {
                    return;
                }
            }
        }
    }
}

//! Listing and story-row loading tasks.
//!
//! One task fetches a category's id list; after the UI slices out the
//! visible page, each row gets its own independent fetch so rows render as
//! data arrives instead of waiting on the whole page. Rows resolve in
//! network-arrival order; nothing here imposes one.
//!
//! Every task is scoped to the owning view's cancellation token and stamps
//! its results with the view generation so the event fold can discard
//! deliveries that outlive a navigation.

use crate::api::{Category, HnClient};
use crate::app::AppEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Fetch the full id list for a category.
///
/// Cancelled fetches post nothing; failures post an error string for the
/// listing-level error line.
pub fn spawn_listing(
    client: HnClient,
    category: Category,
    cancel: CancellationToken,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match client.list_ids(category, &cancel).await {
            Ok(ids) => Ok(ids),
            Err(err) if err.is_cancelled() => return,
            Err(err) => Err(err.to_string()),
        };
        if tx
            .send(AppEvent::IdsLoaded {
                generation,
                category,
                result,
            })
            .await
            .is_err()
        {
            tracing::warn!("ids receiver dropped before listing delivery");
        }
    })
}

/// Fetch each visible story independently.
///
/// The caller has already marked these ids loading as one batch; each task
/// resolves exactly one row and rows never block one another.
pub fn spawn_story_rows(
    client: HnClient,
    ids: Vec<u64>,
    cancel: CancellationToken,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) {
    for id in ids {
        let client = client.clone();
        let cancel = cancel.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = match client.get_story(id, &cancel).await {
                Ok(story) => Ok(story),
                Err(err) if err.is_cancelled() => return,
                Err(err) => Err(err.to_string()),
            };
            let _ = tx
                .send(AppEvent::StoryLoaded {
                    generation,
                    id,
                    result,
                })
                .await;
        });
    }
}

/// Fetch the story a detail view was opened for.
///
/// The comment traversal is started by the event fold once this resolves
/// with a non-empty kid list.
pub fn spawn_story_detail(
    client: HnClient,
    id: u64,
    cancel: CancellationToken,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match client.get_story(id, &cancel).await {
            Ok(story) => Ok(story),
            Err(err) if err.is_cancelled() => return,
            Err(err) => Err(err.to_string()),
        };
        let _ = tx
            .send(AppEvent::StoryOpened {
                generation,
                id,
                result,
            })
            .await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_story(server: &MockServer, id: u64, title: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/item/{id}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "by": "tester",
                "score": 1,
                "type": "story",
                "title": title,
                "time": 1_700_000_000u64,
                "descendants": 0,
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn every_row_resolves_independently() {
        let server = MockServer::start().await;
        mount_story(&server, 1, "one").await;
        Mock::given(method("GET"))
            .and(path("/item/2.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_story(&server, 3, "three").await;

        let client = HnClient::new(reqwest::Client::new(), server.uri());
        let (tx, mut rx) = mpsc::channel(16);
        spawn_story_rows(client, vec![1, 2, 3], CancellationToken::new(), 7, tx);

        let mut seen = BTreeSet::new();
        let mut failed = BTreeSet::new();
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                AppEvent::StoryLoaded {
                    generation: 7,
                    id,
                    result,
                } => {
                    if result.is_ok() {
                        seen.insert(id);
                    } else {
                        failed.insert(id);
                    }
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }

        // Arrival order is unspecified; the set of outcomes is not.
        assert_eq!(seen, BTreeSet::from([1, 3]));
        assert_eq!(failed, BTreeSet::from([2]));
    }

    #[tokio::test]
    async fn cancelled_listing_posts_nothing() {
        let server = MockServer::start().await;
        let client = HnClient::new(reqwest::Client::new(), server.uri());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (tx, mut rx) = mpsc::channel(4);
        spawn_listing(client, Category::Top, cancel, 1, tx)
            .await
            .unwrap();

        assert!(rx.try_recv().is_err());
    }
}

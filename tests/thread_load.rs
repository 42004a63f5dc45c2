//! End-to-end comment thread streaming: fetch order, cache transitions,
//! cancellation, and deleted-comment filtering against a mock API.

use lurk::api::{HnClient, Story};
use lurk::app::App;
use lurk::config::Config;
use lurk::loader::cache::{CommentCache, CommentEvent, RemoteData};
use lurk::loader::comments::stream_thread;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HnClient {
    HnClient::new(reqwest::Client::new(), server.uri())
}

async fn mount_comment(server: &MockServer, id: u64, kids: &[u64], deleted: bool) {
    let mut body = json!({
        "id": id,
        "type": "comment",
        "kids": kids,
    });
    if deleted {
        body["deleted"] = json!(true);
    } else {
        body["by"] = json!(format!("user{id}"));
        body["text"] = json!(format!("comment {id} body"));
        body["time"] = json!(1_700_000_000u64);
    }
    Mock::given(method("GET"))
        .and(path(format!("/item/{id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Run the traversal to completion, folding every event into a cache and
/// returning the event log alongside it.
async fn run_traversal(
    client: HnClient,
    roots: Vec<u64>,
    cancel: CancellationToken,
) -> (CommentCache, Vec<CommentEvent>) {
    let (tx, mut rx) = mpsc::channel(64);
    let walker = tokio::spawn(stream_thread(client, roots, cancel, tx, |e| e));

    let mut cache = CommentCache::new();
    let mut log = Vec::new();
    while let Some(event) = rx.recv().await {
        cache.apply(event.clone());
        log.push(event);
    }
    walker.await.unwrap();
    (cache, log)
}

fn completion_order(log: &[CommentEvent]) -> Vec<u64> {
    log.iter()
        .filter_map(|e| match e {
            CommentEvent::Loaded { id, .. } | CommentEvent::Failed { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Depth-first ordering
// ============================================================================

#[tokio::test]
async fn issued_fetch_order_is_ten_eleven_twenty() {
    // Story kids [10, 20]; comment 10 has kid 11. The loader must issue
    // 10, then 11, then 20 - never 20 before 11.
    let server = MockServer::start().await;
    mount_comment(&server, 10, &[11], false).await;
    mount_comment(&server, 11, &[], false).await;
    mount_comment(&server, 20, &[], false).await;

    let (cache, log) =
        run_traversal(client(&server), vec![10, 20], CancellationToken::new()).await;

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        requested,
        vec!["/item/10.json", "/item/11.json", "/item/20.json"]
    );
    assert_eq!(completion_order(&log), vec![10, 11, 20]);

    for id in [10, 11, 20] {
        assert!(cache.get(id).unwrap().loaded().is_some());
    }
}

#[tokio::test]
async fn subtree_completes_before_later_sibling_starts() {
    // Root [a, b], a has child a1: observed completion order must be
    // a, a1, b - b never completes before a1.
    let server = MockServer::start().await;
    mount_comment(&server, 100, &[101], false).await; // a -> a1
    mount_comment(&server, 101, &[], false).await;
    mount_comment(&server, 200, &[], false).await; // b

    let (_, log) =
        run_traversal(client(&server), vec![100, 200], CancellationToken::new()).await;

    assert_eq!(completion_order(&log), vec![100, 101, 200]);
}

// ============================================================================
// Cache state machine
// ============================================================================

#[tokio::test]
async fn every_id_transitions_loading_then_resolves_exactly_once() {
    let server = MockServer::start().await;
    mount_comment(&server, 1, &[2], false).await;
    mount_comment(&server, 2, &[], false).await;

    let (tx, mut rx) = mpsc::channel(64);
    let walker = tokio::spawn(stream_thread(
        client(&server),
        vec![1],
        CancellationToken::new(),
        tx,
        |e| e,
    ));

    let mut cache = CommentCache::new();
    while let Some(event) = rx.recv().await {
        // Before a resolution is applied, the id must already be marked
        // loading; afterwards it must be resolved.
        if let CommentEvent::Loaded { id, .. } | CommentEvent::Failed { id, .. } = &event {
            assert_eq!(cache.get(*id), Some(&RemoteData::Loading));
        }
        cache.apply(event);
    }
    walker.await.unwrap();

    assert_eq!(cache.pending_count(), 0);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn failed_comment_is_contained_to_its_own_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/item/10.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_comment(&server, 20, &[21], false).await;
    mount_comment(&server, 21, &[], false).await;

    let (cache, log) =
        run_traversal(client(&server), vec![10, 20], CancellationToken::new()).await;

    assert!(matches!(cache.get(10), Some(RemoteData::Error(_))));
    assert_eq!(
        completion_order(&log),
        vec![10, 20, 21],
        "10's failure must not abort 20's subtree"
    );
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn cancellation_stops_all_cache_writes() {
    // 10 resolves, then the view is torn down while 20 is in flight. No id
    // may transition after the cancellation point.
    let server = MockServer::start().await;
    mount_comment(&server, 10, &[], false).await;
    Mock::given(method("GET"))
        .and(path("/item/20.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 20, "type": "comment"}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel(64);
    let walker = tokio::spawn(stream_thread(
        client(&server),
        vec![10, 20],
        cancel.clone(),
        tx,
        |e| e,
    ));

    let mut cache = CommentCache::new();
    while let Some(event) = rx.recv().await {
        let cancel_now = matches!(event, CommentEvent::Loaded { id: 10, .. });
        cache.apply(event);
        if cancel_now {
            cancel.cancel();
        }
    }
    walker.await.unwrap();

    assert!(cache.get(10).unwrap().loaded().is_some());
    // 20 was announced before the cancellation and stays frozen as loading.
    assert_eq!(cache.get(20), Some(&RemoteData::Loading));
    assert_eq!(cache.pending_count(), 1);
}

// ============================================================================
// Deleted comments
// ============================================================================

#[tokio::test]
async fn deleted_comments_resolve_but_never_render() {
    // Story kids [10, 15, 20]; 15 is deleted. It occupies a slot in the raw
    // kid list and resolves in the cache, but the rendered tree skips it.
    let server = MockServer::start().await;
    mount_comment(&server, 10, &[], false).await;
    mount_comment(&server, 15, &[], true).await;
    mount_comment(&server, 20, &[], false).await;

    let (cache, log) = run_traversal(
        client(&server),
        vec![10, 15, 20],
        CancellationToken::new(),
    )
    .await;
    assert_eq!(completion_order(&log), vec![10, 15, 20]);

    let hn = HnClient::new(reqwest::Client::new(), server.uri());
    let mut app = App::new(hn, &Config::default());
    let story: Story = serde_json::from_value(json!({
        "id": 1,
        "by": "op",
        "score": 1,
        "type": "story",
        "title": "story",
        "time": 1_700_000_000u64,
        "descendants": 3,
        "kids": [10, 15, 20],
    }))
    .unwrap();
    app.story = RemoteData::Loaded(story);
    for id in [10, 15, 20] {
        if let Some(state) = cache.get(id) {
            match state {
                RemoteData::Loaded(comment) => app.comments.apply(CommentEvent::Loaded {
                    id,
                    comment: comment.clone(),
                }),
                RemoteData::Error(error) => app.comments.apply(CommentEvent::Failed {
                    id,
                    error: error.clone(),
                }),
                RemoteData::Loading => app.comments.apply(CommentEvent::Pending { ids: vec![id] }),
            }
        }
    }

    let rendered: Vec<u64> = app.visible_comment_nodes().iter().map(|n| n.id).collect();
    assert_eq!(rendered, vec![10, 20], "deleted 15 must not render");
}

#[tokio::test]
async fn deleted_comment_with_kids_still_traverses() {
    let server = MockServer::start().await;
    mount_comment(&server, 10, &[11], true).await; // deleted parent
    mount_comment(&server, 11, &[], false).await;

    let (cache, log) = run_traversal(client(&server), vec![10], CancellationToken::new()).await;

    assert_eq!(completion_order(&log), vec![10, 11]);
    assert!(cache.get(11).unwrap().loaded().is_some());
}

//! Application event handling.
//!
//! This is the single place app state is mutated from loader results. Every
//! event carries the generation of the view that spawned it; events from a
//! replaced view are dropped here, which together with token cancellation
//! guarantees no transitions land after a navigation.

use crate::app::{App, AppEvent, View};
use crate::loader::cache::RemoteData;
use crate::loader::{comments, stories};
use tokio::sync::mpsc;

/// Fold one background event into app state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::IdsLoaded {
            generation,
            category,
            result,
        } => {
            if !app.is_current(generation) {
                tracing::debug!(generation, "dropping stale id list");
                return;
            }
            handle_ids_loaded(app, result, event_tx);
            tracing::debug!(category = %category, "listing ids applied");
        }
        AppEvent::StoryLoaded {
            generation,
            id,
            result,
        } => {
            if !app.is_current(generation) {
                tracing::debug!(generation, id, "dropping stale story row");
                return;
            }
            let state = match result {
                Ok(story) => RemoteData::Loaded(story),
                Err(error) => RemoteData::Error(error),
            };
            app.stories.insert(id, state);
        }
        AppEvent::StoryOpened {
            generation,
            id,
            result,
        } => {
            if !app.is_current(generation) {
                tracing::debug!(generation, id, "dropping stale story detail");
                return;
            }
            handle_story_opened(app, id, result, event_tx);
        }
        AppEvent::Comment { generation, event } => {
            if !app.is_current(generation) {
                tracing::debug!(generation, "dropping stale comment transition");
                return;
            }
            app.comments.apply(event);
        }
    }
}

/// The category id list resolved: slice the visible page and start one
/// independent fetch per row.
///
/// The whole page's rows are marked loading in this single step, so the
/// listing renders a full page of ordered placeholders at once.
fn handle_ids_loaded(
    app: &mut App,
    result: Result<Vec<u64>, String>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match result {
        Ok(ids) => {
            app.ids = RemoteData::Loaded(ids);
            let visible: Vec<u64> = app.visible_ids().to_vec();
            for &id in &visible {
                app.stories.insert(id, RemoteData::Loading);
            }
            app.selected = app.selected.min(visible.len().saturating_sub(1));
            if !visible.is_empty() {
                stories::spawn_story_rows(
                    app.client.clone(),
                    visible,
                    app.view_token(),
                    app.generation(),
                    event_tx.clone(),
                );
            }
        }
        Err(error) => {
            app.ids = RemoteData::Error(error);
        }
    }
}

/// The opened story resolved: show it and start the comment traversal.
fn handle_story_opened(
    app: &mut App,
    id: u64,
    result: Result<crate::api::Story, String>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    // The user may have navigated to a different story within the same
    // generation window; only the story this view was opened for applies.
    if app.view != (View::Story { id }) {
        tracing::debug!(id, "story detail no longer on screen");
        return;
    }

    match result {
        Ok(story) => {
            let roots = story.kids.clone();
            app.story = RemoteData::Loaded(story);

            if !roots.is_empty() {
                let generation = app.generation();
                tokio::spawn(comments::stream_thread(
                    app.client.clone(),
                    roots,
                    app.view_token(),
                    event_tx.clone(),
                    move |event| AppEvent::Comment { generation, event },
                ));
            }
        }
        Err(error) => {
            app.story = RemoteData::Error(error);
        }
    }
}

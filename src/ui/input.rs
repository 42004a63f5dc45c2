//! Keyboard input handling.

use crate::api::Category;
use crate::app::{App, AppEvent, View};
use crate::loader::cache::RemoteData;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::loop_runner::Action;
use super::story;

/// Dispatch one key press against the current view.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Ctrl-C always quits, regardless of view.
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    match app.view {
        View::Listing => handle_listing_key(app, code, tx),
        View::Story { .. } => handle_story_key(app, code, tx),
    }
}

fn handle_listing_key(
    app: &mut App,
    code: KeyCode,
    tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),

        KeyCode::Enter => {
            if let Some(id) = app.selected_story_id() {
                app.open_story(id, tx);
            }
        }

        KeyCode::Char('h') | KeyCode::Left => {
            if app.page > 1 {
                let page = app.page as i64 - 1;
                app.open_listing(app.category, page, tx);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.page < app.page_count() {
                let page = app.page as i64 + 1;
                app.open_listing(app.category, page, tx);
            } else {
                app.set_status("Last page");
            }
        }

        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            let category = Category::ALL[index];
            if category != app.category || app.page != 1 {
                app.open_listing(category, 1, tx);
            }
        }

        KeyCode::Char('o') => open_selected_url(app),
        KeyCode::Char('r') => {
            app.refresh(tx);
            app.set_status("Reloading...");
        }

        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_story_key(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Result<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => {
            app.back_to_listing(tx);
        }

        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll = app.scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll = app.scroll.saturating_sub(1);
        }
        KeyCode::PageDown | KeyCode::Char('d') => {
            app.scroll = app.scroll.saturating_add(20);
        }
        KeyCode::PageUp | KeyCode::Char('u') => {
            app.scroll = app.scroll.saturating_sub(20);
        }
        KeyCode::Char('g') => {
            app.scroll = 0;
        }

        // Comment cursor: jump between nodes and fold the one under it.
        KeyCode::Char('n') => {
            app.move_comment_cursor(1);
            app.scroll = story::node_start_line(app, app.comment_cursor);
        }
        KeyCode::Char('p') => {
            app.move_comment_cursor(-1);
            app.scroll = story::node_start_line(app, app.comment_cursor);
        }
        KeyCode::Char('c') | KeyCode::Char(' ') => {
            app.toggle_collapse_at_cursor();
        }

        KeyCode::Char('o') => open_selected_url(app),
        KeyCode::Char('r') => {
            app.refresh(tx);
            app.set_status("Reloading...");
        }

        _ => {}
    }
    Ok(Action::Continue)
}

/// Open the relevant story's link in the system browser.
///
/// Falls back to the story's HN discussion page for self posts.
fn open_selected_url(app: &mut App) {
    let story = match app.view {
        View::Story { .. } => app.story.loaded(),
        View::Listing => app
            .selected_story_id()
            .and_then(|id| app.stories.get(&id))
            .and_then(RemoteData::loaded),
    };
    let Some(story) = story else {
        app.set_status("Story not loaded yet");
        return;
    };

    let url = story
        .url
        .clone()
        .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", story.id));

    match open::that(&url) {
        Ok(()) => app.set_status(format!("Opened {}", url)),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "failed to open browser");
            app.set_status(format!("Failed to open browser: {}", e));
        }
    }
}

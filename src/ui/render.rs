//! View rendering dispatch.

use crate::app::{App, View};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use super::{status, stories, story};

pub(super) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    match app.view {
        View::Listing => stories::render(f, app, chunks[0]),
        View::Story { .. } => story::render(f, app, chunks[0]),
    }

    status::render(f, app, chunks[1]);
}

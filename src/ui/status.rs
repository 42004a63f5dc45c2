//! Bottom status bar: transient messages on the left, view context on the
//! right.

use crate::app::{App, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const LISTING_KEYS: &str = "j/k move · enter open · h/l page · 1-6 category · o browser · r reload · q quit";
const STORY_KEYS: &str = "j/k scroll · n/p comment · c fold · o browser · r reload · q back";

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let left: Span = match &app.status_message {
        Some((message, _)) => Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
        None => {
            let keys = match app.view {
                View::Listing => LISTING_KEYS,
                View::Story { .. } => STORY_KEYS,
            };
            Span::styled(keys, Style::default().fg(Color::DarkGray))
        }
    };

    let right = match app.view {
        View::Listing => format!("{} · page {}/{}", app.category.label(), app.page, app.page_count()),
        View::Story { .. } => {
            let pending = app.comments.pending_count();
            if pending > 0 {
                format!("streaming comments ({} pending)", pending)
            } else {
                format!("{} comments", app.comments.len())
            }
        }
    };

    let padding = (area.width as usize)
        .saturating_sub(left.width())
        .saturating_sub(right.len());
    let line = Line::from(vec![
        left,
        Span::from(" ".repeat(padding)),
        Span::styled(right, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

//! Story listing widget: one row per visible id, each in its own
//! loading/loaded/error state so the page fills in as rows arrive.

use crate::api::ItemKind;
use crate::app::App;
use crate::loader::cache::RemoteData;
use crate::util::{extract_domain, relative_time, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = match &app.ids {
        RemoteData::Loading => vec![ListItem::new("Loading stories...")],
        RemoteData::Error(error) => vec![ListItem::new(Line::from(Span::styled(
            format!("Failed to load listing: {} (press r to retry)", error),
            Style::default().fg(Color::Red),
        )))],
        RemoteData::Loaded(_) => {
            let visible = app.visible_ids();
            if visible.is_empty() {
                vec![ListItem::new("No stories on this page")]
            } else {
                visible
                    .iter()
                    .enumerate()
                    .map(|(i, &id)| story_row(app, i, id, area.width))
                    .collect()
            }
        }
    };

    let title = format!(
        " Hacker News - {} - page {}/{} ",
        app.category.label(),
        app.page,
        app.page_count()
    );

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

/// One listing row. Rows never block on one another: whatever state this
/// id's fetch is in right now is what renders.
fn story_row(app: &App, index: usize, id: u64, width: u16) -> ListItem<'static> {
    let selected = index == app.selected;
    let rank = (app.page - 1) * app.page_size + index + 1;

    let mut spans = vec![Span::styled(
        format!("{:>3}. ", rank),
        Style::default().fg(Color::DarkGray),
    )];

    match app.stories.get(&id) {
        None | Some(RemoteData::Loading) => {
            spans.push(Span::styled(
                format!("loading story {}...", id),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Some(RemoteData::Error(error)) => {
            spans.push(Span::styled(
                format!("story {} failed: {}", id, error),
                Style::default().fg(Color::Red),
            ));
        }
        Some(RemoteData::Loaded(story)) => {
            let title_style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            // Leave room for the score/byline tail.
            let max_title = (width as usize).saturating_sub(40);
            spans.push(Span::styled(
                truncate_to_width(&story.title, max_title).into_owned(),
                title_style,
            ));

            if let Some(url) = &story.url {
                spans.push(Span::styled(
                    format!(" ({})", extract_domain(url)),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            let tail = match story.kind {
                ItemKind::Job => format!("  {} pts · Hiring", story.score),
                _ => format!(
                    "  {} pts · {} · {} replies · {}",
                    story.score,
                    story.by,
                    story.descendants,
                    relative_time(Some(story.time)),
                ),
            };
            spans.push(Span::styled(tail, Style::default().fg(Color::Gray)));
        }
    }

    let mut item = ListItem::new(Line::from(spans));
    if selected {
        item = item.style(Style::default().bg(Color::Black));
    }
    item
}

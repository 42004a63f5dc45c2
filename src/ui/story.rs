//! Story detail widget: header plus the streaming comment tree.
//!
//! Rendering is a pure read over the comment cache. For each visible node:
//! loading renders a placeholder, an error renders an inline failure marker
//! with the id and message, and a loaded comment renders its byline and
//! body before recursing - so a thread shows up immediately with
//! placeholders for children the loader has not reached yet.

use crate::app::{App, CommentNode};
use crate::loader::cache::RemoteData;
use crate::util::{extract_domain, html_to_text, relative_time, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Cycling gutter colors so adjacent depths stay distinguishable.
const GUTTER_COLORS: [Color; 3] = [Color::Blue, Color::Magenta, Color::Cyan];

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let lines = build_lines(app).0;

    let title = match app.story.loaded() {
        Some(story) => format!(" {} ", truncate_to_width(&story.title, 60)),
        None => " Story ".to_string(),
    };

    let scroll = app.scroll.min(u16::MAX as usize) as u16;
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

/// Line offset where the node at `index` starts, for cursor-follow scrolling.
pub(super) fn node_start_line(app: &App, index: usize) -> usize {
    let (_, offsets) = build_lines(app);
    offsets.get(index).copied().unwrap_or(0)
}

/// Build the full unwrapped line list plus each comment node's start line.
fn build_lines(app: &App) -> (Vec<Line<'static>>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut offsets = Vec::new();

    match &app.story {
        RemoteData::Loading => {
            lines.push(Line::from("Loading story..."));
            return (lines, offsets);
        }
        RemoteData::Error(error) => {
            lines.push(Line::from(Span::styled(
                format!("Failed to load story: {} (press r to retry)", error),
                Style::default().fg(Color::Red),
            )));
            return (lines, offsets);
        }
        RemoteData::Loaded(story) => {
            let mut header = vec![Span::styled(
                story.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(url) = &story.url {
                header.push(Span::styled(
                    format!(" ({})", extract_domain(url)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(header));
            lines.push(Line::from(Span::styled(
                format!(
                    "{} points by {} · {} · {} comments",
                    story.score,
                    story.by,
                    relative_time(Some(story.time)),
                    story.descendants,
                ),
                Style::default().fg(Color::Gray),
            )));

            if let Some(text) = &story.text {
                lines.push(Line::default());
                for body_line in html_to_text(text).lines() {
                    lines.push(Line::from(body_line.to_string()));
                }
            }
            lines.push(Line::default());

            if story.descendants == 0 && story.kids.is_empty() {
                lines.push(Line::from(Span::styled(
                    "(This story has no comments)",
                    Style::default().fg(Color::DarkGray),
                )));
                return (lines, offsets);
            }
        }
    }

    let nodes = app.visible_comment_nodes();
    for (index, node) in nodes.iter().enumerate() {
        offsets.push(lines.len());
        push_comment_lines(app, node, index == app.comment_cursor, &mut lines);
    }

    (lines, offsets)
}

fn indent_span(depth: usize) -> Span<'static> {
    let color = GUTTER_COLORS[depth % GUTTER_COLORS.len()];
    Span::styled("│ ".repeat(depth), Style::default().fg(color))
}

fn push_comment_lines(
    app: &App,
    node: &CommentNode,
    under_cursor: bool,
    lines: &mut Vec<Line<'static>>,
) {
    let indent = indent_span(node.depth);

    match app.comments.get(node.id) {
        None | Some(RemoteData::Loading) => {
            lines.push(Line::from(vec![
                indent,
                Span::styled(
                    format!("· loading comment {}...", node.id),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        Some(RemoteData::Error(error)) => {
            lines.push(Line::from(vec![
                indent,
                Span::styled(
                    format!("✗ comment {} failed: {}", node.id, error),
                    Style::default().fg(Color::Red),
                ),
            ]));
        }
        Some(RemoteData::Loaded(comment)) => {
            let mut byline_style = Style::default().fg(Color::Yellow);
            if under_cursor {
                byline_style = byline_style.add_modifier(Modifier::REVERSED);
            }
            let author = comment.by.as_deref().unwrap_or("[unknown]");
            lines.push(Line::from(vec![
                indent.clone(),
                Span::styled(
                    format!("{} · {}", author, relative_time(comment.time)),
                    byline_style,
                ),
            ]));

            if let Some(text) = &comment.text {
                for body_line in html_to_text(text).lines() {
                    lines.push(Line::from(vec![
                        indent.clone(),
                        Span::from(body_line.to_string()),
                    ]));
                }
            }

            if app.collapsed.contains(&node.id) && !comment.kids.is_empty() {
                lines.push(Line::from(vec![
                    indent.clone(),
                    Span::styled(
                        format!("▸ show {} replies", comment.kids.len()),
                        Style::default().fg(Color::Cyan),
                    ),
                ]));
            }

            lines.push(Line::default());
        }
    }
}

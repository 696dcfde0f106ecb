//! UI rendering using ratatui

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use recipectl_core::editor::GroupKind;

use super::app::{App, Focus, ScalarField};

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for the focused row
const HIGHLIGHT: Color = Color::Yellow;
/// Notice border color
const WARNING: Color = Color::Red;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Scalar fields
            Constraint::Min(6),    // Row groups
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_fields(frame, app, chunks[0]);

    let groups = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_group(frame, app, GroupKind::Ingredients, groups[0]);
    render_group(frame, app, GroupKind::Instructions, groups[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.modal.is_some() {
        render_notice(frame, app);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Title, description, tags and cuisine, one line each
fn render_fields(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = ScalarField::ALL
        .iter()
        .map(|field| {
            let focused = app.focus == Focus::Field(*field);
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:<24}", field.label()), Style::default().fg(ACCENT)),
                Span::styled(format!("{}{}", app.field_value(*field), cursor), focus_style(focused)),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ", app.heading))
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One row group: ingredients as a plain list, instructions numbered
fn render_group(frame: &mut Frame, app: &App, kind: GroupKind, area: Rect) {
    let focused_group = app.focused_group() == Some(kind);
    let items: Vec<ListItem> = app
        .editor
        .rows(kind)
        .iter()
        .map(|row| {
            let focused = app.focus == Focus::Row(kind, row.id());
            let prefix = match row.ordinal() {
                Some(n) => format!("{:>2}. ", n),
                None => " -  ".to_string(),
            };
            if row.value().is_empty() && !focused {
                return ListItem::new(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(SECONDARY)),
                    Span::styled("(required)", Style::default().fg(DIM)),
                ]));
            }

            // Continuation lines of a step line up under its first line
            let cursor = if focused { "_" } else { "" };
            let text = format!("{}{}", row.value(), cursor);
            let lines: Vec<Line> = text
                .split('\n')
                .enumerate()
                .map(|(i, part)| {
                    let lead = if i == 0 { prefix.clone() } else { " ".repeat(prefix.len()) };
                    Line::from(vec![
                        Span::styled(lead, Style::default().fg(SECONDARY)),
                        Span::styled(part.to_string(), focus_style(focused)),
                    ])
                })
                .collect();
            ListItem::new(lines)
        })
        .collect();

    let limit = app
        .editor
        .config()
        .max_for(kind)
        .map(|max| format!(" {}/{} ", app.editor.len(kind), max))
        .unwrap_or_default();

    let (title, key) = match kind {
        GroupKind::Ingredients => ("Ingredients", "F2"),
        GroupKind::Instructions => ("Instructions", "F3"),
    };

    let block = Block::default()
        .title(format!(" {} [{}: add] ", title, key))
        .title_bottom(Line::from(limit).right_aligned())
        .borders(Borders::ALL)
        .border_style(if focused_group {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(SECONDARY)
        });

    frame.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text =
        "Tab/Up/Down:move  F2:+ingredient  F3:+step  Alt+Enter:new line  Ctrl+D:remove  Ctrl+S:save  Esc:cancel";
    let status = app.status_message.as_deref().unwrap_or("");

    let line = Line::from(vec![
        Span::styled(help_text, Style::default().fg(DIM)),
        Span::raw("  "),
        Span::styled(status, Style::default().fg(HIGHLIGHT)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Blocking notice overlay
fn render_notice(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if let Some(ref message) = app.modal {
        let width = area.width.saturating_sub(4).min(50);
        let height = area.height.min(5);

        let popup_area = Rect {
            x: (area.width.saturating_sub(width)) / 2,
            y: (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Notice (press any key) ")
            .title_style(Style::default().fg(WARNING).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(WARNING));

        let paragraph = Paragraph::new(message.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));

        frame.render_widget(paragraph, popup_area);
    }
}

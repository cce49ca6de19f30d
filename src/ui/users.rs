use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::{AppState, FilterField, InputMode};
use crate::pagination::PAGE_SIZES;

/// Name input, age input and the page-size selector, side by side.
pub fn render_filter_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_filter_input(f, cols[0], app, FilterField::Name, "Filter by name");
    render_filter_input(f, cols[1], app, FilterField::Age, "Filter by age");

    let mut spans = Vec::with_capacity(PAGE_SIZES.len() * 2);
    for size in PAGE_SIZES {
        let style = if size == app.query.limit {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(app.theme.muted)
        };
        spans.push(Span::styled(format!(" {size} "), style));
        spans.push(Span::raw(" "));
    }
    let selector = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Per page")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(selector, cols[2]);
}

fn render_filter_input(f: &mut Frame, area: Rect, app: &AppState, field: FilterField, placeholder: &str) {
    let value = app.filter(field);
    let editing = app.input_mode == InputMode::Editing(field);
    let (text, style) = if value.is_empty() && !editing {
        (placeholder.to_string(), Style::default().fg(app.theme.muted))
    } else {
        (value.to_string(), Style::default().fg(app.theme.text))
    };
    let border = if editing { app.theme.highlight_fg } else { app.theme.border };
    let title = match field {
        FilterField::Name => "Name",
        FilterField::Age => "Age",
    };
    let p = Paragraph::new(text).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);

    if editing {
        let width = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1).saturating_add(width).min(max_x);
        f.set_cursor_position((x, area.y + 1));
    }
}

/// "Loading...", "Error: ..." or one `name, age` line per user.
pub fn render_user_list(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.view.loading {
        let p = Paragraph::new("Loading...").style(Style::default().fg(app.theme.muted)).block(block);
        f.render_widget(p, area);
        return;
    }
    if let Some(err) = &app.view.error {
        let p = Paragraph::new(format!("Error: {err}"))
            .style(Style::default().fg(app.theme.error))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = app
        .view
        .users
        .iter()
        .map(|u| ListItem::new(format!("{}, {}", u.name, u.age_display())))
        .collect();
    let list = List::new(items).style(Style::default().fg(app.theme.text)).block(block);
    f.render_widget(list, area);
}

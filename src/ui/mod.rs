pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::app::keymap::KeyAction;

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let p = Paragraph::new(key_hints(app))
        .block(
            Block::default()
                .title("User List")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_filter_bar(f, root[1], app);
    users::render_user_list(f, root[2], app);
    components::render_pager(f, root[3], app);
    components::render_status_bar(f, root[4], app);
}

/// One-line help built from the active keymap, so rebinding shows up here.
fn key_hints(app: &AppState) -> String {
    let hints = [
        (KeyAction::EditName, "name filter"),
        (KeyAction::EditAge, "age filter"),
        (KeyAction::PrevPage, "prev"),
        (KeyAction::NextPage, "next"),
        (KeyAction::NextPageSize, "page size"),
        (KeyAction::Refresh, "refresh"),
        (KeyAction::Quit, "quit"),
    ];
    hints
        .iter()
        .filter_map(|(action, label)| {
            let keys = app.keymap.keys_for(*action);
            let key = keys.iter().find(|k| !k.starts_with("Ctrl+")).or(keys.first())?;
            Some(format!("{key}: {label}"))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

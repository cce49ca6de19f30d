//! Shared UI components (pager, status bar).
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, FetchStatus, FilterField, InputMode};

/// `[Prev]  Page X of Y  [Next]`, with disabled controls dimmed.
///
/// Drawn only when the last cycle loaded without error.
pub fn render_pager(f: &mut Frame, area: Rect, app: &AppState) {
    if !app.pager_visible() {
        return;
    }
    let info = app.page_info();
    let control = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted).add_modifier(Modifier::DIM)
        };
        Span::styled(label, style)
    };
    let line = Line::from(vec![
        control("[Prev]", info.has_prev),
        Span::styled(
            format!("  Page {} of {}  ", info.current, info.total),
            Style::default().fg(app.theme.text),
        ),
        control("[Next]", info.has_next),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Render the bottom status bar with mode, query and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Editing(FilterField::Name) => "EDIT(name)",
        InputMode::Editing(FilterField::Age) => "EDIT(age)",
    };
    let status = match app.status() {
        FetchStatus::Idle => "idle",
        FetchStatus::Loading => "loading",
        FetchStatus::Loaded => "loaded",
        FetchStatus::Errored => "error",
    };
    let msg = format!(
        "mode: {mode}  [{status}]  limit:{}  offset:{}  total:{}",
        app.query.limit, app.query.offset, app.view.total_count
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;
    use crate::app::{FetchOutcome, FetchedPage, Keymap, Theme};
    use crate::error::ApiError;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal.draw(|f| crate::ui::render(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let width = buf.area.width as usize;
        buf.content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with(result: Result<FetchedPage, ApiError>) -> AppState {
        let mut app = AppState::new(4, Theme::dark(), Keymap::default());
        let req = app.take_fetch_request().unwrap();
        app.apply_outcome(FetchOutcome { seq: req.seq, result });
        app
    }

    #[test]
    fn loaded_page_shows_users_and_pager() {
        let app = app_with(Ok(FetchedPage {
            users: vec![User::new(1, "Alice", 30), User::new(2, "Bob", 25)],
            total_count: 10,
        }));
        let text = screen(&app);
        assert!(text.contains("Alice, 30"));
        assert!(text.contains("Bob, 25"));
        assert!(text.contains("Page 1 of 3"));
        assert!(text.contains("[Prev]") && text.contains("[Next]"));
    }

    #[test]
    fn error_replaces_list_and_hides_pager() {
        let app = app_with(Err(ApiError::Backend("network error".into())));
        let text = screen(&app);
        assert!(text.contains("Error: network error"));
        assert!(!text.contains("Page 1 of"));
    }

    #[test]
    fn loading_shows_placeholder() {
        let mut app = AppState::new(4, Theme::dark(), Keymap::default());
        app.take_fetch_request();
        let text = screen(&app);
        assert!(text.contains("Loading..."));
        assert!(text.contains("Filter by name"));
        assert!(text.contains("[loading]"));
    }
}

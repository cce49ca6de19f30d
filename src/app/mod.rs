//! Application state and the query state machine.
//!
//! `AppState` owns the query (filters + window), the view state of the last
//! fetch cycle, and the request sequence counter used to drop stale results.
//! Mutators only record that the query changed; the event loop turns that
//! into a fetch cycle via [`AppState::take_fetch_request`].
//!
pub mod fetch;
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use tracing::debug;

use crate::api::{Query, User};
use crate::pagination::{self, PAGE_SIZES, PageInfo};

pub use fetch::{FetchOutcome, FetchRequest, FetchedPage, Fetcher};
pub use keymap::Keymap;

/// Where the most recent fetch cycle stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Which filter input receives typed characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Age,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing(FilterField),
}

/// Result of the latest fetch cycle as rendered.
///
/// `users` survives loading and errors, so it always holds the last page that
/// loaded successfully (empty before the first one).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub total_count: u64,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub error: Color,
}

const THEME_KEYS: [&str; 10] = [
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "error",
];

impl Theme {
    /// Plain 16-color palette for terminals without truecolor.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    /// Load theme from a `key = color` file. Missing or unknown keys keep the `mocha` value.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut copy = *self;
        let mut buf = String::new();
        buf.push_str("# userlist-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        for key in THEME_KEYS {
            if let Some(color) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(*color));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the defaults there first if it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(err) = theme.write_file(path) {
            debug!(path, %err, "could not write default theme");
        }
        theme
    }
}

/// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    let (r, g, b) = match c {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Reset => return "reset".to_string(),
        // named colors get a best-effort hex approximation
        Color::Black => (0x00, 0x00, 0x00),
        Color::Red => (0xff, 0x00, 0x00),
        Color::Green => (0x00, 0xff, 0x00),
        Color::Yellow => (0xff, 0xff, 0x00),
        Color::Blue => (0x00, 0x00, 0xff),
        Color::Magenta => (0xff, 0x00, 0xff),
        Color::Cyan => (0x00, 0xff, 0xff),
        Color::Gray => (0xb3, 0xb3, 0xb3),
        Color::DarkGray => (0x4d, 0x4d, 0x4d),
        Color::LightRed => (0xff, 0x66, 0x66),
        Color::LightGreen => (0x66, 0xff, 0x66),
        Color::LightYellow => (0xff, 0xff, 0x66),
        Color::LightBlue => (0x66, 0x66, 0xff),
        Color::LightMagenta => (0xff, 0x66, 0xff),
        Color::LightCyan => (0x66, 0xff, 0xff),
        Color::White => (0xff, 0xff, 0xff),
        Color::Indexed(_) => return "reset".to_string(),
    };
    format!("#{r:02X}{g:02X}{b:02X}")
}

pub struct AppState {
    pub query: Query,
    pub view: ViewState,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    latest_seq: u64,
    fetch_pending: bool,
}

impl AppState {
    /// Fresh state for a given page size. The first fetch cycle is already pending.
    pub fn new(page_size: usize, theme: Theme, keymap: Keymap) -> Self {
        Self {
            query: Query::with_limit(page_size),
            view: ViewState {
                loading: true,
                ..ViewState::default()
            },
            input_mode: InputMode::Normal,
            theme,
            keymap,
            latest_seq: 0,
            fetch_pending: true,
        }
    }

    pub fn status(&self) -> FetchStatus {
        if self.latest_seq == 0 {
            FetchStatus::Idle
        } else if self.view.loading {
            FetchStatus::Loading
        } else if self.view.error.is_some() {
            FetchStatus::Errored
        } else {
            FetchStatus::Loaded
        }
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::compute(self.query.offset, self.query.limit, self.view.total_count)
    }

    /// Prev/Next are only on screen once a cycle has loaded without error.
    pub fn pager_visible(&self) -> bool {
        !self.view.loading && self.view.error.is_none()
    }

    pub fn filter(&self, field: FilterField) -> &str {
        match field {
            FilterField::Name => &self.query.name,
            FilterField::Age => &self.query.age,
        }
    }

    fn filter_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Name => &mut self.query.name,
            FilterField::Age => &mut self.query.age,
        }
    }

    /// Replace a filter value. The offset is left alone.
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        let slot = self.filter_mut(field);
        if *slot != value {
            *slot = value;
            self.fetch_pending = true;
        }
    }

    pub fn push_filter_char(&mut self, field: FilterField, c: char) {
        self.filter_mut(field).push(c);
        self.fetch_pending = true;
    }

    pub fn pop_filter_char(&mut self, field: FilterField) {
        if self.filter_mut(field).pop().is_some() {
            self.fetch_pending = true;
        }
    }

    /// Jump to a 1-based page. Not bounds-checked.
    pub fn set_page(&mut self, page: usize) {
        let offset = pagination::offset_for_page(page, self.query.limit);
        if offset != self.query.offset {
            self.query.offset = offset;
            self.fetch_pending = true;
        }
    }

    /// Change the page size. The offset is kept as-is, even if it no longer
    /// lines up with the new limit.
    pub fn set_limit(&mut self, limit: usize) {
        if limit == 0 || limit == self.query.limit {
            return;
        }
        self.query.limit = limit;
        self.fetch_pending = true;
    }

    /// Step through [`PAGE_SIZES`], wrapping at either end.
    pub fn cycle_page_size(&mut self, forward: bool) {
        let len = PAGE_SIZES.len();
        let next = match PAGE_SIZES.iter().position(|&s| s == self.query.limit) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.set_limit(PAGE_SIZES[next]);
    }

    /// Re-run the fetch cycle for the unchanged query.
    pub fn request_refresh(&mut self) {
        self.fetch_pending = true;
    }

    /// Start a fetch cycle if the query changed since the last one.
    ///
    /// Moves the view to loading, clears the error and stamps the request with
    /// a new sequence number.
    pub fn take_fetch_request(&mut self) -> Option<FetchRequest> {
        if !self.fetch_pending {
            return None;
        }
        self.fetch_pending = false;
        self.latest_seq += 1;
        self.view.loading = true;
        self.view.error = None;
        Some(FetchRequest {
            seq: self.latest_seq,
            query: self.query.clone(),
        })
    }

    /// Apply a finished cycle. Returns `false` (and changes nothing) when a
    /// newer cycle has been started since this one.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "discarding stale fetch result"
            );
            return false;
        }
        self.view.loading = false;
        match outcome.result {
            Ok(page) => {
                self.view.users = page.users;
                self.view.total_count = page.total_count;
                self.view.error = None;
            }
            Err(err) => {
                self.view.error = Some(err.to_string());
            }
        }
        true
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

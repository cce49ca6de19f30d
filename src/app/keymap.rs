//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings only apply in normal mode. While a filter input is being edited,
//! keys go to the input (see `update::handle_key`).

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Several keys may map to the same action (e.g. both `l` and Right go to the
/// next page).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Start typing into the name filter.
    EditName,
    /// Start typing into the age filter.
    EditAge,
    /// Go to the previous page, if there is one.
    PrevPage,
    /// Go to the next page, if there is one.
    NextPage,
    /// Select the next page size.
    NextPageSize,
    /// Select the previous page size.
    PrevPageSize,
    /// Re-run the fetch for the current query.
    Refresh,
    /// Swallow the key.
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 9] = [
    KeyAction::Quit,
    KeyAction::EditName,
    KeyAction::EditAge,
    KeyAction::PrevPage,
    KeyAction::NextPage,
    KeyAction::NextPageSize,
    KeyAction::PrevPageSize,
    KeyAction::Refresh,
    KeyAction::Ignore,
];

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style `h`/`l` for paging, `n`/`a` for the filters,
    /// `s`/`S` (and `+`/`-`) for the page size.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('n')), KeyAction::EditName);
        bindings.insert((M::NONE, Char('/')), KeyAction::EditName);
        bindings.insert((M::NONE, Char('a')), KeyAction::EditAge);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('s')), KeyAction::NextPageSize);
        bindings.insert((M::NONE, Char('+')), KeyAction::NextPageSize);
        bindings.insert((M::NONE, Char('-')), KeyAction::PrevPageSize);
        // terminals disagree on whether uppercase letters and '+' carry SHIFT
        bindings.insert((M::NONE, Char('S')), KeyAction::PrevPageSize);
        bindings.insert((M::SHIFT, Char('S')), KeyAction::PrevPageSize);
        bindings.insert((M::SHIFT, Char('+')), KeyAction::NextPageSize);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, F(5)), KeyAction::Refresh);
        Self { bindings }
    }

    /// Load the keymap at `path`, writing the defaults there first if it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            debug!(path, %err, "could not write default keybindings");
        }
        km
    }

    /// Read `Action = KeySpec` lines on top of the defaults.
    ///
    /// Comments (`#`), blank lines and lines that do not parse are skipped.
    /// The reversed `KeySpec = Action` form is accepted too.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write the current bindings as `Action = KeySpec`, sorted for stable output.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Left, Right, PageUp, PageDown, F5, +, -\n");
        let names: Vec<&str> = ALL_ACTIONS.iter().map(|a| format_action(*a)).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|(&(mods, code), &action)| {
                format!("{} = {}", format_action(action), Self::format_key(mods, code))
            })
            .collect();
        lines.sort();
        lines.dedup();
        for line in lines {
            let _ = writeln!(&mut buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Human-readable keys bound to `action`, sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(&(mods, code), _)| Self::format_key(mods, code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key (modifiers + code) into a spec like "Ctrl+c", "PageUp".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            F(n) => format!("F{n}"),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) if !after.is_empty() => (KeyModifiers::CONTROL, after),
        _ => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                (Some('F'), Some(_)) => F(rest[1..].parse().ok()?),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS
        .iter()
        .copied()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::EditName => "EditName",
        KeyAction::EditAge => "EditAge",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::NextPageSize => "NextPageSize",
        KeyAction::PrevPageSize => "PrevPageSize",
        KeyAction::Refresh => "Refresh",
        KeyAction::Ignore => "Ignore",
    }
}

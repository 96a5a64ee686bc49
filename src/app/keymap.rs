//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings apply to the list screen. Dialogs and search input have fixed keys
//! (Esc, Enter, Tab, typing) so they stay usable whatever the user binds.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic actions on the list screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the help overlay.
    OpenHelp,
    /// Focus the search box.
    StartSearch,
    /// Open the dialog in create mode.
    NewUser,
    /// Open the dialog in edit mode for the selected row.
    EditSelection,
    /// Ask to delete the selected row.
    DeleteSelection,
    /// Invalidate cached pages and refetch the current one.
    Refresh,
    MoveUp,
    MoveDown,
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Bound but does nothing.
    Ignore,
}

/// Action names as written in the config file.
const ACTION_NAMES: [(KeyAction, &str); 14] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::NewUser, "NewUser"),
    (KeyAction::EditSelection, "EditSelection"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::Refresh, "Refresh"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PreviousPage, "PreviousPage"),
    (KeyAction::NextPage, "NextPage"),
    (KeyAction::FirstPage, "FirstPage"),
    (KeyAction::LastPage, "LastPage"),
    (KeyAction::Ignore, "Ignore"),
];

/// Named keys understood in key specs; anything else must be one character.
const KEY_NAMES: [(KeyCode, &str); 14] = [
    (KeyCode::Enter, "Enter"),
    (KeyCode::Esc, "Esc"),
    (KeyCode::Tab, "Tab"),
    (KeyCode::BackTab, "BackTab"),
    (KeyCode::Backspace, "Backspace"),
    (KeyCode::Delete, "Delete"),
    (KeyCode::Up, "Up"),
    (KeyCode::Down, "Down"),
    (KeyCode::Left, "Left"),
    (KeyCode::Right, "Right"),
    (KeyCode::Home, "Home"),
    (KeyCode::End, "End"),
    (KeyCode::PageUp, "PageUp"),
    (KeyCode::PageDown, "PageDown"),
];

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl, single letters for commands.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('a')), KeyAction::NewUser);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PreviousPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PreviousPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PreviousPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);
        Self { bindings }
    }

    /// Load `path`, or write the defaults there when it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::debug!(path, error = %err, "could not write default keybindings");
        }
        km
    }

    pub fn from_file(path: &str) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    /// Parse `<Action> = <KeySpec>` lines on top of the defaults.
    /// Unknown actions or keys are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        map.apply(contents);
        map
    }

    fn apply(&mut self, contents: &str) {
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                self.bindings.insert(key, action);
            }
        }
    }

    /// Every binding, one `<Action> = <KeySpec>` line each, sorted.
    pub fn to_config(&self) -> String {
        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| format!("{} = {}", format_action(*action), Self::format_key(*mods, *code)))
            .collect();
        lines.sort();
        let mut buf = String::new();
        buf.push_str("# useradmin keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec: a single character or named key, optionally prefixed by Ctrl+ and/or Shift+; named keys: Enter, Esc, Tab, BackTab, Backspace, Delete, Up, Down, Left, Right, Home, End, PageUp, PageDown\n");
        buf.push_str("# Actions: ");
        buf.push_str(&ACTION_NAMES.iter().map(|(_, n)| *n).collect::<Vec<_>>().join(", "));
        buf.push_str("\n\n");
        for line in lines {
            buf.push_str(&line);
            buf.push('\n');
        }
        buf
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        std::fs::write(path, self.to_config())
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted, for help texts.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key like "Ctrl+c", "Enter" or "/".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match code {
            KeyCode::Char(c) => c.to_string(),
            other => KEY_NAMES
                .iter()
                .find(|(k, _)| *k == other)
                .map(|(_, n)| n.to_string())
                .unwrap_or_else(|| format!("{:?}", other)),
        };
        let mut out = String::new();
        if mods.contains(KeyModifiers::CONTROL) {
            out.push_str("Ctrl+");
        }
        if mods.contains(KeyModifiers::SHIFT) {
            out.push_str("Shift+");
        }
        out.push_str(&base);
        out
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    loop {
        if let Some(after) = rest.strip_prefix("Ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("Shift+") {
            mods |= KeyModifiers::SHIFT;
            rest = after;
        } else {
            break;
        }
    }
    if let Some((code, _)) = KEY_NAMES.iter().find(|(_, n)| *n == rest) {
        return Some((mods, *code));
    }
    if rest == "Escape" {
        return Some((mods, KeyCode::Esc));
    }
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some((mods, KeyCode::Char(c))),
        _ => None,
    }
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES.iter().find(|(_, n)| *n == s).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, n)| *n)
        .unwrap_or("Ignore")
}

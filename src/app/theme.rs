//! Colour theme, loaded from a `key = value` file.

use ratatui::style::Color;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Plain terminal colours.
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
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha, the default.
    pub fn mocha() -> Self {
        // https://github.com/catppuccin/catppuccin
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
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slots(&mut self) -> [(&'static str, &mut Color); 12] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("header_bg", &mut self.header_bg),
            ("header_fg", &mut self.header_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
            ("success", &mut self.success),
            ("error", &mut self.error),
        ]
    }

    /// Parse theme file contents on top of `mocha`. Unknown keys and
    /// unparsable colours are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = parse_color(val) else {
                continue;
            };
            if let Some((_, slot)) = theme.slots().into_iter().find(|(k, _)| *k == key) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    /// Render the theme in the format [`parse`](Self::parse) reads.
    pub fn to_config(&self) -> String {
        use std::fmt::Write as _;
        let mut copy = *self;
        let mut buf = String::new();
        buf.push_str("# useradmin theme\n");
        buf.push_str("# Colors: #RRGGBB, RRGGBB or 'reset'\n\n");
        for (key, color) in copy.slots() {
            let _ = writeln!(buf, "{} = {}", key, color_to_str(*color));
        }
        buf
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        std::fs::write(path, self.to_config())
    }

    /// Load `path`, or write the default theme there when it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(err) = theme.write_file(path) {
            tracing::debug!(path, error = %err, "could not write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Black => "#000000".to_string(),
        Color::Red => "#CC0000".to_string(),
        Color::Green => "#00CC00".to_string(),
        Color::Yellow => "#CCCC00".to_string(),
        Color::Cyan => "#00CCCC".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::White => "#FFFFFF".to_string(),
        _ => "reset".to_string(),
    }
}

//! Shared UI components (status bar, toasts, help, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::notify::ToastKind;
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, page and request activity.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let page = app.view.current_page();
    let total = app.current_data().map(|p| p.total).unwrap_or(0);
    let mut msg = format!(
        "mode: {mode}  page:{page}/{}  users:{total}  shown:{}",
        app.total_pages(),
        app.visible_users().len()
    );
    if app.store.is_loading(page) {
        msg.push_str("  loading…");
    }
    let pending = app.store.pending_mutations();
    if pending > 0 {
        msg.push_str(&format!("  saving:{pending}"));
    }
    msg.push_str("  ?: help  q: quit");
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a centered rectangle of given size inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Stack toasts in the top-right corner, newest at the bottom.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 44u16.min(area.width);
    let mut y = area.y + 1;
    for toast in app.notifications.iter() {
        let height = 3u16;
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height,
        };
        let (title, color) = match toast.kind {
            ToastKind::Success => ("Success", app.theme.success),
            ToastKind::Error => ("Error", app.theme.error),
        };
        let p = Paragraph::new(toast.message.clone())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += height;
    }
}

/// Render the help modal from the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let key_style = Style::default().add_modifier(Modifier::ITALIC);
    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
    };
    let bound = |label: &'static str, action: KeyAction| {
        Line::from(vec![
            Span::raw(format!("  {label:<18} ")),
            Span::styled(app.keymap.keys_for(action).join(", "), key_style),
        ])
    };
    let fixed = |label: &'static str, keys: &'static str| {
        Line::from(vec![
            Span::raw(format!("  {label:<18} ")),
            Span::styled(keys, key_style),
        ])
    };

    let lines = vec![
        section("Users"),
        bound("Add user", KeyAction::NewUser),
        bound("Edit selected", KeyAction::EditSelection),
        bound("Delete selected", KeyAction::DeleteSelection),
        bound("Search", KeyAction::StartSearch),
        bound("Refresh", KeyAction::Refresh),
        Line::raw(""),
        section("Navigation"),
        bound("Move up", KeyAction::MoveUp),
        bound("Move down", KeyAction::MoveDown),
        bound("Previous page", KeyAction::PreviousPage),
        bound("Next page", KeyAction::NextPage),
        bound("First page", KeyAction::FirstPage),
        bound("Last page", KeyAction::LastPage),
        fixed("Go to page", "1-9"),
        Line::raw(""),
        section("Dialogs"),
        fixed("Next / prev field", "Tab, Shift+Tab"),
        fixed("Change role", "Left, Right, Space"),
        fixed("Submit / confirm", "Enter, y"),
        fixed("Cancel / close", "Esc, n"),
        Line::raw(""),
        bound("Help", KeyAction::OpenHelp),
        bound("Quit", KeyAction::Quit),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 10, area), Rect::new(25, 15, 50, 10));
        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect(50, 10, small), Rect::new(0, 0, 20, 5));
    }
}

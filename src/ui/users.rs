use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::form::{FormFocus, UserForm};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::model::{Field, User, display_role};
use crate::ui::components::centered_rect;

/// Shortest key bound to `action`, for inline hints.
fn key_hint(app: &AppState, action: KeyAction) -> Option<String> {
    app.keymap.keys_for(action).into_iter().min_by_key(|k| k.chars().count())
}

/// Search box above the table. Shows a cursor while search input is active.
pub fn render_search_box(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.input_mode == InputMode::Search;
    let query = app.view.search_query();
    let body = if query.is_empty() && !active {
        Line::from(Span::styled(
            "Search users... (/)",
            Style::default().fg(app.theme.muted),
        ))
    } else {
        let cursor = if active { "_" } else { "" };
        Line::from(Span::styled(
            format!("{query}{cursor}"),
            Style::default().fg(app.theme.text),
        ))
    };
    let border = if active { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(body).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let page = app.view.current_page();
    let block = Block::default()
        .title(format!("Users (page {page} of {})", app.total_pages()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    // Nothing cached yet: either loading or the fetch failed.
    if app.current_data().is_none() {
        let text = match app.store.fetch_error(page) {
            Some(err) => match key_hint(app, KeyAction::Refresh) {
                Some(key) => format!("{err} (press {key} to retry)"),
                None => err.to_string(),
            },
            None => "Loading…".to_string(),
        };
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let users = app.visible_users();
    if users.is_empty() {
        let p = Paragraph::new("No users found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let actions = [
        key_hint(app, KeyAction::EditSelection).map(|k| format!("{k} edit")),
        key_hint(app, KeyAction::DeleteSelection).map(|k| format!("{k} delete")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" · ");

    let rows = users.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(display_role(&u.role)),
            Cell::from(Span::styled(actions.clone(), Style::default().fg(app.theme.muted))),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Length(8),
        Constraint::Length(18),
    ];

    let header = Row::new(vec!["ID", "Name", "Email", "Role", "Actions"]).style(
        Style::default()
            .fg(app.theme.title)
            .bg(app.theme.header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Create/edit dialog: three fields with inline errors, then the buttons.
pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState, form: &UserForm) {
    let rect = centered_rect(56, 15, area);
    let focused = Style::default()
        .fg(app.theme.highlight_fg)
        .add_modifier(Modifier::BOLD);
    let normal = Style::default().fg(app.theme.text);
    let error = Style::default().fg(app.theme.error);

    let mut lines: Vec<Line> = Vec::new();
    let fields = [
        (Field::Name, FormFocus::Name, form.name.clone()),
        (Field::Email, FormFocus::Email, form.email.clone()),
        (Field::Role, FormFocus::Role, format!("◀ {} ▶", display_role(&form.role))),
    ];
    for (field, focus, value) in fields {
        let is_focused = form.focus == focus;
        let marker = if is_focused { "▶ " } else { "  " };
        let cursor = if is_focused && focus != FormFocus::Role { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<6} ", field.label()), if is_focused { focused } else { normal }),
            Span::styled(format!("{value}{cursor}"), normal),
        ]));
        match form.error(field) {
            Some(msg) => lines.push(Line::from(Span::styled(format!("         {msg}"), error))),
            None => lines.push(Line::raw("")),
        }
    }
    lines.push(Line::raw(""));
    let button = |label: &str, focus: FormFocus| {
        if form.focus == focus {
            Span::styled(format!("[{label}]"), focused)
        } else {
            Span::styled(format!(" {label} "), normal)
        }
    };
    lines.push(
        Line::from(vec![
            button("Cancel", FormFocus::Cancel),
            Span::raw("    "),
            button(form.submit_label(), FormFocus::Submit),
        ])
        .alignment(Alignment::Center),
    );
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Tab: next field  ←/→: role  Enter: submit  Esc: cancel",
        Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
    )));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState, user: &User, confirm: bool) {
    let rect = centered_rect(52, 8, area);
    let yes = if confirm { "[Yes]" } else { " Yes " };
    let no = if confirm { " No  " } else { "[No]" };
    let body = format!(
        "Are you sure you want to delete this user?\n{} <{}>\n\n      {}    {}",
        user.name, user.email, yes, no
    );
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

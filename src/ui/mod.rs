pub mod components;
pub mod pagination;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let add_keys = app.keymap.keys_for(crate::app::keymap::KeyAction::NewUser).join("/");
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Users Management",
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(format!("[+ Add User ({add_keys})]"), Style::default().fg(app.theme.header_fg)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    users::render_search_box(f, root[1], app);
    users::render_users_table(f, root[2], app);
    app.pagination().render(f, root[3], &app.theme);
    components::render_status_bar(f, root[4], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
    components::render_toasts(f, f.area(), app);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(ModalState::UserForm(form)) => users::render_user_form(f, area, app, form),
        Some(ModalState::DeleteConfirm { user, confirm }) => {
            users::render_delete_confirm(f, area, app, user, *confirm)
        }
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, *scroll),
        None => {}
    }
}

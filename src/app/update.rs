use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use crate::app::form::FormFocus;
use crate::app::keymap::KeyAction;
use crate::app::store::Outcome;
use crate::app::{AppState, InputMode, ModalState};
use crate::ui;

/// Whether the loop keeps going after a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the event loop until the user quits.
///
/// Each iteration makes sure the current page is requested, draws, folds in
/// finished requests, then waits briefly for a key.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    outcomes: &mut UnboundedReceiver<Outcome>,
) -> Result<()> {
    info!("event loop started");
    loop {
        app.sync();
        drain_outcomes(app, outcomes);
        app.notifications.prune(Instant::now());

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key) == Flow::Quit
        {
            break;
        }
    }
    info!(uptime = ?app.started_at.elapsed(), "event loop finished");
    Ok(())
}

/// Apply every outcome that has arrived without waiting for more.
pub fn drain_outcomes(app: &mut AppState, outcomes: &mut UnboundedReceiver<Outcome>) {
    while let Ok(outcome) = outcomes.try_recv() {
        app.handle_outcome(outcome);
    }
}

/// Route one key press by input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Modal => handle_modal_key(app, key),
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    // digits jump straight to a page
    if let KeyCode::Char(c @ '1'..='9') = key.code
        && key.modifiers == KeyModifiers::NONE
    {
        let target = app.pagination().go_to(c.to_digit(10).unwrap_or(1));
        app.change_page(target);
        return Flow::Continue;
    }
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NewUser => app.open_create_dialog(),
        KeyAction::EditSelection => {
            if let Some(user) = app.selected_user() {
                app.open_edit_dialog(&user);
            }
        }
        KeyAction::DeleteSelection => app.request_delete(),
        KeyAction::Refresh => app.refresh(),
        KeyAction::MoveUp => app.move_selection(false),
        KeyAction::MoveDown => app.move_selection(true),
        KeyAction::PreviousPage => {
            let target = app.pagination().previous();
            app.change_page(target);
        }
        KeyAction::NextPage => {
            let target = app.pagination().next();
            app.change_page(target);
        }
        KeyAction::FirstPage => {
            let target = app.pagination().first();
            app.change_page(target);
        }
        KeyAction::LastPage => {
            let target = app.pagination().last();
            app.change_page(target);
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

/// The search box filters as you type; Enter keeps the query, Esc clears it.
fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter | KeyCode::Down => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.view.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.view.pop_search_char(),
        KeyCode::Char(c) => app.view.push_search_char(c),
        _ => {}
    }
    app.clamp_selection();
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    match &mut app.modal {
        Some(ModalState::UserForm(form)) => match key.code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left if form.focus == FormFocus::Role => form.cycle_role(false),
            KeyCode::Right | KeyCode::Char(' ') if form.focus == FormFocus::Role => {
                form.cycle_role(true)
            }
            KeyCode::Left if form.focus == FormFocus::Submit => form.focus = FormFocus::Cancel,
            KeyCode::Right if form.focus == FormFocus::Cancel => form.focus = FormFocus::Submit,
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.focus {
                FormFocus::Cancel => app.close_modal(),
                FormFocus::Name | FormFocus::Email | FormFocus::Role | FormFocus::Submit => {
                    if let Err(err) = app.submit_dialog() {
                        error!(error = %err, "submit failed");
                    }
                }
            },
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
            _ => {}
        },
        Some(ModalState::DeleteConfirm { confirm, .. }) => match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.confirm_delete(false),
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(true),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *confirm = !*confirm
            }
            KeyCode::Enter => {
                let yes = *confirm;
                app.confirm_delete(yes);
            }
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

//! Application state and page composition.
//!
//! [`AppState`] wires the view state, the store, the dialog and the
//! notifications together. It owns whether the dialog is open and in which
//! mode; the event loop in [`update`] only routes keys to its methods.
//!
pub mod form;
pub mod keymap;
pub mod notify;
pub mod store;
pub mod theme;
pub mod update;
pub mod view;

use std::time::Instant;

use crate::model::{Page, User};
use crate::search::filter_users;
use crate::ui::pagination::Pagination;

use self::form::{FormMode, UserForm};
use self::keymap::Keymap;
use self::notify::Notifications;
use self::store::{Mutation, Outcome, StoreEvent, UserStore};
use self::theme::Theme;
use self::view::ViewState;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Modal dialogs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Create/edit form.
    UserForm(UserForm),
    /// Delete confirmation; `confirm` is true when "Yes" is highlighted.
    DeleteConfirm { user: User, confirm: bool },
    Help { scroll: u16 },
}

pub struct AppState {
    pub started_at: Instant,
    pub view: ViewState,
    pub store: UserStore,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub notifications: Notifications,
}

impl AppState {
    pub fn new(store: UserStore, view: ViewState, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            view,
            store,
            selected_index: 0,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            notifications: Notifications::new(),
        }
    }

    /// Request the current page if it is not cached. Called every loop
    /// iteration; a no-op while the page is fresh or in flight.
    pub fn sync(&mut self) -> bool {
        self.store.ensure_page(self.view.current_page())
    }

    /// Last fetched data for the current page.
    pub fn current_data(&self) -> Option<&Page<User>> {
        self.store.page(self.view.current_page())
    }

    /// Rows on screen: the current page filtered by the search query.
    pub fn visible_users(&self) -> Vec<User> {
        self.current_data()
            .map(|p| filter_users(&p.data, self.view.search_query()))
            .unwrap_or_default()
    }

    pub fn selected_user(&self) -> Option<User> {
        self.visible_users().into_iter().nth(self.selected_index)
    }

    pub fn total_pages(&self) -> u32 {
        self.current_data().map(|p| p.total_pages).unwrap_or(1).max(1)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.view.current_page(), self.total_pages())
    }

    /// Keep the selection inside the visible rows.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_users().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    pub fn move_selection(&mut self, down: bool) {
        let len = self.visible_users().len();
        if down {
            if self.selected_index + 1 < len {
                self.selected_index += 1;
            }
        } else {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    /// Apply a page-change request. Only explicit pagination actions get here.
    pub fn change_page(&mut self, page: Option<u32>) {
        if let Some(page) = page
            && page != self.view.current_page()
        {
            tracing::debug!(from = self.view.current_page(), to = page, "page change");
            self.view.set_current_page(page);
            self.selected_index = 0;
        }
    }

    pub fn refresh(&mut self) {
        self.store.invalidate_all();
    }

    pub fn open_create_dialog(&mut self) {
        self.open_dialog(FormMode::Create);
    }

    pub fn open_edit_dialog(&mut self, user: &User) {
        self.open_dialog(FormMode::Edit(user.clone()));
    }

    /// Open the dialog in `mode`. An open form is reset rather than replaced
    /// so switching target or mode always lands on that mode's defaults.
    fn open_dialog(&mut self, mode: FormMode) {
        match &mut self.modal {
            Some(ModalState::UserForm(form)) => form.reset(mode),
            _ => self.modal = Some(ModalState::UserForm(UserForm::new(mode))),
        }
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn dialog_form(&self) -> Option<&UserForm> {
        match &self.modal {
            Some(ModalState::UserForm(form)) => Some(form),
            _ => None,
        }
    }

    /// Validate the open form and dispatch create or update by its mode.
    /// Validation errors stay on the form; nothing is sent.
    pub fn submit_dialog(&mut self) -> anyhow::Result<()> {
        let Some(ModalState::UserForm(form)) = &mut self.modal else {
            anyhow::bail!("submit without an open dialog");
        };
        let mode = form.mode().clone();
        let Ok(draft) = form.submit() else {
            return Ok(());
        };
        match mode {
            FormMode::Create => {
                let new_user = draft
                    .into_new_user()
                    .ok_or_else(|| anyhow::anyhow!("create form produced an incomplete record"))?;
                self.store.create(new_user);
            }
            FormMode::Edit(user) => self.store.update(user.id, draft),
        }
        Ok(())
    }

    /// Ask for confirmation before deleting the selected row.
    pub fn request_delete(&mut self) {
        if let Some(user) = self.selected_user() {
            self.modal = Some(ModalState::DeleteConfirm { user, confirm: false });
            self.input_mode = InputMode::Modal;
        }
    }

    /// Resolve the confirmation dialog; the request is only issued on yes.
    pub fn confirm_delete(&mut self, yes: bool) {
        if let Some(ModalState::DeleteConfirm { user, .. }) = self.modal.take()
            && yes
        {
            self.store.delete(user.id);
        }
        self.input_mode = InputMode::Normal;
    }

    /// Fold a finished request into the store and react to what changed.
    pub fn handle_outcome(&mut self, outcome: Outcome) {
        let Some(event) = self.store.apply(outcome) else {
            return;
        };
        match event {
            StoreEvent::Loaded { .. } => self.clamp_selection(),
            StoreEvent::FetchFailed { message, .. } => self.notifications.error(message),
            StoreEvent::Mutated { kind } => {
                if matches!(kind, Mutation::Create | Mutation::Update)
                    && matches!(self.modal, Some(ModalState::UserForm(_)))
                {
                    self.close_modal();
                }
                self.notifications.success(kind.success_message());
            }
            StoreEvent::MutationFailed { message, .. } => self.notifications.error(message),
        }
    }
}

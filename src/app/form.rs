//! Create/edit dialog state.
//!
//! The form has two modes: `Create` starts blank with the default role,
//! `Edit` starts from the selected user. Submitting validates the fields as a
//! [`UserDraft`]; errors are kept per field and block submission until fixed.

use crate::model::{DEFAULT_ROLE, Field, FieldErrors, ROLES, User, UserDraft};

/// Which record the dialog is for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(User),
}

/// Focusable elements of the dialog, in Tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormFocus {
    Name,
    Email,
    Role,
    Cancel,
    Submit,
}

impl FormFocus {
    const ORDER: [FormFocus; 5] = [
        FormFocus::Name,
        FormFocus::Email,
        FormFocus::Role,
        FormFocus::Cancel,
        FormFocus::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserForm {
    mode: FormMode,
    pub name: String,
    pub email: String,
    pub role: String,
    pub focus: FormFocus,
    errors: FieldErrors,
    // After the first rejected submit every edit re-validates.
    revalidate: bool,
}

impl UserForm {
    pub fn new(mode: FormMode) -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            name: String::new(),
            email: String::new(),
            role: DEFAULT_ROLE.to_string(),
            focus: FormFocus::Name,
            errors: FieldErrors::new(),
            revalidate: false,
        };
        form.reset(mode);
        form
    }

    pub fn create() -> Self {
        Self::new(FormMode::Create)
    }

    pub fn edit(user: &User) -> Self {
        Self::new(FormMode::Edit(user.clone()))
    }

    /// Switch to `mode` and reset every field to that mode's defaults.
    pub fn reset(&mut self, mode: FormMode) {
        match &mode {
            FormMode::Create => {
                self.name.clear();
                self.email.clear();
                self.role = DEFAULT_ROLE.to_string();
            }
            FormMode::Edit(user) => {
                self.name = user.name.clone();
                self.email = user.email.clone();
                self.role = user.role.clone();
            }
        }
        self.mode = mode;
        self.focus = FormFocus::Name;
        self.errors.clear();
        self.revalidate = false;
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() { "Edit User" } else { "Add New User" }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() { "Update" } else { "Create" }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type a character into the focused text field.
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            FormFocus::Name => self.name.push(c),
            FormFocus::Email => self.email.push(c),
            _ => return,
        }
        self.touched();
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormFocus::Name => {
                self.name.pop();
            }
            FormFocus::Email => {
                self.email.pop();
            }
            _ => return,
        }
        self.touched();
    }

    /// Step through the role choices. A role outside the list starts the
    /// cycle from its first entry.
    pub fn cycle_role(&mut self, forward: bool) {
        let next = match ROLES.iter().position(|r| *r == self.role) {
            Some(i) if forward => (i + 1) % ROLES.len(),
            Some(i) => (i + ROLES.len() - 1) % ROLES.len(),
            None => 0,
        };
        self.role = ROLES[next].to_string();
        self.touched();
    }

    /// Current field values as a draft, without validating.
    pub fn draft(&self) -> UserDraft {
        UserDraft::full(self.name.clone(), self.email.clone(), self.role.clone())
    }

    /// Validate and, if valid, emit the draft and reset the form to its mode
    /// defaults. Otherwise record per-field errors and return them.
    pub fn submit(&mut self) -> Result<UserDraft, FieldErrors> {
        let draft = self.draft();
        match draft.check() {
            Ok(()) => {
                let mode = self.mode.clone();
                self.reset(mode);
                Ok(draft)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.revalidate = true;
                self.focus = match errors.keys().next() {
                    Some(Field::Name) => FormFocus::Name,
                    Some(Field::Email) => FormFocus::Email,
                    Some(Field::Role) => FormFocus::Role,
                    None => self.focus,
                };
                Err(errors)
            }
        }
    }

    fn touched(&mut self) {
        if self.revalidate {
            self.errors = self.draft().check().err().unwrap_or_default();
        }
    }
}

//! Toast notifications for request results.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

const MAX_TOASTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

/// Recent toasts, newest last.
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into(), Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into(), Instant::now());
    }

    pub fn push(&mut self, kind: ToastKind, message: String, created_at: Instant) {
        self.toasts.push_back(Toast { kind, message, created_at });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Drop toasts older than [`TOAST_TTL`] at `now`.
    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < TOAST_TTL);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

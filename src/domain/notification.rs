//! Transient notifications ("toasts") shared by the auth and chat flows.

use std::time::{Duration, Instant};

const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_VISIBLE_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastSeverity {
    #[default]
    Normal,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub severity: ToastSeverity,
}

impl Toast {
    pub fn normal(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            severity: ToastSeverity::Normal,
        }
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            severity: ToastSeverity::Destructive,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == ToastSeverity::Destructive
    }

    /// Single-line form used by CLI flows.
    pub fn to_line(&self) -> String {
        let marker = match self.severity {
            ToastSeverity::Normal => "✔",
            ToastSeverity::Destructive => "✖",
        };
        match &self.description {
            Some(description) => format!("{marker} {}: {description}", self.title),
            None => format!("{marker} {}", self.title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveToast {
    toast: Toast,
    expires_at: Instant,
}

/// Queue of visible toasts. Oldest entries fall off once the cap is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastCenter {
    active: Vec<ActiveToast>,
    ttl: Duration,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            ttl: DEFAULT_TOAST_TTL,
        }
    }
}

impl ToastCenter {
    pub fn push(&mut self, toast: Toast) {
        self.push_at(toast, Instant::now());
    }

    pub fn push_at(&mut self, toast: Toast, now: Instant) {
        if self.active.len() == MAX_VISIBLE_TOASTS {
            self.active.remove(0);
        }
        self.active.push(ActiveToast {
            toast,
            expires_at: now + self.ttl,
        });
    }

    /// Drops expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.active.retain(|entry| entry.expires_at > now);
    }

    /// Dismisses the newest toast.
    pub fn dismiss_latest(&mut self) -> Option<Toast> {
        self.active.pop().map(|entry| entry.toast)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.active.iter().map(|entry| &entry.toast)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

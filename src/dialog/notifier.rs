use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Error,
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Sink for toasts. Every dialog or panel outcome emits exactly one.
pub trait Notifier {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Collects toasts in memory; the host UI drains it after each event.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().ok().and_then(|t| t.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything collected so far.
    pub fn drain(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|mut t| std::mem::take(&mut *t))
            .unwrap_or_default()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

/// Writes toasts to the tracing log; used by headless tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Success => tracing::info!(text = %toast.message, "toast"),
            ToastLevel::Error => tracing::warn!(text = %toast.message, "toast"),
        }
    }
}

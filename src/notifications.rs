use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    pub fn default_duration(&self) -> Duration {
        match self {
            ToastKind::Success | ToastKind::Info => Duration::from_millis(3000),
            ToastKind::Error => Duration::from_millis(5000),
            ToastKind::Warning => Duration::from_millis(4000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
struct ToastQueue {
    next_id: u64,
    toasts: Vec<Toast>,
}

/// Transient user-facing messages. Expired toasts are dropped lazily on
/// read.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    inner: Arc<RwLock<ToastQueue>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind, duration: Option<Duration>) -> u64 {
        self.show_at(message, kind, duration, Instant::now())
    }

    fn show_at(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Option<Duration>,
        now: Instant,
    ) -> u64 {
        let duration = duration.unwrap_or_else(|| kind.default_duration());
        let message = message.into();
        let mut queue = self.inner.write().unwrap_or_else(|e| e.into_inner());
        queue.next_id += 1;
        let id = queue.next_id;
        debug!(id, kind = ?kind, message = %message, "Toast shown");
        queue.toasts.push(Toast {
            id,
            message,
            kind,
            duration,
            expires_at: now + duration,
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Error, None)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Info, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Warning, None)
    }

    pub fn remove(&self, id: u64) {
        let mut queue = self.inner.write().unwrap_or_else(|e| e.into_inner());
        queue.toasts.retain(|t| t.id != id);
    }

    pub fn clear_all(&self) {
        let mut queue = self.inner.write().unwrap_or_else(|e| e.into_inner());
        queue.toasts.clear();
    }

    /// Active toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts_at(Instant::now())
    }

    pub fn toasts_at(&self, now: Instant) -> Vec<Toast> {
        self.prune_expired(now);
        let queue = self.inner.read().unwrap_or_else(|e| e.into_inner());
        queue.toasts.clone()
    }

    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut queue = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = queue.toasts.len();
        queue.toasts.retain(|t| t.expires_at > now);
        before - queue.toasts.len()
    }

    pub fn count(&self) -> usize {
        self.toasts().len()
    }

    pub fn has_toasts(&self) -> bool {
        self.count() > 0
    }

    /// Messages of all active toasts of `kind`.
    pub fn messages(&self, kind: ToastKind) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.message)
            .collect()
    }
}

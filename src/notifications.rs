// ABOUTME: Transient notifications surfaced by the wizard (toasts in the TUI, lines in headless mode)

use std::time::{Duration, Instant};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationType {
    /// Short label used by the headless CLI output
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_duration(message, NotificationType::Success, Duration::from_secs(3))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_duration(message, NotificationType::Error, Duration::from_secs(5))
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_duration(message, NotificationType::Info, Duration::from_secs(3))
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_duration(message, NotificationType::Warning, Duration::from_secs(4))
    }

    fn with_duration(
        message: impl Into<String>,
        notification_type: NotificationType,
        duration: Duration,
    ) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Fire-and-forget queue of notifications, pruned as they expire
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Remove expired notifications
    pub fn cleanup_expired(&mut self) {
        self.items.retain(|n| !n.is_expired());
    }

    /// Current (non-expired) notifications, oldest first
    pub fn current(&self) -> Vec<&Notification> {
        self.items.iter().filter(|n| !n.is_expired()).collect()
    }

    /// Take every queued notification regardless of expiry
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.iter().rev().find(|n| !n.is_expired())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

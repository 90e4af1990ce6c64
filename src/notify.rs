//! User-facing notifications
//!
//! The engine reports lifecycle feedback through [`NotificationSink`]. Each
//! notification carries a correlation id; a later notification with the same
//! id replaces the earlier one instead of stacking next to it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A single toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub correlation_id: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            correlation_id: correlation_id.into(),
        }
    }
}

/// Receiver of notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Withdraw whatever is visible under `correlation_id`
    fn dismiss(&self, _correlation_id: &str) {}
}

/// Visible notifications, upserted by correlation id
///
/// Keeps at most `capacity` entries; the oldest is dropped first.
#[derive(Debug)]
pub struct NotificationBoard {
    entries: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl NotificationBoard {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Currently visible notifications, oldest first
    pub fn visible(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The visible notification for `correlation_id`, if any
    pub fn get(&self, correlation_id: &str) -> Option<Notification> {
        self.entries
            .lock()
            .ok()?
            .iter()
            .find(|n| n.correlation_id == correlation_id)
            .cloned()
    }
}

impl Default for NotificationBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for NotificationBoard {
    fn notify(&self, notification: Notification) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        if let Some(existing) = entries
            .iter_mut()
            .find(|n| n.correlation_id == notification.correlation_id)
        {
            *existing = notification;
            return;
        }

        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(notification);
    }

    fn dismiss(&self, correlation_id: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|n| n.correlation_id != correlation_id);
        }
    }
}

/// Sink that forwards notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Info | Severity::Success => info!("[{}] {}", n.correlation_id, n.message),
            Severity::Warning => warn!("[{}] {}", n.correlation_id, n.message),
            Severity::Error => error!("[{}] {}", n.correlation_id, n.message),
        }
    }
}

/// Sink feeding both a board and the log
#[derive(Debug, Default)]
pub struct LoggedBoard {
    pub board: NotificationBoard,
}

impl NotificationSink for LoggedBoard {
    fn notify(&self, notification: Notification) {
        LogSink.notify(notification.clone());
        self.board.notify(notification);
    }

    fn dismiss(&self, correlation_id: &str) {
        self.board.dismiss(correlation_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_replaces() {
        let board = NotificationBoard::new();
        board.notify(Notification::new(Severity::Info, "Searching...", "lookup"));
        board.notify(Notification::new(Severity::Success, "Place found!", "lookup"));

        let visible = board.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].severity, Severity::Success);
        assert_eq!(visible[0].message, "Place found!");
    }

    #[test]
    fn test_different_ids_stack() {
        let board = NotificationBoard::new();
        board.notify(Notification::new(Severity::Info, "Searching...", "lookup"));
        board.notify(Notification::new(Severity::Success, "Place saved!", "favorites"));

        assert_eq!(board.visible().len(), 2);
        assert_eq!(board.get("favorites").unwrap().message, "Place saved!");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let board = NotificationBoard::with_capacity(2);
        for id in ["a", "b", "c"] {
            board.notify(Notification::new(Severity::Info, id, id));
        }

        let ids: Vec<_> = board.visible().into_iter().map(|n| n.correlation_id).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn test_dismiss() {
        let board = NotificationBoard::new();
        board.notify(Notification::new(Severity::Warning, "Place not found.", "lookup"));
        board.dismiss("lookup");
        assert!(board.get("lookup").is_none());
    }

    #[test]
    fn test_severity_serialization() {
        let n = Notification::new(Severity::Warning, "m", "id");
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"warning\""));
    }
}

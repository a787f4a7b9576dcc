//! # Notification + Status Service
//!
//! Provides the timed status line the keynav engine uses for diagnostics
//! the user should see (unset marks, failed tab operations, toggles).
//!
//! ## Philosophy
//!
//! - **Structured, not stdout**: Notifications are typed values, not print statements
//! - **Prioritized**: Notifications have severity levels
//! - **Id-guarded expiry**: An expiry timer only clears the message it was
//!   started for; a newer message survives an older message's timer
//! - **Testable**: Notification history can be inspected
//!
//! ## Example
//!
//! ```
//! use services_notification::{Notification, StatusLine};
//!
//! let mut status = StatusLine::new();
//! let first = status.show(Notification::info("Mark 'a' set", 0));
//! let second = status.show(Notification::error("Mark 'b' not set", 10));
//!
//! // The first message's timer fires late: nothing is cleared
//! assert!(!status.expire(first));
//! assert!(status.expire(second));
//! assert!(status.current().is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Maximum number of notifications to keep in history
const MAX_NOTIFICATION_HISTORY: usize = 100;

/// Unique identifier for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new notification ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notif:{}", self.0)
    }
}

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationLevel {
    /// Informational message
    Info,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "INFO"),
            NotificationLevel::Warning => write!(f, "WARNING"),
            NotificationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier
    pub id: NotificationId,
    /// Notification level
    pub level: NotificationLevel,
    /// Message text
    pub message: String,
    /// Timestamp when notification was created (host milliseconds)
    pub timestamp_ms: u64,
    /// How long the message stays visible (0 means until replaced)
    pub ttl_ms: u64,
}

impl Notification {
    /// Creates a new notification
    pub fn new(level: NotificationLevel, message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            id: NotificationId::new(),
            level,
            message: message.into(),
            timestamp_ms,
            ttl_ms: 0,
        }
    }

    /// Creates an info notification
    pub fn info(message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(NotificationLevel::Info, message, timestamp_ms)
    }

    /// Creates a warning notification
    pub fn warning(message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(NotificationLevel::Warning, message, timestamp_ms)
    }

    /// Creates an error notification
    pub fn error(message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(NotificationLevel::Error, message, timestamp_ms)
    }

    /// Sets the time-to-live
    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Checks if this notification has expired based on current time
    pub fn is_expired(&self, now_ms: u64) -> bool {
        if self.ttl_ms == 0 {
            return false;
        }
        now_ms >= self.timestamp_ms.saturating_add(self.ttl_ms)
    }
}

/// Single-line status display
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<Notification>,
    history: VecDeque<Notification>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the displayed message, returning its id for expiry
    pub fn show(&mut self, notification: Notification) -> NotificationId {
        let id = notification.id;
        self.history.push_back(notification.clone());
        while self.history.len() > MAX_NOTIFICATION_HISTORY {
            self.history.pop_front();
        }
        self.current = Some(notification);
        id
    }

    /// The displayed message, if any
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// The displayed message text, if any
    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.message.as_str())
    }

    /// Clears the display only if `id` is still the displayed message
    pub fn expire(&mut self, id: NotificationId) -> bool {
        if self.current.as_ref().map(|n| n.id) == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Clears the display unconditionally
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Most recent notifications first
    pub fn recent(&self, limit: usize) -> Vec<&Notification> {
        self.history.iter().rev().take(limit).collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

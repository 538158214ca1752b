//! In-session notifications (level-ups, EOL hand-overs, referrals).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::temporal::Timestamp;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
}

/// A notification raised by a workflow for display by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub time: Timestamp,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
}

impl Notification {
    /// Create an unread notification stamped now.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            time: Timestamp::now(),
            kind,
            is_read: false,
        }
    }

    /// Mark as read.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

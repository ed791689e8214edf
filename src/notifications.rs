use std::sync::Mutex;
use std::time::Duration;

use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::UiConfig;

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
    #[default]
    Info,
}

impl Severity {
    /// Background color of the toast
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#4caf50",
            Severity::Warning => "#ff9800",
            Severity::Error => "#f44336",
            Severity::Info => "#2196f3",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
            Severity::Info => "ℹ️",
        }
    }
}

/// A message shown briefly in the corner of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    /// Message prefixed with the severity icon
    pub fn text(&self) -> String {
        format!("{} {}", self.severity.icon(), self.message)
    }
}

/// When a notification starts leaving and when it is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissTiming {
    pub visible: Duration,
    pub exit: Duration,
}

impl DismissTiming {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            visible: Duration::from_millis(ui.notification_visible_ms),
            exit: Duration::from_millis(ui.notification_exit_ms),
        }
    }

    /// Time from appearance until removal
    pub fn lifetime(&self) -> Duration {
        self.visible + self.exit
    }
}

impl Default for DismissTiming {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the terminal and mirrors them as tracing events
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => {
                info!(message = %notification.message, "Notification");
                eprintln!("{}", notification.text().green());
            }
            Severity::Warning => {
                warn!(message = %notification.message, "Notification");
                eprintln!("{}", notification.text().yellow());
            }
            Severity::Error => {
                error!(message = %notification.message, "Notification");
                eprintln!("{}", notification.text().red());
            }
            Severity::Info => {
                info!(message = %notification.message, "Notification");
                eprintln!("{}", notification.text().blue());
            }
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

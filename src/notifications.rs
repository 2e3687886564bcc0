//! # Notification Capability
//!
//! Seam to the external notification collaborator. The scheduler only reads
//! the permission state and calls [`NotificationCapability::deliver`];
//! requesting permission from the user is the host's job, never the core's.

use anyhow::Result;
use log::info;

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Undetermined,
}

/// Content of one reminder notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotification {
    pub title: String,
    pub body: String,
    /// Stable tag so the platform can collapse repeated reminders.
    pub tag: String,
}

/// External notification channel.
pub trait NotificationCapability: Send + Sync {
    fn permission_state(&self) -> PermissionState;

    /// Deliver a notification. An `Err` means the reminder did not reach the
    /// user and the day's dedup slot must not be consumed.
    fn deliver(&self, notification: &ReminderNotification) -> Result<()>;
}

/// Capability that writes reminders to the log instead of a system channel.
///
/// Useful for headless hosts and manual testing; always reports granted.
pub struct LogNotifier;

impl NotificationCapability for LogNotifier {
    fn permission_state(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn deliver(&self, notification: &ReminderNotification) -> Result<()> {
        info!("[{}] {}: {}", notification.tag, notification.title, notification.body);
        Ok(())
    }
}

//! # Reminder Scheduler
//!
//! Polling state machine that fires the daily homework reminder. While
//! running, a worker thread checks once a minute whether the local time
//! matches the configured reminder time; a persisted date marker guarantees
//! at most one fire per calendar day no matter how many ticks land on the
//! matching minute.
//!
//! The scheduler is an explicit instance owned by the host's
//! startup/shutdown lifecycle; there is no global singleton.

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::domain::models::{Child, Task};
use crate::notifications::{NotificationCapability, PermissionState, ReminderNotification};
use crate::storage::{KeyValueStore, StorageEngine};

/// Key holding the last-fired calendar date, separate from the main blob.
pub const REMINDER_MARKER_KEY: &str = "last-notification-date";

/// Fixed polling period while running.
const TICK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Daily reminder scheduler.
pub struct ReminderScheduler {
    core: Arc<SchedulerCore>,
    worker: Mutex<Option<Worker>>,
}

struct Worker {
    stop_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl ReminderScheduler {
    pub fn new(
        engine: Arc<StorageEngine>,
        marker_store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationCapability>,
    ) -> Self {
        Self {
            core: Arc::new(SchedulerCore {
                engine,
                marker_store,
                notifier,
            }),
            worker: Mutex::new(None),
        }
    }

    /// Move Stopped -> Running: one immediate synchronous check, then a
    /// recurring check every minute. No-op while already running.
    pub fn start(&self) {
        let mut worker = self.worker.lock().expect("scheduler state lock poisoned");
        if worker.is_some() {
            debug!("Reminder scheduler already running");
            return;
        }
        info!("Starting reminder scheduler");

        // Immediate check so an app launched on the reminder minute still
        // fires instead of waiting for the first tick.
        self.core.check_now();

        let core = self.core.clone();
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(TICK_INTERVAL) {
                Err(RecvTimeoutError::Timeout) => core.check_now(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        *worker = Some(Worker { stop_tx, handle });
    }

    /// Move Running -> Stopped, cancelling the recurring check. Idempotent.
    pub fn stop(&self) {
        let worker = self.worker.lock().expect("scheduler state lock poisoned").take();
        if let Some(worker) = worker {
            info!("Stopping reminder scheduler");
            let _ = worker.stop_tx.send(());
            let _ = worker.handle.join();
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.worker.lock().expect("scheduler state lock poisoned").is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Run one check against the current local time, outside the timer.
    pub fn check_now(&self) {
        self.core.check_now();
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

struct SchedulerCore {
    engine: Arc<StorageEngine>,
    marker_store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn NotificationCapability>,
}

impl SchedulerCore {
    fn check_now(&self) {
        self.check_at(Local::now().naive_local());
    }

    fn check_at(&self, now: NaiveDateTime) {
        let data = self.engine.load();

        if !data.settings.reminder_enabled {
            return;
        }

        // Exact-minute match with no catch-up: a tick delayed past the
        // configured minute misses the whole day.
        let current_time = now.format("%H:%M").to_string();
        if current_time != data.settings.reminder_time {
            return;
        }

        let today = now.date().format("%Y-%m-%d").to_string();
        match self.marker_store.get(REMINDER_MARKER_KEY) {
            Ok(Some(last_fired)) if last_fired == today => {
                debug!("Reminder already fired today");
                return;
            }
            Ok(_) => {}
            // An unreadable marker is treated as absent.
            Err(e) => warn!("Failed to read reminder marker: {e:#}"),
        }

        let incomplete: Vec<&Task> = data.tasks.iter().filter(|t| !t.completed).collect();
        if incomplete.is_empty() {
            // Nothing to remind about; the day's slot stays unconsumed.
            debug!("No incomplete tasks, skipping reminder");
            return;
        }

        if self.notifier.permission_state() != PermissionState::Granted {
            debug!("Notification permission not granted, skipping reminder");
            return;
        }

        let notification = build_reminder(&data.children, &incomplete);
        match self.notifier.deliver(&notification) {
            Ok(()) => {
                info!("Delivered daily reminder for {} incomplete task(s)", incomplete.len());
                if let Err(e) = self.marker_store.set(REMINDER_MARKER_KEY, &today) {
                    warn!("Failed to write reminder marker: {e:#}");
                }
            }
            Err(e) => warn!("Failed to deliver reminder: {e:#}"),
        }
    }
}

/// Summary plus per-child breakdown, children in first-seen task order.
fn build_reminder(children: &[Child], incomplete: &[&Task]) -> ReminderNotification {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for task in incomplete {
        match counts.iter_mut().find(|(id, _)| *id == task.child_id) {
            Some((_, count)) => *count += 1,
            None => counts.push((task.child_id.as_str(), 1)),
        }
    }

    let details: Vec<String> = counts
        .iter()
        .map(|(child_id, count)| {
            let name = children
                .iter()
                .find(|c| c.id == *child_id)
                .map(|c| c.name.as_str())
                .unwrap_or("Bilinmeyen");
            format!("{name}: {count} ödev")
        })
        .collect();

    ReminderNotification {
        title: "Ödev Hatırlatıcı 📚".to_string(),
        body: format!(
            "{} tamamlanmamış ödev var!\n\n{}",
            incomplete.len(),
            details.join("\n")
        ),
        tag: "daily-reminder".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::TestHelper;
    use anyhow::{anyhow, Result};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct RecordingNotifier {
        permission: PermissionState,
        fail_delivery: AtomicBool,
        delivered: Mutex<Vec<ReminderNotification>>,
    }

    impl RecordingNotifier {
        fn granted() -> Arc<Self> {
            Arc::new(Self {
                permission: PermissionState::Granted,
                fail_delivery: AtomicBool::new(false),
                delivered: Mutex::new(Vec::new()),
            })
        }

        fn with_permission(permission: PermissionState) -> Arc<Self> {
            Arc::new(Self {
                permission,
                fail_delivery: AtomicBool::new(false),
                delivered: Mutex::new(Vec::new()),
            })
        }

        fn delivery_count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }
    }

    impl NotificationCapability for RecordingNotifier {
        fn permission_state(&self) -> PermissionState {
            self.permission
        }

        fn deliver(&self, notification: &ReminderNotification) -> Result<()> {
            if self.fail_delivery.load(Ordering::SeqCst) {
                return Err(anyhow!("delivery channel unavailable"));
            }
            self.delivered.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    /// Store wrapper that counts writes going through it.
    struct CountingStore {
        inner: Arc<dyn KeyValueStore>,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn wrapping(inner: Arc<dyn KeyValueStore>) -> Arc<Self> {
            Arc::new(Self {
                inner,
                writes: AtomicUsize::new(0),
            })
        }

        fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M")
            .expect("valid test datetime")
    }

    fn core_with(helper: &TestHelper, notifier: Arc<RecordingNotifier>) -> SchedulerCore {
        SchedulerCore {
            engine: helper.engine.clone(),
            marker_store: helper.store.clone(),
            notifier,
        }
    }

    /// Enabled reminder at 18:00 with one incomplete task.
    fn armed_helper() -> Result<TestHelper> {
        let helper = TestHelper::new()?;
        let child = helper.children.add_child("Ayşe", 5).unwrap();
        helper.add_task(&child.id, "Matematik", "2099-01-01");
        assert!(helper
            .settings
            .update_settings(crate::domain::models::SettingsUpdate {
                reminder_enabled: Some(true),
                reminder_time: Some("18:00".to_string()),
                ..Default::default()
            }));
        Ok(helper)
    }

    #[test]
    fn fires_exactly_once_per_calendar_day() -> Result<()> {
        let helper = armed_helper()?;
        let notifier = RecordingNotifier::granted();
        // Route the marker through a counting wrapper so the one-write-per-day
        // guarantee is observable, not just the marker's final value.
        let marker_store = CountingStore::wrapping(helper.store.clone());
        let core = SchedulerCore {
            engine: helper.engine.clone(),
            marker_store: marker_store.clone(),
            notifier: notifier.clone(),
        };

        core.check_at(at("2025-03-01", "17:59"));
        assert_eq!(notifier.delivery_count(), 0);
        assert_eq!(marker_store.write_count(), 0);

        core.check_at(at("2025-03-01", "18:00"));
        assert_eq!(notifier.delivery_count(), 1);
        assert_eq!(marker_store.write_count(), 1);
        assert_eq!(marker_store.get(REMINDER_MARKER_KEY)?.as_deref(), Some("2025-03-01"));

        // Further ticks on the matching minute are deduplicated: no extra
        // delivery, no extra marker write.
        core.check_at(at("2025-03-01", "18:00"));
        core.check_at(at("2025-03-01", "18:01"));
        assert_eq!(notifier.delivery_count(), 1);
        assert_eq!(marker_store.write_count(), 1);

        // A new day re-arms the reminder.
        core.check_at(at("2025-03-02", "18:00"));
        assert_eq!(notifier.delivery_count(), 2);
        assert_eq!(marker_store.write_count(), 2);
        assert_eq!(marker_store.get(REMINDER_MARKER_KEY)?.as_deref(), Some("2025-03-02"));
        Ok(())
    }

    #[test]
    fn disabled_reminder_never_fires() -> Result<()> {
        let helper = armed_helper()?;
        assert!(helper
            .settings
            .update_settings(crate::domain::models::SettingsUpdate {
                reminder_enabled: Some(false),
                ..Default::default()
            }));
        let notifier = RecordingNotifier::granted();
        let core = core_with(&helper, notifier.clone());

        for time in ["17:59", "18:00", "18:00", "18:01"] {
            core.check_at(at("2025-03-01", time));
        }
        assert_eq!(notifier.delivery_count(), 0);
        assert_eq!(helper.store.get(REMINDER_MARKER_KEY)?, None);
        Ok(())
    }

    #[test]
    fn missing_permission_silently_skips_and_keeps_the_slot() -> Result<()> {
        for permission in [PermissionState::Denied, PermissionState::Undetermined] {
            let helper = armed_helper()?;
            let notifier = RecordingNotifier::with_permission(permission);
            let core = core_with(&helper, notifier.clone());

            core.check_at(at("2025-03-01", "18:00"));
            assert_eq!(notifier.delivery_count(), 0);
            // No marker: the scheduler never requests permission, it just
            // stays silent, and the day is not consumed.
            assert_eq!(helper.store.get(REMINDER_MARKER_KEY)?, None);
        }
        Ok(())
    }

    #[test]
    fn empty_task_day_does_not_consume_the_daily_slot() -> Result<()> {
        let helper = TestHelper::new()?;
        let child = helper.children.add_child("Ayşe", 5).unwrap();
        assert!(helper
            .settings
            .update_settings(crate::domain::models::SettingsUpdate {
                reminder_enabled: Some(true),
                reminder_time: Some("18:00".to_string()),
                ..Default::default()
            }));
        let notifier = RecordingNotifier::granted();
        let core = core_with(&helper, notifier.clone());

        core.check_at(at("2025-03-01", "18:00"));
        assert_eq!(notifier.delivery_count(), 0);
        assert_eq!(helper.store.get(REMINDER_MARKER_KEY)?, None);

        // A task added later the same day can still fire on a matching tick.
        helper.add_task(&child.id, "Fen", "2099-01-01");
        core.check_at(at("2025-03-01", "18:00"));
        assert_eq!(notifier.delivery_count(), 1);
        Ok(())
    }

    #[test]
    fn failed_delivery_leaves_the_marker_unwritten() -> Result<()> {
        let helper = armed_helper()?;
        let notifier = RecordingNotifier::granted();
        let core = core_with(&helper, notifier.clone());

        notifier.fail_delivery.store(true, Ordering::SeqCst);
        core.check_at(at("2025-03-01", "18:00"));
        assert_eq!(notifier.delivery_count(), 0);
        assert_eq!(helper.store.get(REMINDER_MARKER_KEY)?, None);

        // Once the channel recovers, the same day can still fire.
        notifier.fail_delivery.store(false, Ordering::SeqCst);
        core.check_at(at("2025-03-01", "18:00"));
        assert_eq!(notifier.delivery_count(), 1);
        assert_eq!(
            helper.store.get(REMINDER_MARKER_KEY)?.as_deref(),
            Some("2025-03-01")
        );
        Ok(())
    }

    #[test]
    fn reminder_content_groups_incomplete_tasks_per_child() -> Result<()> {
        let helper = TestHelper::new()?;
        let ayse = helper.children.add_child("Ayşe", 5).unwrap();
        let ali = helper.children.add_child("Ali", 2).unwrap();
        helper.add_task(&ayse.id, "Matematik", "2099-01-01");
        helper.add_task(&ayse.id, "Fen", "2099-01-02");
        helper.add_task(&ali.id, "Türkçe", "2099-01-03");
        let done = helper.add_task(&ali.id, "Müzik", "2099-01-04");
        assert!(helper.tasks.toggle_task_completion(&done.id));
        assert!(helper
            .settings
            .update_settings(crate::domain::models::SettingsUpdate {
                reminder_enabled: Some(true),
                reminder_time: Some("18:00".to_string()),
                ..Default::default()
            }));

        let notifier = RecordingNotifier::granted();
        let core = core_with(&helper, notifier.clone());
        core.check_at(at("2025-03-01", "18:00"));

        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        let notification = &delivered[0];
        assert_eq!(notification.title, "Ödev Hatırlatıcı 📚");
        assert_eq!(notification.tag, "daily-reminder");
        assert!(notification.body.starts_with("3 tamamlanmamış ödev var!"));
        assert!(notification.body.contains("Ayşe: 2 ödev"));
        assert!(notification.body.contains("Ali: 1 ödev"));
        Ok(())
    }

    #[test]
    fn unknown_child_in_breakdown_falls_back_to_placeholder() {
        let orphan = Task::new("ghost", "Fen", "", "2099-01-01", Default::default());
        let notification = build_reminder(&[], &[&orphan]);
        assert!(notification.body.contains("Bilinmeyen: 1 ödev"));
    }

    #[test]
    fn start_and_stop_are_idempotent_transitions() -> Result<()> {
        // Reminder stays disabled so ticks are no-ops.
        let helper = TestHelper::new()?;
        let scheduler = ReminderScheduler::new(
            helper.engine.clone(),
            helper.store.clone(),
            RecordingNotifier::granted(),
        );

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        scheduler.stop(); // stopping while stopped is fine
        assert!(!scheduler.is_running());

        scheduler.start();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        scheduler.start(); // starting while running is a no-op
        assert!(scheduler.is_running());

        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        Ok(())
    }
}

//! # Feature: Reminder Dispatch
//!
//! Background sweep loop that delivers due reminders and advances them to
//! their next occurrence. Delivery goes through the injected
//! [`ReminderNotifier`]; the shipped [`LogNotifier`] writes a structured log
//! line, with real channels (email, in-app) living outside this crate.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.4.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: Sweep rebuilt on the injected store/notifier seams
//! - 1.0.0: Initial polling loop against the reminders table

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use log::{debug, error, info, warn};

use super::record::Reminder;
use super::service::ReminderService;

/// Default seconds between sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Delivery seam for dispatched reminders.
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    async fn notify(&self, reminder: &Reminder) -> Result<()>;
}

/// Notifier that only logs. Stands in wherever no delivery channel is wired.
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<()> {
        info!(
            "Reminder due for {}: [{}/{}] {}",
            reminder.owner_key,
            reminder.context.as_str(),
            reminder.priority,
            reminder.description
        );
        Ok(())
    }
}

/// Periodic dispatcher over the reminder store.
pub struct ReminderScheduler {
    service: ReminderService,
    notifier: Arc<dyn ReminderNotifier>,
    sweep_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(service: ReminderService, notifier: Arc<dyn ReminderNotifier>) -> Self {
        ReminderScheduler {
            service,
            notifier,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    /// Override the sweep cadence.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Run the sweep loop forever. A failed sweep is logged and the next
    /// tick proceeds; nothing here takes the loop down.
    pub async fn run(self) {
        info!(
            "Reminder dispatch running, sweeping every {}s",
            self.sweep_interval.as_secs()
        );
        let mut interval = tokio::time::interval(self.sweep_interval);
        loop {
            interval.tick().await;
            let now = Local::now().naive_local();
            match self.sweep(now).await {
                Ok(0) => debug!("Sweep at {now}: nothing due"),
                Ok(count) => info!("Sweep at {now}: dispatched {count} reminder(s)"),
                Err(e) => error!("Reminder sweep failed: {e}"),
            }
        }
    }

    /// One dispatch pass: deliver every due reminder, then advance each to
    /// its next occurrence.
    ///
    /// Delivery is best-effort: a notifier failure is logged and the
    /// reminder is still rescheduled, so one bad channel cannot wedge a
    /// record into firing on every sweep.
    pub async fn sweep(&self, now: NaiveDateTime) -> Result<usize> {
        let due = self.service.due_reminders(now).await?;
        let mut dispatched = 0;

        for reminder in due {
            if let Err(e) = self.notifier.notify(&reminder).await {
                warn!("Failed to deliver reminder {}: {e}", reminder.id);
            }
            match self.service.reschedule(&reminder, now).await {
                Ok(_) => dispatched += 1,
                Err(e) => warn!("Failed to reschedule reminder {}: {e}", reminder.id),
            }
        }

        Ok(dispatched)
    }
}

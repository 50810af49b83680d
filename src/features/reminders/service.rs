//! Reminder lifecycle operations
//!
//! Creation, due queries, and rescheduling: the surface the API layer and
//! the dispatcher call into. Validation policy and the decode-fallback for
//! corrupted rows live here.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 2.1.0: Reschedule computes from the sweep instant to stop catch-up backlogs
//! - 2.0.0: Store moved behind the injected ReminderStore trait
//! - 1.0.0: Initial create/list operations

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::Deserialize;
use uuid::Uuid;

use crate::features::recurrence::{fallback_occurrence, next_occurrence, Recurrence};

use super::record::{Reminder, ReminderContext, ReminderStatus, ValidationError, DEFAULT_PRIORITY};
use super::store::ReminderStore;

/// Inbound creation request, as the API layer hands it over.
///
/// Only the numeric parameter matching `kind` is consulted; the others may be
/// left unset. Out-of-range parameters are clamped, never rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub owner_key: String,
    /// Optional label; blank input gets the context's default phrase.
    pub description: Option<String>,
    /// One of `income`, `assets`, `expenses`. The only hard-validated field
    /// besides the description.
    pub context: String,
    /// Recurrence kind; unknown values resolve to `monthly`.
    pub kind: String,
    /// Day of month for `monthly`.
    pub day: Option<i64>,
    /// Week of quarter for `quarterly`.
    pub week: Option<i64>,
    /// Month of year for `annually`.
    pub month: Option<i64>,
    /// Optional priority tag, defaults to `normal`.
    pub priority: Option<String>,
}

/// Reminder operations over an injected store.
#[derive(Clone)]
pub struct ReminderService {
    store: Arc<dyn ReminderStore>,
}

impl ReminderService {
    pub fn new(store: Arc<dyn ReminderStore>) -> Self {
        ReminderService { store }
    }

    /// Validate a creation request, compute its first fire instant strictly
    /// after `now`, and persist it as `pending`.
    ///
    /// Fails with [`ValidationError`] for an unrecognized context or a
    /// description that is still empty after default substitution. Recurrence
    /// parameters never fail; they are clamped.
    pub async fn create(&self, request: NewReminder, now: NaiveDateTime) -> Result<Reminder> {
        let context = ReminderContext::parse(&request.context)?;

        let description = match request.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => context.default_description().to_string(),
        };
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }

        let priority = match request.priority.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => tag.to_string(),
            _ => DEFAULT_PRIORITY.to_string(),
        };

        let rule = Recurrence::parse(&request.kind, request.day, request.week, request.month);
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            owner_key: request.owner_key,
            scheduled_at: next_occurrence(&rule, now),
            description,
            context,
            recurrence: rule.encode(),
            priority,
            status: ReminderStatus::Pending,
            created_at: now,
        };

        self.store.insert(&reminder).await?;
        info!(
            "Created reminder {} ({}, {}) firing at {}",
            reminder.id,
            reminder.context.as_str(),
            rule,
            reminder.scheduled_at
        );
        Ok(reminder)
    }

    /// All pending reminders due at or before `now`. Ordering is unspecified.
    pub async fn due_reminders(&self, now: NaiveDateTime) -> Result<Vec<Reminder>> {
        self.store.find_due(now).await
    }

    /// Advance a dispatched reminder to its next occurrence.
    ///
    /// The next fire instant is computed from `now` (the sweep time) rather
    /// than the missed `scheduled_at`, so a reminder dispatched late does not
    /// produce a backlog of rapid-fire catch-ups. A malformed stored rule is
    /// recovered with a 24-hour deferral instead of failing the sweep. The
    /// record stays `pending`.
    ///
    /// Advancement goes through the store's compare-and-set; if another
    /// worker already advanced this record, the record is returned as that
    /// worker left it.
    pub async fn reschedule(&self, reminder: &Reminder, now: NaiveDateTime) -> Result<Reminder> {
        let next = match Recurrence::decode(&reminder.recurrence) {
            Ok(rule) => next_occurrence(&rule, now),
            Err(e) => {
                warn!(
                    "Reminder {} has a malformed recurrence ({e}); deferring 24 hours",
                    reminder.id
                );
                fallback_occurrence(now)
            }
        };

        if self
            .store
            .advance_schedule(&reminder.id, reminder.scheduled_at, next)
            .await?
        {
            let mut updated = reminder.clone();
            updated.scheduled_at = next;
            debug!("Rescheduled reminder {} to {}", updated.id, next);
            return Ok(updated);
        }

        debug!(
            "Reminder {} was already advanced by another worker",
            reminder.id
        );
        // Lost the race (or the row vanished underneath us); hand back
        // whatever the store holds now.
        match self.store.get(&reminder.id).await? {
            Some(current) => Ok(current),
            None => Ok(reminder.clone()),
        }
    }
}

//! Reminder store boundary
//!
//! The persistence collaborator is dependency-injected behind
//! [`ReminderStore`] rather than reached through a module-level client.
//! [`MemoryStore`] backs tests and local development; the SQLite
//! implementation lives in `crate::database`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::DashMap;

use super::record::{Reminder, ReminderStatus};

/// Persistence operations the scheduler core needs.
///
/// `advance_schedule` must be atomic per record: of two workers racing to
/// advance the same due reminder, exactly one may win.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Persist a newly created reminder.
    async fn insert(&self, reminder: &Reminder) -> Result<()>;

    /// Fetch a reminder by id.
    async fn get(&self, id: &str) -> Result<Option<Reminder>>;

    /// All `pending` reminders with `scheduled_at <= now`. Ordering is
    /// unspecified; callers must not depend on it.
    async fn find_due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>>;

    /// Compare-and-set advancement of a pending reminder's `scheduled_at`.
    ///
    /// Succeeds (returns `true`) only if the stored value still equals
    /// `expected` and the record is still `pending`.
    async fn advance_schedule(
        &self,
        id: &str,
        expected: NaiveDateTime,
        next: NaiveDateTime,
    ) -> Result<bool>;

    /// Overwrite a reminder's status. Returns `false` if the id is unknown.
    async fn set_status(&self, id: &str, status: ReminderStatus) -> Result<bool>;
}

/// In-memory `ReminderStore` over a concurrent map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    reminders: Arc<DashMap<String, Reminder>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reminders, any status.
    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn insert(&self, reminder: &Reminder) -> Result<()> {
        self.reminders
            .insert(reminder.id.clone(), reminder.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Reminder>> {
        Ok(self.reminders.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>> {
        Ok(self
            .reminders
            .iter()
            .filter(|entry| {
                entry.status == ReminderStatus::Pending && entry.scheduled_at <= now
            })
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn advance_schedule(
        &self,
        id: &str,
        expected: NaiveDateTime,
        next: NaiveDateTime,
    ) -> Result<bool> {
        // The entry guard makes the compare-and-set atomic per record.
        match self.reminders.get_mut(id) {
            Some(mut entry)
                if entry.status == ReminderStatus::Pending && entry.scheduled_at == expected =>
            {
                entry.scheduled_at = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_status(&self, id: &str, status: ReminderStatus) -> Result<bool> {
        match self.reminders.get_mut(id) {
            Some(mut entry) => {
                entry.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::record::ReminderContext;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample(id: &str, scheduled_at: NaiveDateTime) -> Reminder {
        Reminder {
            id: id.to_string(),
            owner_key: "user-1".to_string(),
            scheduled_at,
            description: "Review your income".to_string(),
            context: ReminderContext::Income,
            recurrence: "monthly:1".to_string(),
            priority: "normal".to_string(),
            status: ReminderStatus::Pending,
            created_at: at(2024, 1, 1, 12),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let reminder = sample("r1", at(2024, 2, 1, 9));
        store.insert(&reminder).await.unwrap();

        assert_eq!(store.get("r1").await.unwrap(), Some(reminder));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_due_includes_boundary() {
        let store = MemoryStore::new();
        store.insert(&sample("past", at(2024, 2, 1, 9))).await.unwrap();
        store
            .insert(&sample("future", at(2024, 3, 1, 9)))
            .await
            .unwrap();

        // A reminder scheduled exactly at the sweep instant is due.
        let due = store.find_due(at(2024, 2, 1, 9)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "past");
    }

    #[tokio::test]
    async fn test_find_due_skips_non_pending() {
        let store = MemoryStore::new();
        let mut cancelled = sample("c1", at(2024, 2, 1, 9));
        cancelled.status = ReminderStatus::Cancelled;
        store.insert(&cancelled).await.unwrap();

        assert!(store.find_due(at(2024, 6, 1, 9)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_advance_schedule_cas_succeeds_once() {
        let store = MemoryStore::new();
        let scheduled = at(2024, 2, 1, 9);
        store.insert(&sample("r1", scheduled)).await.unwrap();

        let next = at(2024, 3, 1, 9);
        assert!(store.advance_schedule("r1", scheduled, next).await.unwrap());
        // Second worker holding the stale expectation loses.
        assert!(!store.advance_schedule("r1", scheduled, next).await.unwrap());

        let current = store.get("r1").await.unwrap().unwrap();
        assert_eq!(current.scheduled_at, next);
    }

    #[tokio::test]
    async fn test_advance_schedule_ignores_non_pending() {
        let store = MemoryStore::new();
        let scheduled = at(2024, 2, 1, 9);
        let mut reminder = sample("r1", scheduled);
        reminder.status = ReminderStatus::Cancelled;
        store.insert(&reminder).await.unwrap();

        assert!(!store
            .advance_schedule("r1", scheduled, at(2024, 3, 1, 9))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_set_status() {
        let store = MemoryStore::new();
        store.insert(&sample("r1", at(2024, 2, 1, 9))).await.unwrap();

        assert!(store
            .set_status("r1", ReminderStatus::Cancelled)
            .await
            .unwrap());
        assert_eq!(
            store.get("r1").await.unwrap().unwrap().status,
            ReminderStatus::Cancelled
        );
        assert!(!store
            .set_status("missing", ReminderStatus::Fired)
            .await
            .unwrap());
    }
}

//! # Database Module
//!
//! SQLite persistence for reminder records. Bootstraps its schema on open
//! and exposes async methods over a shared connection; implements the
//! [`ReminderStore`] boundary plus the owner-facing operations (listing,
//! cancellation) that the API layer calls directly.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Reduced to the reminders table; conditional-update advancement for sweep workers
//! - 1.0.0: Initial schema bootstrap and reminder CRUD

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::info;
use tokio::sync::Mutex;

use crate::features::reminders::{Reminder, ReminderContext, ReminderStatus, ReminderStore};

/// Storage format for civil timestamps. Zero-padded so lexicographic
/// comparison in SQL matches chronological order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    owner_key TEXT NOT NULL,
    scheduled_at TEXT NOT NULL,
    description TEXT NOT NULL,
    context TEXT NOT NULL,
    recurrence TEXT NOT NULL,
    priority TEXT NOT NULL DEFAULT 'normal',
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reminders_due ON reminders (status, scheduled_at);
CREATE INDEX IF NOT EXISTS idx_reminders_owner ON reminders (owner_key);
";

/// SQLite-backed reminder store.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<sqlite::Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and bootstrap the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let connection = sqlite::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;
        connection.execute(SCHEMA)?;
        info!("Reminder database ready at {path}");
        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// All reminders belonging to `owner_key`, any status.
    pub async fn owner_reminders(&self, owner_key: &str) -> Result<Vec<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT id, owner_key, scheduled_at, description, context, recurrence,
                    priority, status, created_at
             FROM reminders WHERE owner_key = :owner_key",
        )?;
        statement.bind((":owner_key", owner_key))?;

        let mut reminders = Vec::new();
        while let sqlite::State::Row = statement.next()? {
            reminders.push(read_reminder(&statement)?);
        }
        Ok(reminders)
    }

    /// Cancel a pending reminder owned by `owner_key`. Returns `false` when
    /// the id is unknown, owned by someone else, or no longer pending.
    pub async fn cancel(&self, id: &str, owner_key: &str) -> Result<bool> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "UPDATE reminders SET status = 'cancelled'
             WHERE id = :id AND owner_key = :owner_key AND status = 'pending'",
        )?;
        statement.bind((":id", id))?;
        statement.bind((":owner_key", owner_key))?;
        statement.next()?;
        Ok(connection.change_count() > 0)
    }
}

#[async_trait]
impl ReminderStore for Database {
    async fn insert(&self, reminder: &Reminder) -> Result<()> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "INSERT INTO reminders
                 (id, owner_key, scheduled_at, description, context, recurrence,
                  priority, status, created_at)
             VALUES
                 (:id, :owner_key, :scheduled_at, :description, :context, :recurrence,
                  :priority, :status, :created_at)",
        )?;
        statement.bind((":id", reminder.id.as_str()))?;
        statement.bind((":owner_key", reminder.owner_key.as_str()))?;
        statement.bind((":scheduled_at", encode_timestamp(reminder.scheduled_at).as_str()))?;
        statement.bind((":description", reminder.description.as_str()))?;
        statement.bind((":context", reminder.context.as_str()))?;
        statement.bind((":recurrence", reminder.recurrence.as_str()))?;
        statement.bind((":priority", reminder.priority.as_str()))?;
        statement.bind((":status", reminder.status.as_str()))?;
        statement.bind((":created_at", encode_timestamp(reminder.created_at).as_str()))?;
        statement.next()?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT id, owner_key, scheduled_at, description, context, recurrence,
                    priority, status, created_at
             FROM reminders WHERE id = :id",
        )?;
        statement.bind((":id", id))?;

        match statement.next()? {
            sqlite::State::Row => Ok(Some(read_reminder(&statement)?)),
            sqlite::State::Done => Ok(None),
        }
    }

    async fn find_due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "SELECT id, owner_key, scheduled_at, description, context, recurrence,
                    priority, status, created_at
             FROM reminders WHERE status = 'pending' AND scheduled_at <= :now",
        )?;
        statement.bind((":now", encode_timestamp(now).as_str()))?;

        let mut due = Vec::new();
        while let sqlite::State::Row = statement.next()? {
            due.push(read_reminder(&statement)?);
        }
        Ok(due)
    }

    async fn advance_schedule(
        &self,
        id: &str,
        expected: NaiveDateTime,
        next: NaiveDateTime,
    ) -> Result<bool> {
        let connection = self.connection.lock().await;
        // Conditional update: only the worker whose expectation still matches
        // the stored value advances the record.
        let mut statement = connection.prepare(
            "UPDATE reminders SET scheduled_at = :next
             WHERE id = :id AND scheduled_at = :expected AND status = 'pending'",
        )?;
        statement.bind((":next", encode_timestamp(next).as_str()))?;
        statement.bind((":id", id))?;
        statement.bind((":expected", encode_timestamp(expected).as_str()))?;
        statement.next()?;
        Ok(connection.change_count() > 0)
    }

    async fn set_status(&self, id: &str, status: ReminderStatus) -> Result<bool> {
        let connection = self.connection.lock().await;
        let mut statement = connection
            .prepare("UPDATE reminders SET status = :status WHERE id = :id")?;
        statement.bind((":status", status.as_str()))?;
        statement.bind((":id", id))?;
        statement.next()?;
        Ok(connection.change_count() > 0)
    }
}

fn encode_timestamp(instant: NaiveDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .with_context(|| format!("malformed stored timestamp {text:?}"))
}

fn read_reminder(statement: &sqlite::Statement<'_>) -> Result<Reminder> {
    let id = statement.read::<String, _>("id")?;
    let context_text = statement.read::<String, _>("context")?;
    let status_text = statement.read::<String, _>("status")?;

    let context = ReminderContext::parse(&context_text)
        .map_err(|_| anyhow!("reminder {id} has unknown context {context_text:?}"))?;
    let status = ReminderStatus::parse(&status_text)
        .ok_or_else(|| anyhow!("reminder {id} has unknown status {status_text:?}"))?;

    Ok(Reminder {
        owner_key: statement.read::<String, _>("owner_key")?,
        scheduled_at: parse_timestamp(&statement.read::<String, _>("scheduled_at")?)?,
        description: statement.read::<String, _>("description")?,
        context,
        recurrence: statement.read::<String, _>("recurrence")?,
        priority: statement.read::<String, _>("priority")?,
        status,
        created_at: parse_timestamp(&statement.read::<String, _>("created_at")?)?,
        id,
    })
}

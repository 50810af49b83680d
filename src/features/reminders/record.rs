//! Reminder record and its domain enums
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 2.0.0: Context/status promoted from raw strings to enums with storage forms
//! - 1.0.0: Initial record shape

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default priority tag applied when a creation request leaves it blank.
pub const DEFAULT_PRIORITY: &str = "normal";

/// Rejected creation input. Surfaced directly to the caller; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The context is not one of the recognized planning areas.
    #[error("unrecognized reminder context {0:?}")]
    UnknownContext(String),
    /// The description is still empty after default substitution.
    #[error("reminder description is empty")]
    EmptyDescription,
}

/// The planning area a reminder belongs to. A domain tag only; the scheduler
/// does not interpret it beyond validation and default descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderContext {
    Income,
    Assets,
    Expenses,
}

impl ReminderContext {
    /// Storage string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderContext::Income => "income",
            ReminderContext::Assets => "assets",
            ReminderContext::Expenses => "expenses",
        }
    }

    /// Parse a context from request or storage input.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_lowercase().as_str() {
            "income" => Ok(ReminderContext::Income),
            "assets" => Ok(ReminderContext::Assets),
            "expenses" => Ok(ReminderContext::Expenses),
            other => Err(ValidationError::UnknownContext(other.to_string())),
        }
    }

    /// Description substituted when the creation request leaves it blank.
    pub fn default_description(&self) -> &'static str {
        match self {
            ReminderContext::Income => "Review your income",
            ReminderContext::Assets => "Review your assets",
            ReminderContext::Expenses => "Review your expenses",
        }
    }
}

/// Lifecycle state of a reminder record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Waiting for its fire instant. The only state the dispatcher acts on.
    Pending,
    /// Delivered and not rescheduled (one-shot records only).
    Fired,
    /// Cancelled through the store by the owning user; never by this core.
    Cancelled,
}

impl ReminderStatus {
    /// Storage string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Fired => "fired",
            ReminderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status from storage. Returns `None` for unknown strings so the
    /// store can report the row instead of guessing.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReminderStatus::Pending),
            "fired" => Some(ReminderStatus::Fired),
            "cancelled" => Some(ReminderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A persisted reminder.
///
/// Created once on user request with status `pending`; after that only the
/// dispatcher mutates it, by advancing `scheduled_at` to the next occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Opaque identifier, assigned at creation, immutable.
    pub id: String,
    /// Opaque reference to the requesting user.
    pub owner_key: String,
    /// Next fire instant, civil time. Future at write and recompute time.
    pub scheduled_at: NaiveDateTime,
    /// Free-text label, never empty.
    pub description: String,
    /// Planning area tag.
    pub context: ReminderContext,
    /// Encoded recurrence rule (`monthly:<d>` / `quarterly:<w>` /
    /// `annually:<m>` / `once`).
    pub recurrence: String,
    /// Free-text priority tag.
    pub priority: String,
    /// Lifecycle state.
    pub status: ReminderStatus,
    /// Creation instant, civil time.
    pub created_at: NaiveDateTime,
}

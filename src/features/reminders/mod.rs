//! # Reminders Feature
//!
//! Recurring reminder records, their lifecycle operations, and the dispatch
//! sweep that fires them once per period.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.4.0
//! - **Toggleable**: true

pub mod record;
pub mod scheduler;
pub mod service;
pub mod store;

pub use record::{Reminder, ReminderContext, ReminderStatus, ValidationError, DEFAULT_PRIORITY};
pub use scheduler::{
    LogNotifier, ReminderNotifier, ReminderScheduler, DEFAULT_SWEEP_INTERVAL_SECS,
};
pub use service::{NewReminder, ReminderService};
pub use store::{MemoryStore, ReminderStore};

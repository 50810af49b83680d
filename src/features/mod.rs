//! # Features
//!
//! Feature modules: the recurrence engine and the reminder lifecycle built
//! on top of it.

pub mod recurrence;
pub mod reminders;

pub use recurrence::{next_occurrence, DecodeError, Recurrence};
pub use reminders::{
    LogNotifier, MemoryStore, NewReminder, Reminder, ReminderContext, ReminderNotifier,
    ReminderScheduler, ReminderService, ReminderStatus, ReminderStore, ValidationError,
};

// Core layer - shared configuration
pub mod core;

// Features layer - recurrence engine and reminder lifecycle
pub mod features;

// Infrastructure - SQLite-backed reminder store
pub mod database;

// Re-export core config for the worker binary
pub use crate::core::Config;

// Re-export feature items
pub use features::{
    // Recurrence
    next_occurrence, DecodeError, Recurrence,
    // Reminders
    LogNotifier, MemoryStore, NewReminder, Reminder, ReminderContext, ReminderNotifier,
    ReminderScheduler, ReminderService, ReminderStatus, ReminderStore, ValidationError,
};

// Re-export the SQLite store
pub use database::Database;

//! # Recurrence Feature
//!
//! Recurrence rules and the calendar arithmetic that turns them into
//! concrete fire instants.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.2.0
//! - **Toggleable**: false

pub mod next_occurrence;
pub mod rule;

pub use next_occurrence::{fallback_occurrence, next_occurrence, FIRE_HOUR, FIRE_MINUTE};
pub use rule::{DecodeError, Recurrence};

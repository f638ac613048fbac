//! Retention and legal-hold derivation rules.
//!
//! # Responsibility
//! - Calendar helpers shared by every trigger kind.
//! - Pure per-document resolution of `(d_r_status, d_r_deletion)`.
//!
//! # Invariants
//! - Nothing in this module reads a clock; `today` is always a parameter.
//! - Resolution never yields `RetentionStatus::NotSet`.

pub mod calendar;
pub mod rules;

pub use calendar::{add_calendar_months, format_date, parse_date};
pub use rules::{resolve_target, EmployeeIndex};

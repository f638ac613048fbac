//! Domain records read and written by the retention batch runs.
//!
//! # Responsibility
//! - Define employee and document shapes as stored by the directory/store.
//! - Define canonical retention status labels and trigger kinds.
//!
//! # Invariants
//! - Every record is identified by a non-empty stable text id.
//! - `Document::e_lhold` is a cached projection of the employee hold flag.

pub mod document;
pub mod employee;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for employee/document records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Identifier is empty or whitespace only.
    EmptyId(&'static str),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId(field) => write!(f, "{field} cannot be empty"),
        }
    }
}

impl Error for ModelValidationError {}

//! Employee record as exposed by the Employee Directory.

use super::ModelValidationError;
use serde::{Deserialize, Serialize};

/// Status label that starts the retention clock for `Termination` rules.
pub const TERMINATED_STATUS: &str = "terminated";

/// Employee snapshot consumed by the batch runs. Read-only to this crate's
/// services; written only by directory maintenance helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub e_id: String,
    /// Free text; `Active`, `Terminated`, or anything else.
    pub e_status: String,
    /// Termination date, meaningful only when terminated.
    pub e_tdate: Option<String>,
    /// Legal-hold flag owned by the directory.
    pub e_lhold: bool,
}

impl Employee {
    /// Creates an active employee without legal hold.
    pub fn active(e_id: impl Into<String>) -> Self {
        Self {
            e_id: e_id.into(),
            e_status: "Active".to_string(),
            e_tdate: None,
            e_lhold: false,
        }
    }

    /// Creates a terminated employee with the given termination date.
    pub fn terminated(e_id: impl Into<String>, e_tdate: impl Into<String>) -> Self {
        Self {
            e_id: e_id.into(),
            e_status: "Terminated".to_string(),
            e_tdate: Some(e_tdate.into()),
            e_lhold: false,
        }
    }

    /// Returns whether `e_status` reads as terminated (trimmed,
    /// case-insensitive).
    pub fn is_terminated(&self) -> bool {
        self.e_status.trim().eq_ignore_ascii_case(TERMINATED_STATUS)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.e_id.trim().is_empty() {
            return Err(ModelValidationError::EmptyId("e_id"));
        }
        Ok(())
    }
}

//! Batch use-case services.
//!
//! # Responsibility
//! - Orchestrate directory/store reads, rule evaluation, and store writes
//!   into the two operator-triggered batch runs.
//! - Produce operator reports on the success path only.
//!
//! # Invariants
//! - Any read failure aborts a run before its first write.
//! - A write failure aborts the remaining writes; completed writes stay.
//! - No retries. A failed run is re-triggered from scratch.
//! - Two concurrent runs over the same documents are not coordinated and
//!   may race on the same rows.

pub mod batch;
pub mod legal_hold_service;
pub mod report;
pub mod retention_service;

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Terminal failure of one batch run.
#[derive(Debug)]
pub enum BatchError {
    /// Directory or store read failed.
    Read(RepoError),
    /// A store write failed after `completed` writes had been applied.
    Write { completed: usize, source: RepoError },
}

impl Display for BatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "read failed: {err}"),
            Self::Write { completed, source } => write!(
                f,
                "write failed after {completed} completed writes (not rolled back): {source}"
            ),
        }
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

//! Retention Status Resolver.
//!
//! # Responsibility
//! - Resolve every document's target status/deletion date for a given day.
//! - Persist only rows whose stored pair differs from the target.
//!
//! # Invariants
//! - `today` is supplied by the caller; the same inputs on the same day
//!   yield zero writes on a second pass.
//! - Classification is not stable across days: `started` rows turn
//!   `expired` once `today` passes their deletion date.

use super::report::{RetentionReport, RunClock, StatusCounts};
use super::BatchError;
use crate::model::document::RetentionTarget;
use crate::repo::document_repo::DocumentStore;
use crate::repo::employee_repo::EmployeeDirectory;
use crate::retention::{format_date, resolve_target, EmployeeIndex};
use chrono::NaiveDate;
use log::{debug, error, info};
use serde::Serialize;

/// One pending retention write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionUpdate {
    pub d_id: String,
    pub from_status: String,
    pub from_deletion: Option<String>,
    pub to: RetentionTarget,
}

/// Resolution of every document for one day, before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionPlan {
    pub today: NaiveDate,
    pub documents_scanned: usize,
    /// Final statuses over all scanned documents, unchanged rows included.
    pub status_counts: StatusCounts,
    pub updates: Vec<RetentionUpdate>,
}

/// Batch service deriving retention status and deletion dates.
pub struct RetentionService<E: EmployeeDirectory, D: DocumentStore> {
    directory: E,
    store: D,
}

impl<E: EmployeeDirectory, D: DocumentStore> RetentionService<E, D> {
    pub fn new(directory: E, store: D) -> Self {
        Self { directory, store }
    }

    /// Resolves all documents against `today` without writing.
    pub fn plan(&self, today: NaiveDate) -> Result<RetentionPlan, BatchError> {
        let employees = self.directory.list_employees().map_err(BatchError::Read)?;
        let documents = self.store.list_documents().map_err(BatchError::Read)?;
        let index = EmployeeIndex::new(&employees);

        let mut status_counts = StatusCounts::default();
        let mut updates = Vec::new();
        for document in documents.iter() {
            let target = resolve_target(document, &index, today);
            status_counts.record(target.status);
            if target.differs_from(document) {
                updates.push(RetentionUpdate {
                    d_id: document.d_id.clone(),
                    from_status: document.d_r_status.clone(),
                    from_deletion: document.d_r_deletion.clone(),
                    to: target,
                });
            }
        }

        Ok(RetentionPlan {
            today,
            documents_scanned: documents.len(),
            status_counts,
            updates,
        })
    }

    /// Runs one resolver pass for `today` and reports the outcome.
    ///
    /// # Errors
    /// - `BatchError::Read` before any write when loading fails.
    /// - `BatchError::Write` on the first failed row; prior rows stay written.
    pub fn run(&self, today: NaiveDate) -> Result<RetentionReport, BatchError> {
        let clock = RunClock::start();
        info!(
            "event=retention_run module=service status=start today={}",
            format_date(today)
        );

        let result = self.run_inner(today, clock);
        if let Err(err) = &result {
            error!("event=retention_run module=service status=error error={}", err);
        }
        result
    }

    fn run_inner(&self, today: NaiveDate, clock: RunClock) -> Result<RetentionReport, BatchError> {
        let plan = self.plan(today)?;

        let mut completed = 0;
        for update in &plan.updates {
            self.store
                .update_document_retention(&update.d_id, &update.to)
                .map_err(|source| BatchError::Write { completed, source })?;
            debug!(
                "event=retention_update module=service status=ok from={} to={}",
                update.from_status,
                update.to.status.as_str()
            );
            completed += 1;
        }

        let report = RetentionReport {
            today: format_date(today),
            documents_scanned: plan.documents_scanned,
            documents_updated: completed,
            status_counts: plan.status_counts,
            timing: clock.finish(),
        };
        info!(
            "event=retention_run module=service status=ok scanned={} updated={} expired={} duration_ms={}",
            report.documents_scanned,
            report.documents_updated,
            report.status_counts.expired,
            report.timing.elapsed_ms
        );
        Ok(report)
    }
}

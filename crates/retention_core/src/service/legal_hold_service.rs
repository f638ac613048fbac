//! Legal Hold Propagator.
//!
//! # Responsibility
//! - Keep each document's cached `e_lhold` in line with its employee's flag.
//! - Report hold distribution before/after and the number of flips.
//!
//! # Invariants
//! - Documents whose `e_id` matches no employee are never touched.
//! - Each store call carries at most `HOLD_BATCH_LIMIT` identifiers.
//! - The Employee Directory is never written.

use super::report::{LegalHoldReport, RunClock};
use super::BatchError;
use crate::model::document::Document;
use crate::repo::document_repo::DocumentStore;
use crate::repo::employee_repo::EmployeeDirectory;
use crate::repo::HOLD_BATCH_LIMIT;
use crate::retention::EmployeeIndex;
use log::{error, info};
use serde::Serialize;

/// Documents whose cached hold flag disagrees with their employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegalHoldPlan {
    /// Document not held, employee held.
    pub activate: Vec<String>,
    /// Document held, employee not held.
    pub remove: Vec<String>,
    pub employees_on_hold: usize,
    pub employees_not_on_hold: usize,
}

impl LegalHoldPlan {
    pub fn is_empty(&self) -> bool {
        self.activate.is_empty() && self.remove.is_empty()
    }
}

/// Batch service propagating employee legal holds onto documents.
pub struct LegalHoldService<E: EmployeeDirectory, D: DocumentStore> {
    directory: E,
    store: D,
    batch_size: usize,
}

impl<E: EmployeeDirectory, D: DocumentStore> LegalHoldService<E, D> {
    pub fn new(directory: E, store: D) -> Self {
        Self {
            directory,
            store,
            batch_size: HOLD_BATCH_LIMIT,
        }
    }

    /// Overrides the per-call id count. Clamped to `1..=HOLD_BATCH_LIMIT`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, HOLD_BATCH_LIMIT);
        self
    }

    /// Computes the flips a run would apply, without writing.
    pub fn plan(&self) -> Result<LegalHoldPlan, BatchError> {
        let employees = self.directory.list_employees().map_err(BatchError::Read)?;
        let documents = self.store.list_documents().map_err(BatchError::Read)?;
        let index = EmployeeIndex::new(&employees);

        let mut plan = LegalHoldPlan {
            employees_on_hold: employees.iter().filter(|e| e.e_lhold).count(),
            ..LegalHoldPlan::default()
        };
        plan.employees_not_on_hold = employees.len() - plan.employees_on_hold;

        for document in &documents {
            let Some(employee) = index.owner_of(document) else {
                continue;
            };
            match (document.e_lhold, employee.e_lhold) {
                (false, true) => plan.activate.push(document.d_id.clone()),
                (true, false) => plan.remove.push(document.d_id.clone()),
                _ => {}
            }
        }

        Ok(plan)
    }

    /// Runs one propagation pass and reports the resulting counts.
    ///
    /// # Errors
    /// - `BatchError::Read` when loading employees/documents fails, including
    ///   the post-write recount.
    /// - `BatchError::Write` when a batch fails; earlier batches stay applied.
    pub fn run(&self) -> Result<LegalHoldReport, BatchError> {
        let clock = RunClock::start();
        info!("event=legal_hold_run module=service status=start");

        let result = self.run_inner(clock);
        if let Err(err) = &result {
            error!(
                "event=legal_hold_run module=service status=error error={}",
                err
            );
        }
        result
    }

    fn run_inner(&self, clock: RunClock) -> Result<LegalHoldReport, BatchError> {
        let plan = self.plan()?;
        info!(
            "event=legal_hold_plan module=service status=ok activate={} remove={}",
            plan.activate.len(),
            plan.remove.len()
        );

        let mut completed = 0;
        self.apply(&plan.activate, true, &mut completed)?;
        self.apply(&plan.remove, false, &mut completed)?;

        let documents = self.store.list_documents().map_err(BatchError::Read)?;
        let documents_on_hold = count_on_hold(&documents);

        let report = LegalHoldReport {
            employees_on_hold: plan.employees_on_hold,
            employees_not_on_hold: plan.employees_not_on_hold,
            documents_on_hold,
            documents_not_on_hold: documents.len() - documents_on_hold,
            activated: plan.activate.len(),
            removed: plan.remove.len(),
            timing: clock.finish(),
        };
        info!(
            "event=legal_hold_run module=service status=ok activated={} removed={} documents_on_hold={} duration_ms={}",
            report.activated, report.removed, report.documents_on_hold, report.timing.elapsed_ms
        );
        Ok(report)
    }

    fn apply(
        &self,
        ids: &[String],
        e_lhold: bool,
        completed: &mut usize,
    ) -> Result<(), BatchError> {
        for chunk in ids.chunks(self.batch_size) {
            self.store
                .update_document_hold(chunk, e_lhold)
                .map_err(|source| BatchError::Write {
                    completed: *completed,
                    source,
                })?;
            *completed += chunk.len();
        }
        Ok(())
    }
}

fn count_on_hold(documents: &[Document]) -> usize {
    documents.iter().filter(|document| document.e_lhold).count()
}

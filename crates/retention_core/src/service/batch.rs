//! Combined maintenance pass: hold propagation, then retention resolution.

use super::legal_hold_service::LegalHoldService;
use super::report::{LegalHoldReport, RetentionReport};
use super::retention_service::RetentionService;
use super::BatchError;
use crate::repo::document_repo::DocumentStore;
use crate::repo::employee_repo::EmployeeDirectory;
use chrono::NaiveDate;
use serde::Serialize;

/// Reports of both runs of a combined pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    pub legal_hold: LegalHoldReport,
    pub retention: RetentionReport,
}

/// Runs the Legal Hold Propagator, then the Retention Status Resolver.
///
/// The resolver reads the hold flags the propagator just wrote. A failure in
/// either run aborts the pass and no report is returned.
pub fn run_all<E, D>(
    directory: &E,
    store: &D,
    today: NaiveDate,
    hold_batch_size: usize,
) -> Result<MaintenanceReport, BatchError>
where
    E: EmployeeDirectory,
    D: DocumentStore,
{
    let legal_hold = LegalHoldService::new(directory, store)
        .with_batch_size(hold_batch_size)
        .run()?;
    let retention = RetentionService::new(directory, store).run(today)?;
    Ok(MaintenanceReport {
        legal_hold,
        retention,
    })
}

//! Retention and legal-hold resolution for the document-management console.
//! This crate owns the rules deciding when a document becomes deletable.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod retention;
pub mod service;

pub use config::{ConfigError, RetentionConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, RetentionStatus, RetentionTarget, Trigger};
pub use model::employee::Employee;
pub use model::ModelValidationError;
pub use repo::document_repo::{DocumentStore, SqliteDocumentRepository};
pub use repo::employee_repo::{EmployeeDirectory, SqliteEmployeeRepository};
pub use repo::{RepoError, RepoResult, HOLD_BATCH_LIMIT};
pub use retention::{add_calendar_months, parse_date, resolve_target, EmployeeIndex};
pub use service::batch::{run_all, MaintenanceReport};
pub use service::legal_hold_service::{LegalHoldPlan, LegalHoldService};
pub use service::report::{LegalHoldReport, RetentionReport, RunTiming, StatusCounts};
pub use service::retention_service::{RetentionPlan, RetentionService, RetentionUpdate};
pub use service::BatchError;

/// Minimal health-check API for wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

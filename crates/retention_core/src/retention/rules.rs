//! Per-document retention resolution.
//!
//! Every document is resolved from scratch on each run:
//!
//! 1. `e_lhold` set: `legal hold`, no deletion date. Nothing else is read.
//! 2. Trigger blank or month offset unusable: `not started`.
//! 3. `Termination`: clock starts at the employee's `e_tdate`, only once the
//!    employee is terminated.
//! 4. `Cassation Date`: clock starts at the document's own `d_date`.
//! 5. Any other trigger: `not started`.
//!
//! Where a clock has started, the deletion date is the base date plus
//! `d_r_month` calendar months. The status is `expired` when that date is
//! strictly before `today`, `started` otherwise.

use super::calendar::{add_calendar_months, parse_date};
use crate::model::document::{Document, RetentionStatus, RetentionTarget, Trigger};
use crate::model::employee::Employee;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Employee lookup by `e_id`, borrowed from one directory snapshot.
#[derive(Debug, Default)]
pub struct EmployeeIndex<'a> {
    by_id: HashMap<&'a str, &'a Employee>,
}

impl<'a> EmployeeIndex<'a> {
    pub fn new(employees: &'a [Employee]) -> Self {
        let by_id = employees
            .iter()
            .map(|employee| (employee.e_id.as_str(), employee))
            .collect();
        Self { by_id }
    }

    /// Returns the employee a document belongs to, if any.
    pub fn owner_of(&self, document: &Document) -> Option<&'a Employee> {
        let e_id = document.e_id.as_deref()?;
        self.by_id.get(e_id).copied()
    }
}

/// Computes the `(status, deletion)` pair a document should carry on `today`.
pub fn resolve_target(
    document: &Document,
    employees: &EmployeeIndex<'_>,
    today: NaiveDate,
) -> RetentionTarget {
    if document.e_lhold {
        return RetentionTarget::legal_hold();
    }

    let Some(trigger) = document.trigger() else {
        return RetentionTarget::not_started();
    };
    let Some(months) = usable_months(document.d_r_month) else {
        return RetentionTarget::not_started();
    };

    let base = match trigger {
        Trigger::Termination => employees
            .owner_of(document)
            .filter(|employee| employee.is_terminated())
            .and_then(|employee| employee.e_tdate.as_deref())
            .and_then(parse_date),
        Trigger::CassationDate => document.d_date.as_deref().and_then(parse_date),
        Trigger::Unknown(_) => None,
    };

    match base.and_then(|base| add_calendar_months(base, months)) {
        Some(deletion) => started_or_expired(deletion, today),
        None => RetentionTarget::not_started(),
    }
}

fn usable_months(raw: Option<i64>) -> Option<u32> {
    u32::try_from(raw?).ok()
}

fn started_or_expired(deletion: NaiveDate, today: NaiveDate) -> RetentionTarget {
    let status = if deletion < today {
        RetentionStatus::Expired
    } else {
        RetentionStatus::Started
    };
    RetentionTarget {
        status,
        deletion: Some(deletion),
    }
}

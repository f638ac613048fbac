//! Operator-facing run reports.
//!
//! Reports are plain serializable records. `render_text` produces the
//! labeled list shown to operators; JSON comes from `serde`.

use crate::model::document::RetentionStatus;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::time::Instant;

/// Wall-clock and monotonic markers for one run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunClock {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl RunClock {
    pub(crate) fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub(crate) fn finish(self) -> RunTiming {
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        RunTiming {
            started_at: rfc3339(self.started_at),
            finished_at: rfc3339(Utc::now()),
            elapsed_ms,
        }
    }
}

fn rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Start/end timestamps (RFC 3339, UTC) and elapsed milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunTiming {
    pub started_at: String,
    pub finished_at: String,
    pub elapsed_ms: u64,
}

/// Result of one Legal Hold Propagator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalHoldReport {
    pub employees_on_hold: usize,
    pub employees_not_on_hold: usize,
    /// Recounted after the writes.
    pub documents_on_hold: usize,
    pub documents_not_on_hold: usize,
    pub activated: usize,
    pub removed: usize,
    #[serde(flatten)]
    pub timing: RunTiming,
}

impl LegalHoldReport {
    pub fn render_text(&self) -> String {
        let mut out = String::from("Legal hold batch\n");
        push_line(&mut out, "Employees on legal hold", self.employees_on_hold);
        push_line(&mut out, "Employees not on legal hold", self.employees_not_on_hold);
        push_line(&mut out, "Documents on legal hold", self.documents_on_hold);
        push_line(&mut out, "Documents not on legal hold", self.documents_not_on_hold);
        push_line(&mut out, "Legal hold activated", self.activated);
        push_line(&mut out, "Legal hold removed", self.removed);
        push_timing(&mut out, &self.timing);
        out
    }
}

/// Final status distribution over all scanned documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub not_set: usize,
    pub not_started: usize,
    pub started: usize,
    pub legal_hold: usize,
    pub expired: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: RetentionStatus) {
        let slot = match status {
            RetentionStatus::NotSet => &mut self.not_set,
            RetentionStatus::NotStarted => &mut self.not_started,
            RetentionStatus::Started => &mut self.started,
            RetentionStatus::LegalHold => &mut self.legal_hold,
            RetentionStatus::Expired => &mut self.expired,
        };
        *slot += 1;
    }

    pub fn get(&self, status: RetentionStatus) -> usize {
        match status {
            RetentionStatus::NotSet => self.not_set,
            RetentionStatus::NotStarted => self.not_started,
            RetentionStatus::Started => self.started,
            RetentionStatus::LegalHold => self.legal_hold,
            RetentionStatus::Expired => self.expired,
        }
    }
}

/// Result of one Retention Status Resolver run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionReport {
    /// ISO date the run classified against.
    pub today: String,
    pub documents_scanned: usize,
    pub documents_updated: usize,
    pub status_counts: StatusCounts,
    #[serde(flatten)]
    pub timing: RunTiming,
}

impl RetentionReport {
    pub fn render_text(&self) -> String {
        let mut out = String::from("Retention status batch\n");
        push_line(&mut out, "Run date", &self.today);
        push_line(&mut out, "Documents scanned", self.documents_scanned);
        push_line(&mut out, "Documents updated", self.documents_updated);
        for status in RetentionStatus::ALL {
            push_line(
                &mut out,
                &format!("Status `{}`", status.as_str()),
                self.status_counts.get(status),
            );
        }
        push_timing(&mut out, &self.timing);
        out
    }
}

fn push_line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("  {label:<30} {value}\n"));
}

fn push_timing(out: &mut String, timing: &RunTiming) {
    push_line(out, "Started at", &timing.started_at);
    push_line(out, "Finished at", &timing.finished_at);
    push_line(out, "Elapsed (ms)", timing.elapsed_ms);
}

//! Document record, retention status labels and trigger kinds.
//!
//! # Invariants
//! - `d_r_status` is stored as free text so legacy values survive reads;
//!   [`RetentionStatus`] covers the canonical labels.
//! - `d_r_deletion`, when set by the resolver, is an ISO `YYYY-MM-DD` date.

use super::ModelValidationError;
use crate::retention::calendar::format_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical retention lifecycle label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetentionStatus {
    /// Legacy/transient value. Never produced by the resolver.
    #[serde(rename = "not set")]
    NotSet,
    #[serde(rename = "not started")]
    NotStarted,
    #[serde(rename = "started")]
    Started,
    #[serde(rename = "legal hold")]
    LegalHold,
    #[serde(rename = "expired")]
    Expired,
}

impl RetentionStatus {
    pub const ALL: [RetentionStatus; 5] = [
        RetentionStatus::NotSet,
        RetentionStatus::NotStarted,
        RetentionStatus::Started,
        RetentionStatus::LegalHold,
        RetentionStatus::Expired,
    ];

    /// Label persisted in `documents.d_r_status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSet => "not set",
            Self::NotStarted => "not started",
            Self::Started => "started",
            Self::LegalHold => "legal hold",
            Self::Expired => "expired",
        }
    }

    /// Parses an exact persisted label. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
    }
}

/// Event kind that starts a document's retention countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Clock starts at the employee termination date.
    Termination,
    /// Clock starts at the document's own `d_date`.
    CassationDate,
    /// Non-empty value no rule understands.
    Unknown(String),
}

impl Trigger {
    /// Normalizes a raw `d_r_trigger` value (trimmed, case-insensitive).
    ///
    /// Returns `None` when the value is missing or blank.
    pub fn from_raw(raw: Option<&str>) -> Option<Self> {
        let normalized = raw?.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" => None,
            "termination" => Some(Self::Termination),
            "cassation date" => Some(Self::CassationDate),
            _ => Some(Self::Unknown(normalized)),
        }
    }
}

/// Resolver output for one document: the `(d_r_status, d_r_deletion)` pair
/// that should be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionTarget {
    pub status: RetentionStatus,
    pub deletion: Option<NaiveDate>,
}

impl RetentionTarget {
    pub fn legal_hold() -> Self {
        Self {
            status: RetentionStatus::LegalHold,
            deletion: None,
        }
    }

    pub fn not_started() -> Self {
        Self {
            status: RetentionStatus::NotStarted,
            deletion: None,
        }
    }

    /// ISO `YYYY-MM-DD` form of the deletion date, as persisted.
    pub fn deletion_text(&self) -> Option<String> {
        self.deletion.map(format_date)
    }

    /// Returns whether persisting this target would change the stored row.
    ///
    /// Compares status labels verbatim and deletion dates as strings, with
    /// `""` standing in for null on both sides.
    pub fn differs_from(&self, document: &Document) -> bool {
        let stored_deletion = document.d_r_deletion.as_deref().unwrap_or("");
        let target_deletion = self.deletion_text().unwrap_or_default();
        document.d_r_status != self.status.as_str() || stored_deletion != target_deletion
    }
}

/// Document row as held by the Document Store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub d_id: String,
    /// Owning employee; may be absent or reference nobody.
    pub e_id: Option<String>,
    /// Denormalized copy of the employee legal-hold flag.
    pub e_lhold: bool,
    /// Creation/add timestamp.
    pub d_date: Option<String>,
    pub d_r_trigger: Option<String>,
    /// Opaque rule label. Never interpreted by the resolver.
    pub d_r_rule: Option<String>,
    pub d_r_month: Option<i64>,
    pub d_r_deletion: Option<String>,
    pub d_r_status: String,
}

impl Document {
    /// Creates a document in its ingestion state: `not started`, no
    /// deletion date, no hold.
    pub fn new(d_id: impl Into<String>) -> Self {
        Self {
            d_id: d_id.into(),
            e_id: None,
            e_lhold: false,
            d_date: None,
            d_r_trigger: None,
            d_r_rule: None,
            d_r_month: None,
            d_r_deletion: None,
            d_r_status: RetentionStatus::NotStarted.as_str().to_string(),
        }
    }

    /// Sets the owning employee.
    pub fn owned_by(mut self, e_id: impl Into<String>) -> Self {
        self.e_id = Some(e_id.into());
        self
    }

    /// Copies retention rule fields, as done at creation time.
    pub fn with_rule(
        mut self,
        trigger: impl Into<String>,
        rule: impl Into<String>,
        months: i64,
    ) -> Self {
        self.d_r_trigger = Some(trigger.into());
        self.d_r_rule = Some(rule.into());
        self.d_r_month = Some(months);
        self
    }

    pub fn trigger(&self) -> Option<Trigger> {
        Trigger::from_raw(self.d_r_trigger.as_deref())
    }

    /// Validates identity only. Retention fields are validated lazily by the
    /// resolver, which falls back instead of failing.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.d_id.trim().is_empty() {
            return Err(ModelValidationError::EmptyId("d_id"));
        }
        Ok(())
    }
}

//! Response payloads that summarise what an operation did, as opposed to the
//! records themselves (see `model`).

use crate::model::identity::Role;
use crate::model::mentor::{Mentor, MentorInfo};
use crate::model::student::Student;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// One human-readable line of an operation report, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl ReportMessage {
    pub fn success(text: impl Into<String>) -> Self {
        ReportMessage {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        ReportMessage {
            level: MessageLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ReportMessage {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

/// Per-outcome counters of one reconciliation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BatchCounts {
    pub identities_created: usize,
    pub identities_updated: usize,
    pub records_linked: usize,
    pub records_updated: usize,
    pub records_created: usize,
    pub errors: usize,
}

/// A failed row. `row` is 1-based, counted over data rows only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowErrorView {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadReport {
    pub batch_id: i64,
    pub counts: BatchCounts,
    pub errors: Vec<RowErrorView>,
    pub messages: Vec<ReportMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletionReport {
    pub message: String,
    pub identities_deleted: usize,
    pub records_unlinked: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub username: String,
    pub messages: Vec<ReportMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentDashboard {
    pub student: Student,
    pub mentor: Option<MentorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorDashboard {
    pub mentor: Mentor,
    pub students: Vec<Student>,
}

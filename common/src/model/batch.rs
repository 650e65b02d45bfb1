use serde::{Deserialize, Serialize};

/// Which domain records an uploaded CSV provisions accounts for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    Students,
    Mentors,
}

impl BatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchKind::Students => "students",
            BatchKind::Mentors => "mentors",
        }
    }

    pub fn parse(value: &str) -> Option<BatchKind> {
        match value {
            "students" => Some(BatchKind::Students),
            "mentors" => Some(BatchKind::Mentors),
            _ => None,
        }
    }

    /// Singular noun used in report lines ("student records", "mentor records").
    pub fn record_noun(&self) -> &'static str {
        match self {
            BatchKind::Students => "student",
            BatchKind::Mentors => "mentor",
        }
    }
}

/// One stored upload, as listed to administrators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub id: i64,
    pub kind: BatchKind,
    pub file_name: String,
    pub content_md5: String,
    pub uploaded_at: String,
    pub processed: bool,
    pub associated_count: usize,
}

/// A stored upload with its raw content, kept for audit and replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchDetail {
    #[serde(flatten)]
    pub summary: BatchSummary,
    pub content: String,
    pub associated_usernames: Vec<String>,
}

use serde::{Deserialize, Serialize};

/// Progress of a student's internship search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InternshipStatus {
    #[default]
    NotStarted,
    Applied,
    Shortlisted,
    Accepted,
    Completed,
    Rejected,
}

impl InternshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternshipStatus::NotStarted => "NOT_STARTED",
            InternshipStatus::Applied => "APPLIED",
            InternshipStatus::Shortlisted => "SHORTLISTED",
            InternshipStatus::Accepted => "ACCEPTED",
            InternshipStatus::Completed => "COMPLETED",
            InternshipStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<InternshipStatus> {
        match value {
            "NOT_STARTED" => Some(InternshipStatus::NotStarted),
            "APPLIED" => Some(InternshipStatus::Applied),
            "SHORTLISTED" => Some(InternshipStatus::Shortlisted),
            "ACCEPTED" => Some(InternshipStatus::Accepted),
            "COMPLETED" => Some(InternshipStatus::Completed),
            "REJECTED" => Some(InternshipStatus::Rejected),
            _ => None,
        }
    }

    /// Statuses for which company and role must be filled in.
    pub fn requires_details(&self) -> bool {
        matches!(
            self,
            InternshipStatus::Shortlisted | InternshipStatus::Accepted | InternshipStatus::Completed
        )
    }
}

/// Self-service part of a student record. Everything here is optional until
/// the student fills in the registration form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StudentProfile {
    pub address: Option<String>,
    pub phone_no_student: Option<String>,
    pub phone_no_mother: Option<String>,
    pub phone_no_father: Option<String>,
    pub branch: Option<String>,
    pub division: Option<String>,
    /// `YYYY-MM-DD`.
    pub dob: Option<String>,
    pub marks_10th: Option<f64>,
    pub marks_12th: Option<f64>,
    pub jee_score: Option<f64>,
    pub cet_score: Option<f64>,
    #[serde(default)]
    pub internship_status: InternshipStatus,
    pub internship_company: Option<String>,
    pub internship_role: Option<String>,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub achievements: String,
    #[serde(default)]
    pub extracurricular: String,
    #[serde(default)]
    pub suggestions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    /// Natural key (`123A1234`), also the login handle of the linked identity.
    pub roll_number: String,
    pub name: String,
    pub email_id: String,
    pub identity_id: Option<i64>,
    /// Natural key of the assigned mentor.
    pub mentor_id: Option<String>,
    #[serde(flatten)]
    pub profile: StudentProfile,
}

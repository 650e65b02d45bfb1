use crate::model::academics::Assessment;
use crate::model::student::StudentProfile;
use serde::Deserialize;

/// Credentials posted to `/api/auth/login/{role}`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub email_id: String,
    pub mentor_id: Option<String>,
}

/// Administrative edit of a student. Absent fields are left untouched.
#[derive(Deserialize, Default)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email_id: Option<String>,
    pub mentor_id: Option<String>,
}

/// The registration form a student fills in about themselves.
#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    #[serde(flatten)]
    pub profile: StudentProfile,
}

#[derive(Deserialize)]
pub struct NewMentor {
    pub mentor_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, Default)]
pub struct MentorUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

#[derive(Deserialize)]
pub struct SubjectPayload {
    pub subject_code: String,
    pub name: String,
    pub semester: u32,
    pub branch: String,
    #[serde(default)]
    pub is_elective: bool,
}

#[derive(Deserialize)]
pub struct MarkPayload {
    pub roll_number: String,
    pub subject_code: String,
    pub semester: u32,
    pub assessment: Assessment,
    pub marks_obtained: Option<f64>,
}

#[derive(Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub semester: u32,
    #[serde(default)]
    pub technologies: String,
    pub repository_link: Option<String>,
}

#[derive(Deserialize)]
pub struct GradeRequest {
    pub grade: String,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mentor {
    /// Natural key, also the login handle of the linked identity.
    pub mentor_id: String,
    pub name: String,
    pub email: String,
    pub identity_id: Option<i64>,
}

/// The slice of a mentor shown to one of their students.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Mentor> for MentorInfo {
    fn from(mentor: &Mentor) -> Self {
        MentorInfo {
            id: mentor.mentor_id.clone(),
            name: mentor.name.clone(),
            email: mentor.email.clone(),
        }
    }
}

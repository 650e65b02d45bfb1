use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub subject_code: String,
    pub name: String,
    pub semester: u32,
    pub branch: String,
    pub is_elective: bool,
}

/// The three graded components of a subject in a semester.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Assessment {
    Ia1,
    Ia2,
    EndSem,
}

impl Assessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::Ia1 => "IA1",
            Assessment::Ia2 => "IA2",
            Assessment::EndSem => "END_SEM",
        }
    }

    pub fn parse(value: &str) -> Option<Assessment> {
        match value {
            "IA1" => Some(Assessment::Ia1),
            "IA2" => Some(Assessment::Ia2),
            "END_SEM" => Some(Assessment::EndSem),
            _ => None,
        }
    }

    pub fn max_marks(&self) -> f64 {
        match self {
            Assessment::Ia1 | Assessment::Ia2 => 20.0,
            Assessment::EndSem => 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mark {
    pub roll_number: String,
    pub subject_code: String,
    pub semester: u32,
    pub assessment: Assessment,
    pub max_marks: f64,
    pub marks_obtained: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub roll_number: String,
    pub title: String,
    pub description: String,
    pub semester: u32,
    pub technologies: String,
    pub repository_link: Option<String>,
    pub grade: Option<String>,
}

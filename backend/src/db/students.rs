use common::model::student::{InternshipStatus, Student, StudentProfile};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Display name given to students created by a CSV upload before they fill
/// in their own profile.
pub const PLACEHOLDER_NAME: &str = "Unregistered Student";

const COLUMNS: &str = "roll_number, name, email_id, identity_id, mentor_id, address, \
    phone_no_student, phone_no_mother, phone_no_father, branch, division, dob, \
    marks_10th, marks_12th, jee_score, cet_score, internship_status, internship_company, \
    internship_role, goals, strengths, weaknesses, achievements, extracurricular, suggestions";

fn from_row(row: &Row) -> rusqlite::Result<Student> {
    let status: String = row.get(16)?;
    Ok(Student {
        roll_number: row.get(0)?,
        name: row.get(1)?,
        email_id: row.get(2)?,
        identity_id: row.get(3)?,
        mentor_id: row.get(4)?,
        profile: StudentProfile {
            address: row.get(5)?,
            phone_no_student: row.get(6)?,
            phone_no_mother: row.get(7)?,
            phone_no_father: row.get(8)?,
            branch: row.get(9)?,
            division: row.get(10)?,
            dob: row.get(11)?,
            marks_10th: row.get(12)?,
            marks_12th: row.get(13)?,
            jee_score: row.get(14)?,
            cet_score: row.get(15)?,
            internship_status: InternshipStatus::parse(&status).unwrap_or_default(),
            internship_company: row.get(17)?,
            internship_role: row.get(18)?,
            goals: row.get(19)?,
            strengths: row.get(20)?,
            weaknesses: row.get(21)?,
            achievements: row.get(22)?,
            extracurricular: row.get(23)?,
            suggestions: row.get(24)?,
        },
    })
}

pub fn find(conn: &Connection, roll_number: &str) -> rusqlite::Result<Option<Student>> {
    conn.query_row(
        &format!("SELECT {} FROM students WHERE roll_number = ?1", COLUMNS),
        params![roll_number],
        from_row,
    )
    .optional()
}

pub fn find_by_identity(conn: &Connection, identity_id: i64) -> rusqlite::Result<Option<Student>> {
    conn.query_row(
        &format!("SELECT {} FROM students WHERE identity_id = ?1", COLUMNS),
        params![identity_id],
        from_row,
    )
    .optional()
}

pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Student>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM students ORDER BY roll_number",
        COLUMNS
    ))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn list_by_mentor(conn: &Connection, mentor_id: &str) -> rusqlite::Result<Vec<Student>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM students WHERE mentor_id = ?1 ORDER BY roll_number",
        COLUMNS
    ))?;
    let rows = stmt.query_map(params![mentor_id], from_row)?;
    rows.collect()
}

pub fn insert(
    conn: &Connection,
    roll_number: &str,
    name: &str,
    email_id: &str,
    identity_id: Option<i64>,
    mentor_id: Option<&str>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO students (roll_number, name, email_id, identity_id, mentor_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![roll_number, name, email_id, identity_id, mentor_id],
    )?;
    Ok(())
}

pub fn set_identity(
    conn: &Connection,
    roll_number: &str,
    identity_id: Option<i64>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE students SET identity_id = ?1 WHERE roll_number = ?2",
        params![identity_id, roll_number],
    )
}

pub fn set_email(conn: &Connection, roll_number: &str, email_id: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE students SET email_id = ?1 WHERE roll_number = ?2",
        params![email_id, roll_number],
    )
}

pub fn set_name(conn: &Connection, roll_number: &str, name: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE students SET name = ?1 WHERE roll_number = ?2",
        params![name, roll_number],
    )
}

pub fn set_mentor(
    conn: &Connection,
    roll_number: &str,
    mentor_id: Option<&str>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE students SET mentor_id = ?1 WHERE roll_number = ?2",
        params![mentor_id, roll_number],
    )
}

/// Clears the identity reference of whichever student holds `identity_id`.
pub fn unlink_identity(conn: &Connection, identity_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE students SET identity_id = NULL WHERE identity_id = ?1",
        params![identity_id],
    )
}

pub fn update_profile(
    conn: &Connection,
    roll_number: &str,
    name: &str,
    profile: &StudentProfile,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE students SET name = ?1, address = ?2, phone_no_student = ?3,
            phone_no_mother = ?4, phone_no_father = ?5, branch = ?6, division = ?7, dob = ?8,
            marks_10th = ?9, marks_12th = ?10, jee_score = ?11, cet_score = ?12,
            internship_status = ?13, internship_company = ?14, internship_role = ?15,
            goals = ?16, strengths = ?17, weaknesses = ?18, achievements = ?19,
            extracurricular = ?20, suggestions = ?21
         WHERE roll_number = ?22",
        params![
            name,
            profile.address,
            profile.phone_no_student,
            profile.phone_no_mother,
            profile.phone_no_father,
            profile.branch,
            profile.division,
            profile.dob,
            profile.marks_10th,
            profile.marks_12th,
            profile.jee_score,
            profile.cet_score,
            profile.internship_status.as_str(),
            profile.internship_company,
            profile.internship_role,
            profile.goals,
            profile.strengths,
            profile.weaknesses,
            profile.achievements,
            profile.extracurricular,
            profile.suggestions,
            roll_number,
        ],
    )
}

pub fn delete(conn: &Connection, roll_number: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM students WHERE roll_number = ?1",
        params![roll_number],
    )
}

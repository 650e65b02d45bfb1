//! Record-level checks that go beyond a role: which student record a session
//! owns, and whether a mentor is assigned to a given student.

use crate::db::{mentors, students};
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Policy};
use crate::session::Session;
use common::model::mentor::Mentor;
use common::model::student::Student;
use rusqlite::Connection;

/// The student record linked to the caller's identity.
pub(crate) fn own_student(conn: &Connection, session: &Session) -> AppResult<Student> {
    students::find_by_identity(conn, session.identity_id)?.ok_or_else(|| {
        AppError::NotFound("No student record is linked to your account.".to_string())
    })
}

/// The mentor record linked to the caller's identity.
pub(crate) fn own_mentor(conn: &Connection, session: &Session) -> AppResult<Mentor> {
    mentors::find_by_identity(conn, session.identity_id)?.ok_or_else(|| {
        AppError::NotFound("No mentor record is linked to your account.".to_string())
    })
}

/// The student `roll_number`, provided it is assigned to `mentor`.
pub(crate) fn assigned_student(conn: &Connection, mentor: &Mentor, roll_number: &str) -> AppResult<Student> {
    let student = students::find(conn, roll_number)?
        .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))?;
    if student.mentor_id.as_deref() != Some(mentor.mentor_id.as_str()) {
        return Err(AppError::Forbidden(
            "This student is not assigned to you.".to_string(),
        ));
    }
    Ok(student)
}

/// Admins may act on any student; mentors only on their own.
pub(crate) fn managed_student(conn: &Connection, session: &Session, roll_number: &str) -> AppResult<Student> {
    if AdminOnly::permits(session, conn)? {
        return students::find(conn, roll_number)?
            .ok_or_else(|| AppError::NotFound("Student not found.".to_string()));
    }
    let mentor = mentors::find_by_identity(conn, session.identity_id)?.ok_or_else(|| {
        AppError::Forbidden("You don't have permission to perform this action.".to_string())
    })?;
    assigned_student(conn, &mentor, roll_number)
}

//! Subjects, per-assessment marks and student projects.

use common::model::academics::{Assessment, Mark, Project, Subject};
use common::requests::{MarkPayload, NewProject, SubjectPayload};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn subject_from_row(row: &Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        subject_code: row.get(1)?,
        name: row.get(2)?,
        semester: row.get(3)?,
        branch: row.get(4)?,
        is_elective: row.get::<_, i64>(5)? != 0,
    })
}

pub fn list_subjects(conn: &Connection) -> rusqlite::Result<Vec<Subject>> {
    let mut stmt = conn.prepare(
        "SELECT id, subject_code, name, semester, branch, is_elective
         FROM subjects ORDER BY semester, subject_code",
    )?;
    let rows = stmt.query_map([], subject_from_row)?;
    rows.collect()
}

pub fn find_subject(conn: &Connection, subject_code: &str) -> rusqlite::Result<Option<Subject>> {
    conn.query_row(
        "SELECT id, subject_code, name, semester, branch, is_elective
         FROM subjects WHERE subject_code = ?1",
        params![subject_code],
        subject_from_row,
    )
    .optional()
}

pub fn insert_subject(conn: &Connection, subject: &SubjectPayload) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO subjects (subject_code, name, semester, branch, is_elective)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            subject.subject_code,
            subject.name,
            subject.semester,
            subject.branch,
            subject.is_elective as i64
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Updates everything but the code, which is the subject's natural key.
pub fn update_subject(
    conn: &Connection,
    subject_code: &str,
    subject: &SubjectPayload,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE subjects SET name = ?1, semester = ?2, branch = ?3, is_elective = ?4
         WHERE subject_code = ?5",
        params![
            subject.name,
            subject.semester,
            subject.branch,
            subject.is_elective as i64,
            subject_code
        ],
    )
}

pub fn delete_subject(conn: &Connection, subject_code: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM subjects WHERE subject_code = ?1",
        params![subject_code],
    )
}

fn mark_from_row(row: &Row) -> rusqlite::Result<Mark> {
    let assessment: String = row.get(3)?;
    let assessment = Assessment::parse(&assessment).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown assessment '{}'", assessment).into(),
        )
    })?;
    Ok(Mark {
        roll_number: row.get(0)?,
        subject_code: row.get(1)?,
        semester: row.get(2)?,
        assessment,
        max_marks: row.get(4)?,
        marks_obtained: row.get(5)?,
    })
}

/// Inserts or replaces the mark for one assessment of one subject.
pub fn upsert_mark(conn: &Connection, mark: &MarkPayload) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO marks (roll_number, subject_code, semester, assessment, max_marks, marks_obtained)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(roll_number, subject_code, semester, assessment)
         DO UPDATE SET marks_obtained = excluded.marks_obtained, max_marks = excluded.max_marks",
        params![
            mark.roll_number,
            mark.subject_code,
            mark.semester,
            mark.assessment.as_str(),
            mark.assessment.max_marks(),
            mark.marks_obtained
        ],
    )?;
    Ok(())
}

pub fn marks_for_student(conn: &Connection, roll_number: &str) -> rusqlite::Result<Vec<Mark>> {
    let mut stmt = conn.prepare(
        "SELECT roll_number, subject_code, semester, assessment, max_marks, marks_obtained
         FROM marks WHERE roll_number = ?1
         ORDER BY semester, subject_code, assessment",
    )?;
    let rows = stmt.query_map(params![roll_number], mark_from_row)?;
    rows.collect()
}

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        roll_number: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        semester: row.get(4)?,
        technologies: row.get(5)?,
        repository_link: row.get(6)?,
        grade: row.get(7)?,
    })
}

const PROJECT_COLUMNS: &str =
    "id, roll_number, title, description, semester, technologies, repository_link, grade";

pub fn insert_project(
    conn: &Connection,
    roll_number: &str,
    project: &NewProject,
) -> rusqlite::Result<Project> {
    conn.execute(
        "INSERT INTO projects (roll_number, title, description, semester, technologies, repository_link)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            roll_number,
            project.title,
            project.description,
            project.semester,
            project.technologies,
            project.repository_link
        ],
    )?;
    Ok(Project {
        id: conn.last_insert_rowid(),
        roll_number: roll_number.to_string(),
        title: project.title.clone(),
        description: project.description.clone(),
        semester: project.semester,
        technologies: project.technologies.clone(),
        repository_link: project.repository_link.clone(),
        grade: None,
    })
}

pub fn find_project(conn: &Connection, id: i64) -> rusqlite::Result<Option<Project>> {
    conn.query_row(
        &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS),
        params![id],
        project_from_row,
    )
    .optional()
}

pub fn projects_for_student(conn: &Connection, roll_number: &str) -> rusqlite::Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM projects WHERE roll_number = ?1 ORDER BY semester, id",
        PROJECT_COLUMNS
    ))?;
    let rows = stmt.query_map(params![roll_number], project_from_row)?;
    rows.collect()
}

pub fn set_project_grade(conn: &Connection, id: i64, grade: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE projects SET grade = ?1 WHERE id = ?2",
        params![grade, id],
    )
}

pub fn delete_project(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{students, test_connection};

    fn subject(code: &str) -> SubjectPayload {
        SubjectPayload {
            subject_code: code.to_string(),
            name: "Data Structures".to_string(),
            semester: 3,
            branch: "IT".to_string(),
            is_elective: false,
        }
    }

    #[test]
    fn mark_upsert_replaces_the_previous_value() {
        let conn = test_connection();
        students::insert(&conn, "123A1234", "A", "a@x.in", None, None).unwrap();
        insert_subject(&conn, &subject("IT301")).unwrap();

        let mut mark = MarkPayload {
            roll_number: "123A1234".to_string(),
            subject_code: "IT301".to_string(),
            semester: 3,
            assessment: Assessment::Ia1,
            marks_obtained: Some(12.0),
        };
        upsert_mark(&conn, &mark).unwrap();
        mark.marks_obtained = Some(17.5);
        upsert_mark(&conn, &mark).unwrap();

        let marks = marks_for_student(&conn, "123A1234").unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].marks_obtained, Some(17.5));
        assert_eq!(marks[0].max_marks, 20.0);
    }

    #[test]
    fn subject_code_is_unique() {
        let conn = test_connection();
        insert_subject(&conn, &subject("IT301")).unwrap();
        assert!(insert_subject(&conn, &subject("IT301")).is_err());
    }

    #[test]
    fn projects_follow_their_student() {
        let conn = test_connection();
        students::insert(&conn, "123A1234", "A", "a@x.in", None, None).unwrap();
        let project = insert_project(
            &conn,
            "123A1234",
            &NewProject {
                title: "Compiler".into(),
                description: "Toy compiler".into(),
                semester: 5,
                technologies: "Rust".into(),
                repository_link: None,
            },
        )
        .unwrap();
        set_project_grade(&conn, project.id, "A").unwrap();
        assert_eq!(find_project(&conn, project.id).unwrap().unwrap().grade.as_deref(), Some("A"));

        students::delete(&conn, "123A1234").unwrap();
        assert!(projects_for_student(&conn, "123A1234").unwrap().is_empty());
    }
}
